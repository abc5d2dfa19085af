/// Selections must be strictly larger than this in both dimensions
pub const MIN_SELECTION: u32 = 10;

/// A point in physical screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle with sorted corners, `x1 < x2` and `y1 < y2`.
///
/// Only constructed through [`Region::normalize`], so every `Region` in the
/// program is large enough to be worth cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl Region {
    /// Build a region from two arbitrary corners (pointer-down and pointer-up).
    ///
    /// Returns `None` when either side is `<= MIN_SELECTION` pixels.
    pub fn normalize(p0: Point, p1: Point) -> Option<Self> {
        let region = Self {
            x1: p0.x.min(p1.x),
            y1: p0.y.min(p1.y),
            x2: p0.x.max(p1.x),
            y2: p0.y.max(p1.y),
        };

        (region.width() > MIN_SELECTION && region.height() > MIN_SELECTION).then_some(region)
    }

    pub fn x1(&self) -> i32 {
        self.x1
    }

    pub fn y1(&self) -> i32 {
        self.y1
    }

    pub fn x2(&self) -> i32 {
        self.x2
    }

    pub fn y2(&self) -> i32 {
        self.y2
    }

    pub fn width(&self) -> u32 {
        self.x2.abs_diff(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.abs_diff(self.y1)
    }
}
