//! Control window and overlay callbacks

use std::rc::Rc;

use slint::{ComponentHandle, Image, Rgba8Pixel, SharedPixelBuffer};
use snip_core::capture::Snapshot;
use snip_core::error::{DispatchError, PipelineError};
use snip_core::overlay::{PointerEvent, backdrop};
use snip_core::session::SelectionStep;
use snip_core::types::AppEvent;
use snip_types::{LanguageSet, Mode, Point};

use crate::SelectionOverlay;
use crate::state::UiState;
use crate::status;

pub fn mode_index(mode: Mode) -> i32 {
    match mode {
        Mode::Math => 0,
        Mode::Text => 1,
    }
}

pub fn mode_from_index(index: i32) -> Mode {
    if index == 1 { Mode::Text } else { Mode::Math }
}

/// Logical overlay coordinates to snapshot pixels
pub fn to_physical(x: f32, y: f32, scale: f32) -> Point {
    Point::new((x * scale).round() as i32, (y * scale).round() as i32)
}

/// Snip button and hotkey: hide the control window, then grab the screen
pub fn start_capture(state: &Rc<UiState>) {
    let armed = state.pipeline.borrow_mut().arm();
    if let Err(e) = armed {
        report_refusal(state, &e);
        return;
    }
    state.sync_controls();

    if let Some(w) = state.control.upgrade() {
        w.hide().ok();
    }

    let s = state.clone();
    slint::Timer::single_shot(state.hide_delay, move || open_overlay(&s));
}

/// Not ready yet, or a capture is already under way
pub fn is_silent_refusal(error: &PipelineError) -> bool {
    matches!(error, PipelineError::NotReady | PipelineError::Busy)
}

fn report_refusal(state: &UiState, error: &PipelineError) {
    match error {
        e if is_silent_refusal(e) => {
            tracing::debug!("Capture request ignored: {error}");
        }
        PipelineError::Dispatch(DispatchError::Unavailable { mode: Mode::Text }) => {
            state.set_status(status::TESSERACT_MISSING, false);
            state.set_result_text(status::TESSERACT_GUIDANCE);
        }
        other => state.set_status(&other.to_string(), false),
    }
}

fn open_overlay(state: &Rc<UiState>) {
    let opened = state
        .pipeline
        .borrow_mut()
        .begin_capture(state.capturer.as_ref())
        .map(|session| {
            (
                session.hint(),
                backdrop_image(session.snapshot(), state.overlay_dim),
            )
        });

    let (hint, image) = match opened {
        Ok(opened) => opened,
        Err(e) if is_silent_refusal(&e) => {
            tracing::debug!("Overlay not opened: {e}");
            return;
        }
        Err(e) => {
            state.set_status(&format!("Screen capture failed: {e}"), false);
            restore_control(state);
            return;
        }
    };

    let Some(overlay) = state.overlay.upgrade() else {
        state.pipeline.borrow_mut().cancel();
        restore_control(state);
        return;
    };

    overlay.set_backdrop(image);
    overlay.set_hint(hint.into());
    overlay.set_dragging(false);
    overlay.window().set_fullscreen(true);
    if let Err(e) = overlay.show() {
        tracing::error!("Failed to show selection overlay: {e}");
        state.pipeline.borrow_mut().cancel();
        restore_control(state);
        return;
    }
    state.sync_controls();
}

fn backdrop_image(snapshot: &Snapshot, dim: f32) -> Image {
    let dimmed = backdrop(snapshot.image(), dim);
    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
        dimmed.as_raw(),
        dimmed.width(),
        dimmed.height(),
    );
    Image::from_rgba8(buffer)
}

pub fn pointer(state: &Rc<UiState>, make: fn(Point) -> PointerEvent, x: f32, y: f32) {
    let Some(overlay) = state.overlay.upgrade() else {
        return;
    };
    let scale = overlay.window().scale_factor();
    apply_pointer(state, &overlay, make(to_physical(x, y, scale)), scale);
}

/// Escape on the overlay
pub fn cancel_selection(state: &Rc<UiState>) {
    let Some(overlay) = state.overlay.upgrade() else {
        return;
    };
    let scale = overlay.window().scale_factor();
    apply_pointer(state, &overlay, PointerEvent::Cancel, scale);
}

fn apply_pointer(state: &Rc<UiState>, overlay: &SelectionOverlay, event: PointerEvent, scale: f32) {
    let step = state.pipeline.borrow_mut().handle_pointer(event);

    match step {
        SelectionStep::Pending => draw_rubber_band(state, overlay, scale),
        SelectionStep::Cancelled => {
            close_overlay(overlay);
            state.show_idle_status();
            restore_control(state);
        }
        SelectionStep::Recognize(job) => {
            close_overlay(overlay);
            state.set_status(status::PROCESSING, true);
            restore_control(state);
            state.bridge.send(AppEvent::Recognize(job));
        }
    }
}

fn draw_rubber_band(state: &UiState, overlay: &SelectionOverlay, scale: f32) {
    let band = state
        .pipeline
        .borrow()
        .session()
        .and_then(|session| session.overlay().rubber_band());

    match band {
        Some(band) => {
            overlay.set_sel_x(band.x as f32 / scale);
            overlay.set_sel_y(band.y as f32 / scale);
            overlay.set_sel_width(band.width as f32 / scale);
            overlay.set_sel_height(band.height as f32 / scale);
            overlay.set_dragging(true);
        }
        None => overlay.set_dragging(false),
    }
}

fn close_overlay(overlay: &SelectionOverlay) {
    overlay.hide().ok();
    overlay.set_dragging(false);
    overlay.set_backdrop(Image::default());
}

fn restore_control(state: &UiState) {
    if let Some(w) = state.control.upgrade() {
        w.show().ok();
    }
    state.sync_controls();
}

pub fn copy_result(state: &UiState) {
    if state.pipeline.borrow_mut().recopy() {
        state.set_status(status::COPIED, true);
    }
}

pub fn set_languages(state: &UiState, value: &str) {
    match value.parse::<LanguageSet>() {
        Ok(languages) => {
            tracing::debug!(%languages, "OCR languages changed");
            state.pipeline.borrow_mut().set_languages(languages);
        }
        Err(e) => tracing::warn!("Ignoring language selection '{value}': {e}"),
    }
}
