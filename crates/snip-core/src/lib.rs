pub mod capture;
pub mod dispatch;
pub mod enhance;
pub mod error;
pub mod overlay;
pub mod postprocess;
pub mod preprocess;
pub mod session;
pub mod sink;
pub mod types;
