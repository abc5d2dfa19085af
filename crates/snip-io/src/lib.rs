pub mod clipboard;
pub mod debug_dump;
