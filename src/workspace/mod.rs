mod portal_window;

pub use portal_window::*;
