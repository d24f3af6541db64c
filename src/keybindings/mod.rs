//! Keyboard shortcuts for the portal window.
//!
//! - Refresh, download and upload shortcuts that work anywhere in the window
//! - Up/down (and vim-style j/k) to move the blob selection
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::keybindings;
//!
//! // In main.rs, before opening the window:
//! keybindings::init(cx);
//! ```

pub mod actions;
pub mod bindings;

use gpui::App;

pub use actions::portal;
pub use bindings::register_keybindings;

/// Initialize the keybindings system.
pub fn init(cx: &mut App) {
    register_keybindings(cx);
}
