mod portal;
mod portal_actions;

pub use portal::*;
pub use portal_actions::*;
