//! Default keybinding definitions.

use gpui::{App, KeyBinding};

use super::actions::portal::*;

/// Key context set by the portal window's root element.
const PORTAL_CONTEXT: &str = "PortalWindow";

/// Register all default keybindings with the application.
pub fn register_keybindings(cx: &mut App) {
    cx.bind_keys(portal_bindings());
}

fn portal_bindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new("f5", Refresh, None),
        KeyBinding::new("cmd-r", Refresh, None),
        KeyBinding::new("cmd-d", DownloadSelected, None),
        KeyBinding::new("cmd-o", UploadFile, None),
        KeyBinding::new("enter", DownloadSelected, Some(PORTAL_CONTEXT)),
        KeyBinding::new("down", SelectNext, Some(PORTAL_CONTEXT)),
        KeyBinding::new("up", SelectPrevious, Some(PORTAL_CONTEXT)),
        KeyBinding::new("j", SelectNext, Some(PORTAL_CONTEXT)),
        KeyBinding::new("k", SelectPrevious, Some(PORTAL_CONTEXT)),
    ]
}
