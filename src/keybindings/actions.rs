//! Action definitions for keyboard shortcuts.

pub mod portal {
    use gpui::actions;

    actions!(
        portal,
        [
            Refresh,
            DownloadSelected,
            UploadFile,
            SelectNext,
            SelectPrevious,
        ]
    );
}
