//! Portal window.
//!
//! Lists the blobs in the configured container and wires the refresh,
//! download and upload buttons to the blob worker.

use gpui::{prelude::FluentBuilder as _, *};
use gpui_component::{
    ActiveTheme as _, Disableable, Icon, IconName, Root, Sizable as _, StyledExt as _,
    WindowExt as _,
    button::{Button, ButtonVariants as _},
    h_flex,
    label::Label,
    list::ListItem,
    spinner::Spinner,
    v_flex,
};
use std::path::PathBuf;
use std::sync::Arc;

#[cfg(feature = "keyboard-nav")]
use crate::keybindings::portal;
use crate::services::blob::{BlobWorker, SharedBlobContainer};
use crate::services::folder;
use crate::state::{abandoned, perform, Alert, AlertLevel, PortalEffect, PortalEvent, PortalState};

pub struct PortalWindow {
    state: PortalState,
    container: SharedBlobContainer,
    worker: Arc<BlobWorker>,
    focus_handle: FocusHandle,
}

impl PortalWindow {
    /// Create the portal view.
    pub fn view(
        container: SharedBlobContainer,
        worker: Arc<BlobWorker>,
        download_dir: PathBuf,
        window: &mut Window,
        cx: &mut App,
    ) -> Entity<Self> {
        cx.new(|cx| Self::new(container, worker, download_dir, window, cx))
    }

    fn new(
        container: SharedBlobContainer,
        worker: Arc<BlobWorker>,
        download_dir: PathBuf,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let container_name = container.container_ref().container.clone();

        Self {
            state: PortalState::new(container_name, download_dir),
            container,
            worker,
            focus_handle: cx.focus_handle(),
        }
    }

    /// Apply an event to the state and carry out the resulting effect.
    pub fn dispatch(&mut self, event: PortalEvent, window: &mut Window, cx: &mut Context<Self>) {
        let effect = self.state.update(event);
        cx.notify();

        match effect {
            PortalEffect::None => {}
            PortalEffect::ShowAlert(alert) => Self::show_alert(alert, window, cx),
            PortalEffect::OpenFolder(dir) => {
                if let Err(e) = folder::open_folder(&dir) {
                    tracing::warn!("Could not open {}: {:#}", dir.display(), e);
                    let alert = Alert::open_folder_failed(&dir, &format!("{:#}", e));
                    Self::show_alert(alert, window, cx);
                }
            }
            remote => self.spawn_remote(remote, window, cx),
        }
    }

    /// Hand a remote effect to the blob worker and feed its outcome back.
    fn spawn_remote(&mut self, effect: PortalEffect, window: &mut Window, cx: &mut Context<Self>) {
        let pending = effect.clone();
        let task = self.worker.spawn(perform(self.container.clone(), effect));
        let entity = cx.entity();

        cx.spawn_in(window, async move |_this, cx| {
            let event = match task.await {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!("{:#}", e);
                    abandoned(&pending, format!("{:#}", e))
                }
            };

            let Some(event) = event else {
                return;
            };

            let _ = cx.update(|window, cx| {
                cx.update_entity(&entity, |this, cx| {
                    this.dispatch(event, window, cx);
                });
            });
        })
        .detach();
    }

    /// Ask for a file and upload it.
    fn pick_upload_file(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.state.is_busy() {
            return;
        }

        let picked = cx.prompt_for_paths(PathPromptOptions {
            files: true,
            directories: false,
            multiple: false,
            prompt: Some("Select file to upload".into()),
        });
        let entity = cx.entity();

        cx.spawn_in(window, async move |_this, cx| {
            let path = match picked.await {
                Ok(Ok(Some(paths))) => paths.into_iter().next(),
                Ok(Ok(None)) | Err(_) => None,
                Ok(Err(e)) => {
                    tracing::error!("File picker failed: {:#}", e);
                    None
                }
            };

            // Cancelled.
            let Some(path) = path else {
                return;
            };

            let _ = cx.update(|window, cx| {
                cx.update_entity(&entity, |this, cx| {
                    this.dispatch(PortalEvent::UploadPicked(path), window, cx);
                });
            });
        })
        .detach();
    }

    fn show_alert(alert: Alert, window: &mut Window, cx: &mut Context<Self>) {
        let level = alert.level;
        let title: SharedString = alert.title.into();
        let message: SharedString = alert.message.into();

        window.open_dialog(cx, move |dialog, _win, cx| {
            dialog.title(title.clone()).alert().child(
                h_flex()
                    .gap_3()
                    .items_start()
                    .child(Self::alert_icon(level, cx))
                    .child(Label::new(message.clone()).text_sm()),
            )
        });
    }

    fn alert_icon(level: AlertLevel, cx: &App) -> Icon {
        match level {
            AlertLevel::Info => Icon::new(IconName::Info)
                .size_5()
                .text_color(cx.theme().info),
            AlertLevel::Warning => Icon::new(IconName::TriangleAlert)
                .size_5()
                .text_color(cx.theme().warning),
            AlertLevel::Error => Icon::new(IconName::CircleX)
                .size_5()
                .text_color(cx.theme().danger),
        }
    }

    // ========================================================================
    // Keyboard Action Handlers
    // ========================================================================

    #[cfg(feature = "keyboard-nav")]
    fn on_refresh(&mut self, _: &portal::Refresh, window: &mut Window, cx: &mut Context<Self>) {
        self.dispatch(PortalEvent::RefreshRequested, window, cx);
    }

    #[cfg(feature = "keyboard-nav")]
    fn on_download(
        &mut self,
        _: &portal::DownloadSelected,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.dispatch(PortalEvent::DownloadRequested, window, cx);
    }

    #[cfg(feature = "keyboard-nav")]
    fn on_upload(&mut self, _: &portal::UploadFile, window: &mut Window, cx: &mut Context<Self>) {
        self.pick_upload_file(window, cx);
    }

    #[cfg(feature = "keyboard-nav")]
    fn on_select_next(&mut self, _: &portal::SelectNext, window: &mut Window, cx: &mut Context<Self>) {
        self.dispatch(PortalEvent::SelectNext, window, cx);
    }

    #[cfg(feature = "keyboard-nav")]
    fn on_select_previous(
        &mut self,
        _: &portal::SelectPrevious,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.dispatch(PortalEvent::SelectPrevious, window, cx);
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn render_header(&self, cx: &mut Context<Self>) -> impl IntoElement {
        v_flex()
            .gap_1()
            .child(
                Label::new("Magic Portal — Azure Blob Manager")
                    .text_xl()
                    .font_semibold(),
            )
            .child(
                Label::new(format!(
                    "Available files in '{}' container:",
                    self.state.container_name()
                ))
                .text_sm()
                .text_color(cx.theme().muted_foreground),
            )
    }

    fn render_blob_item(&self, ix: usize, name: &str, cx: &mut Context<Self>) -> impl IntoElement {
        let is_selected = self.state.selected_index() == Some(ix);

        let text_color = if is_selected {
            cx.theme().accent_foreground
        } else {
            cx.theme().foreground
        };

        let bg_color = if is_selected {
            cx.theme().list_active
        } else if ix % 2 == 0 {
            cx.theme().list
        } else {
            cx.theme().list_even
        };

        ListItem::new(ix)
            .w_full()
            .py_1()
            .px_3()
            .bg(bg_color)
            .border_1()
            .border_color(if is_selected {
                cx.theme().list_active_border
            } else {
                bg_color
            })
            .rounded(cx.theme().radius)
            .child(
                h_flex()
                    .items_center()
                    .gap_2()
                    .text_color(text_color)
                    .child(
                        Icon::new(IconName::File)
                            .size_4()
                            .text_color(text_color.opacity(0.7)),
                    )
                    .child(Label::new(name.to_string()).text_sm().whitespace_nowrap()),
            )
            .on_click(cx.listener(move |this, _, window, cx| {
                this.dispatch(PortalEvent::BlobSelected(ix), window, cx);
            }))
    }

    fn render_blob_list(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let frame = div()
            .id("blob-list")
            .flex()
            .flex_col()
            .flex_1()
            .border_1()
            .border_color(cx.theme().border)
            .rounded(cx.theme().radius);

        if self.state.items().is_empty() {
            let placeholder = if self.state.is_busy() {
                div().child(Spinner::new()).into_any_element()
            } else {
                v_flex()
                    .items_center()
                    .gap_2()
                    .child(
                        Icon::new(IconName::FolderOpen)
                            .size_8()
                            .text_color(cx.theme().muted_foreground),
                    )
                    .child(
                        Label::new("No files in this container")
                            .text_color(cx.theme().muted_foreground),
                    )
                    .into_any_element()
            };

            return frame
                .items_center()
                .justify_center()
                .child(placeholder)
                .into_any_element();
        }

        let rows: Vec<AnyElement> = self
            .state
            .items()
            .iter()
            .enumerate()
            .map(|(ix, name)| self.render_blob_item(ix, name, cx).into_any_element())
            .collect();

        frame
            .overflow_y_scroll()
            .p_2()
            .gap_1()
            .children(rows)
            .into_any_element()
    }

    fn render_buttons(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let busy = self.state.is_busy();

        h_flex()
            .gap_2()
            .child(
                Button::new("refresh-list")
                    .child("Refresh List")
                    .disabled(busy)
                    .on_click(cx.listener(|this, _, window, cx| {
                        this.dispatch(PortalEvent::RefreshRequested, window, cx);
                    })),
            )
            .child(
                Button::new("download-selected")
                    .primary()
                    .child("Download Selected")
                    .disabled(busy)
                    .on_click(cx.listener(|this, _, window, cx| {
                        this.dispatch(PortalEvent::DownloadRequested, window, cx);
                    })),
            )
            .child(
                Button::new("upload-file")
                    .child("Upload File…")
                    .disabled(busy)
                    .on_click(cx.listener(|this, _, window, cx| {
                        this.pick_upload_file(window, cx);
                    })),
            )
    }

    fn render_status(&self, cx: &mut Context<Self>) -> impl IntoElement {
        h_flex()
            .gap_2()
            .items_center()
            .min_h(px(20.))
            .when(self.state.is_busy(), |d| d.child(Spinner::new()))
            .child(
                Label::new(self.state.status().to_string())
                    .text_sm()
                    .text_color(cx.theme().muted_foreground),
            )
    }
}

impl Focusable for PortalWindow {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for PortalWindow {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let root = div()
            .id("portal-window")
            .key_context("PortalWindow")
            .track_focus(&self.focus_handle)
            .flex()
            .flex_col()
            .size_full()
            .bg(cx.theme().background);

        #[cfg(feature = "keyboard-nav")]
        let root = root
            .on_action(cx.listener(Self::on_refresh))
            .on_action(cx.listener(Self::on_download))
            .on_action(cx.listener(Self::on_upload))
            .on_action(cx.listener(Self::on_select_next))
            .on_action(cx.listener(Self::on_select_previous));

        root.child(
            v_flex()
                .flex_1()
                .p_4()
                .gap_3()
                .overflow_hidden()
                .child(self.render_header(cx))
                .child(self.render_blob_list(cx))
                .child(self.render_buttons(cx))
                .child(self.render_status(cx)),
        )
        .children(Root::render_dialog_layer(window, cx))
        .children(Root::render_notification_layer(window, cx))
    }
}
