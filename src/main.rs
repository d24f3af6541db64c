#[cfg(feature = "keyboard-nav")]
mod keybindings;
mod services;
mod state;
mod workspace;

use anyhow::{Context as _, Result};
use gpui::*;
use gpui_component::Root;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use services::blob::{BlobServiceFactory, BlobWorker, SharedBlobContainer};
use services::{paths, AppSettings};
use state::PortalEvent;
use workspace::PortalWindow;

/// Everything that must succeed before a window is shown.
struct Startup {
    container: SharedBlobContainer,
    worker: Arc<BlobWorker>,
    download_dir: PathBuf,
}

impl Startup {
    fn prepare() -> Result<Self> {
        let settings = AppSettings::load()?;

        let download_dir = paths::default_download_dir()?;
        paths::ensure_download_dir(&download_dir)?;
        tracing::info!("Downloads go to {}", download_dir.display());

        let container = BlobServiceFactory::create(settings.container_ref()?)?;

        let worker = Arc::new(BlobWorker::new()?);

        Ok(Self {
            container,
            worker,
            download_dir,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("magic_portal=info")),
        )
        .init();

    let startup = Startup::prepare()
        .inspect_err(|e| tracing::error!("Startup failed: {:#}", e))
        .context("Magic Portal could not start")?;

    let app = Application::new();
    app.run(move |cx| {
        gpui_component::init(cx);
        #[cfg(feature = "keyboard-nav")]
        keybindings::init(cx);

        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        let Startup {
            container,
            worker,
            download_dir,
        } = startup;

        let bounds = Bounds::centered(None, size(px(720.), px(520.)), cx);
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some("Magic Portal".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let opened = cx.open_window(options, |window, cx| {
            let view = PortalWindow::view(container, worker, download_dir, window, cx);
            // Shortcuts are dispatched from the focused node.
            let focus_handle = view.read(cx).focus_handle(cx);
            window.focus(&focus_handle);
            view.update(cx, |portal, cx| {
                portal.dispatch(PortalEvent::RefreshRequested, window, cx);
            });
            cx.new(|cx| Root::new(AnyView::from(view), window, cx))
        });

        match opened {
            Ok(_) => cx.activate(true),
            Err(e) => {
                tracing::error!("Failed to open window: {:#}", e);
                cx.quit();
            }
        }
    });

    Ok(())
}
