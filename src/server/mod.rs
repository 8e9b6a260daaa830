//! Preview server for the portfolio site.
//!
//! HTML pages get the activity widgets applied on every request, the same way
//! the browser would run them on every page load. Everything else is served
//! from the site directory unchanged.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::http_client::HttpClient;
use crate::widget::{source_for_site, ActivitySource, WidgetTargets};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    /// Directory the site is served from.
    pub site_root: PathBuf,
    pub source: Arc<dyn ActivitySource>,
    pub targets: WidgetTargets,
}

impl AppState {
    pub fn new(settings: &Settings, client: &HttpClient) -> anyhow::Result<Self> {
        if settings.site_is_remote() {
            anyhow::bail!(
                "Cannot serve a remote site root ({}); point --site at a directory",
                settings.site_root
            );
        }

        let source = source_for_site(&settings.site_root, &settings.data_path, client)?;
        Ok(Self {
            site_root: PathBuf::from(&settings.site_root),
            source: Arc::from(source),
            targets: settings.targets(),
        })
    }
}

/// Start the web server.
pub async fn serve(
    settings: &Settings,
    client: &HttpClient,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let state = AppState::new(settings, client)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
