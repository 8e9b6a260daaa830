//! HTTP request handlers for the preview server.

use std::path::{Component, PathBuf};

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use super::AppState;
use crate::models::ActivityPayload;
use crate::widget::{ActivityWidget, HtmlDocument, WidgetError};

/// Site index.
pub async fn index_page(State(state): State<AppState>) -> Response {
    render_page(&state, "index.html").await
}

/// Any file below the site root. HTML pages and directory indexes are
/// rendered, anything else is served as-is.
pub async fn site_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request<Body>,
) -> Response {
    if path.is_empty() || path.ends_with('/') {
        return render_page(&state, &format!("{}index.html", path)).await;
    }
    if path.ends_with(".html") {
        return render_page(&state, &path).await;
    }

    match ServeDir::new(&state.site_root).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Join `page` under `root`, accepting only plain relative components.
fn page_path(root: &std::path::Path, page: &str) -> Option<PathBuf> {
    let relative = std::path::Path::new(page);
    relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
        .then(|| root.join(relative))
}

async fn render_page(state: &AppState, page: &str) -> Response {
    let Some(path) = page_path(&state.site_root, page) else {
        tracing::debug!("Rejected page path {:?}", page);
        return StatusCode::NOT_FOUND.into_response();
    };

    let markup = match tokio::fs::read_to_string(&path).await {
        Ok(markup) => markup,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(e) => {
            tracing::error!("Failed to read {}: {}", path.display(), e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // One widget per page load
    let mut widget = ActivityWidget::new(state.source.clone(), state.targets.clone());
    let fetched = widget.fetch_payload().await;
    Html(apply_widgets(&mut widget, fetched, &markup)).into_response()
}

/// Parse, render, and serialize without crossing an await point.
fn apply_widgets(
    widget: &mut ActivityWidget,
    fetched: Result<ActivityPayload, WidgetError>,
    markup: &str,
) -> String {
    let mut doc = HtmlDocument::parse(markup);
    widget.settle(fetched, &mut doc);
    doc.to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_path_accepts_relative_pages() {
        let root = std::path::Path::new("/srv/site");
        assert_eq!(
            page_path(root, "index.html"),
            Some(root.join("index.html"))
        );
        assert_eq!(
            page_path(root, "blog/post.html"),
            Some(root.join("blog").join("post.html"))
        );
    }

    #[test]
    fn test_page_path_rejects_escapes() {
        let root = std::path::Path::new("/srv/site");
        assert_eq!(page_path(root, "/etc/secret.html"), None);
        assert_eq!(page_path(root, "../secret.html"), None);
        assert_eq!(page_path(root, "blog/../../secret.html"), None);
        assert_eq!(page_path(root, "./index.html"), None);
    }
}
