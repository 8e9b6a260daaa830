//! Render command: apply the widgets to host pages on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use console::style;

use crate::config::Settings;
use crate::http_client::HttpClient;
use crate::widget::{
    source_for_site, ActivitySource, ActivityWidget, HtmlDocument, RenderOutcome, WidgetState,
};

/// Render every page, loading the activity document once per page.
pub async fn cmd_render(
    settings: &Settings,
    client: &HttpClient,
    pages: &[PathBuf],
    out_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let source: Arc<dyn ActivitySource> =
        Arc::from(source_for_site(&settings.site_root, &settings.data_path, client)?);

    let pages = if pages.is_empty() {
        if settings.site_is_remote() {
            anyhow::bail!("No pages given and the site root is a URL; pass page paths explicitly");
        }
        vec![Path::new(&settings.site_root).join("index.html")]
    } else {
        pages.to_vec()
    };

    if let Some(dir) = out_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
    }

    println!(
        "{} Rendering activity from {}",
        style("→").cyan(),
        source.location()
    );

    for page in &pages {
        let output = output_path(page, out_dir)?;
        let state = render_page(source.clone(), settings, page, &output).await?;
        report(page, &state);
    }

    Ok(())
}

async fn render_page(
    source: Arc<dyn ActivitySource>,
    settings: &Settings,
    page: &Path,
    output: &Path,
) -> anyhow::Result<WidgetState> {
    let markup = tokio::fs::read_to_string(page)
        .await
        .with_context(|| format!("Failed to read page '{}'", page.display()))?;

    let mut doc = HtmlDocument::parse(&markup);
    let mut widget = ActivityWidget::new(source, settings.targets());
    let state = widget.load(&mut doc).await.clone();

    tokio::fs::write(output, doc.to_html())
        .await
        .with_context(|| format!("Failed to write page '{}'", output.display()))?;

    Ok(state)
}

fn output_path(page: &Path, out_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    match out_dir {
        Some(dir) => {
            let name = page
                .file_name()
                .with_context(|| format!("Not a page file: '{}'", page.display()))?;
            Ok(dir.join(name))
        }
        None => Ok(page.to_path_buf()),
    }
}

fn describe(outcome: &RenderOutcome, unit: &str) -> String {
    match outcome {
        RenderOutcome::Rendered { items } => format!("{} {}", items, unit),
        RenderOutcome::MissingContainer => "no container".to_string(),
        RenderOutcome::Malformed(reason) => format!("skipped ({})", reason),
    }
}

fn report(page: &Path, state: &WidgetState) {
    match state {
        WidgetState::Rendered(report) => println!(
            "  {} {}: stats {}, repos {}",
            style("✓").green(),
            page.display(),
            describe(&report.stats, "cells"),
            describe(&report.repos, "rows"),
        ),
        WidgetState::Failed(reason) => println!(
            "  {} {}: widgets left empty ({})",
            style("✗").red(),
            page.display(),
            reason
        ),
        WidgetState::Pending => {}
    }
}
