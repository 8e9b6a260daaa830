//! Collect command: build the activity document from the GitHub API.

use std::path::PathBuf;

use console::style;

use crate::config::Settings;
use crate::http_client::HttpClient;
use crate::pipeline::ActivityPipeline;

pub async fn cmd_collect(
    settings: &Settings,
    client: &HttpClient,
    username: Option<String>,
    days: Option<u64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let Some(username) = username.or_else(|| settings.github_username.clone()) else {
        anyhow::bail!("No GitHub username; pass --username or set GITHUB_USERNAME");
    };
    let days = days.unwrap_or(settings.lookback_days);
    let output = output.unwrap_or_else(|| settings.output_path.clone());

    println!(
        "{} Collecting GitHub activity for @{} (last {} days)",
        style("→").cyan(),
        username,
        days
    );
    if settings.github_token.is_none() {
        tracing::info!("No GITHUB_TOKEN set, using unauthenticated rate limits");
    }

    let pipeline = ActivityPipeline::new(
        client.clone(),
        &settings.github_api_url,
        &username,
        settings.github_token.clone(),
    );
    let payload = pipeline.run(&output, days).await?;

    let summary = payload.summary.unwrap_or_default();
    println!("  {} Saved {}", style("✓").green(), output.display());
    println!("    Total events:  {}", summary.total_events.unwrap_or(0));
    println!("    Total commits: {}", summary.total_commits.unwrap_or(0));
    println!("    Total repos:   {}", summary.total_repos.unwrap_or(0));

    Ok(())
}
