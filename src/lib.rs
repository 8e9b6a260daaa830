//! portfolio-activity - GitHub activity widgets for a static portfolio site.
//!
//! Reads a pre-generated activity summary and renders it into the stats grid
//! and recent repositories containers of a host page. Also collects that
//! summary from the GitHub events API and serves a live preview of the site.

pub mod cli;
pub mod config;
pub mod http_client;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod widget;
