//! User agent handling for HTTP requests.

pub const USER_AGENT: &str = concat!("portfolio-activity/", env!("CARGO_PKG_VERSION"));

/// Resolve user agent from config value.
/// - None or empty => default user agent
/// - other => custom user agent string
pub fn resolve_user_agent(config: Option<&str>) -> String {
    match config {
        None | Some("") => USER_AGENT.to_string(),
        Some(custom) => custom.to_string(),
    }
}
