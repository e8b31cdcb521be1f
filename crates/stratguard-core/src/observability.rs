//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no explicit filter is given.
pub const LOG_ENV: &str = "STRATGUARD_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install a stderr fmt subscriber.
///
/// Filter precedence: `filter` argument, then `STRATGUARD_LOG`, then `info`.
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let env_filter = match filter {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_env(LOG_ENV).ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_falls_back_and_reinit_is_noop() {
        assert!(init_tracing(Some("=[not a directive")));
        assert!(!init_tracing(Some("debug")));
    }
}
