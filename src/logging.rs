use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Preferred filter variable; `RUST_LOG` is read when it is unset.
pub const LOG_ENV: &str = "STRATEGIST_LOG";

/// Build the filter from `STRATEGIST_LOG`, then `RUST_LOG`, defaulting to
/// `warn`.
pub fn filter(strategist_log: Option<&str>, rust_log: Option<&str>) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into());
    let directives = strategist_log.or(rust_log).filter(|s| !s.trim().is_empty());
    builder.parse_lossy(directives.unwrap_or_default())
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// the strategy on stdout.
pub fn init() {
    let strategist_log = std::env::var(LOG_ENV).ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = filter(strategist_log.as_deref(), rust_log.as_deref());
    // A subscriber may already be set, e.g. by a test harness.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_warn() {
        assert_eq!(filter(None, None).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn strategist_log_wins() {
        let f = filter(Some("debug"), Some("error"));
        assert_eq!(f.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn falls_back_to_rust_log() {
        let f = filter(None, Some("info"));
        assert_eq!(f.max_level_hint(), Some(LevelFilter::INFO));
    }
}
