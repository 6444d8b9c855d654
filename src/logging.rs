//! Diagnostic logging setup.
//!
//! User-facing messages go through `present`; classified failures are logged
//! at debug so their raw detail only shows with `--verbose`.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "PHOTOFORGE_LOG";

/// Install the global subscriber, writing to stderr.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(std::env::var(LOG_ENV).ok().as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn filter(directive: Option<&str>, verbose: bool) -> EnvFilter {
    let base = match directive {
        Some(d) if !d.trim().is_empty() => d.to_string(),
        _ if verbose => "debug".to_string(),
        _ => "warn".to_string(),
    };
    EnvFilter::try_new(format!("{base},hyper=warn,reqwest=warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_switches_to_debug() {
        assert!(filter(None, true).to_string().contains("debug"));
        assert!(!filter(None, false).to_string().contains("debug"));
    }

    #[test]
    fn explicit_directive_wins() {
        let f = filter(Some("photoforge=trace"), false).to_string();
        assert!(f.contains("photoforge=trace"));
        assert!(f.contains("hyper=warn"));
    }

    #[test]
    fn bad_directive_falls_back() {
        assert_eq!(filter(Some("photoforge=loud"), true).to_string(), "warn");
    }
}
