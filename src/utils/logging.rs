//! Diagnostic logging setup.
//!
//! Output goes to stderr so it never mixes with rendered views on stdout.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "warn";
const VERBOSE_DIRECTIVE: &str = "mcpdeck=debug";

/// Pick the filter: `RUST_LOG` wins when set, then `--verbose`, then warnings only.
pub fn build_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    if let Some(directives) = rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }
    let directive = if verbose {
        format!("{DEFAULT_DIRECTIVE},{VERBOSE_DIRECTIVE}")
    } else {
        DEFAULT_DIRECTIVE.to_string()
    };
    EnvFilter::new(directive)
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(rust_log.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
