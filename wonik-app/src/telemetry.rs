//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: `level` for the wonik crates,
/// warnings for everything else.
#[must_use]
pub fn default_filter(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { "info" } else { level };
    format!("warn,wonik_core={level},wonik_llm={level},wonik_app={level},wonik={level}")
}

/// Install a `fmt` subscriber writing to stderr, as JSON lines when `json`.
///
/// `RUST_LOG` wins over `level`. Calling this twice is harmless; the
/// second call leaves the first subscriber in place.
pub fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(level, "Tracing initialised");
    }
}
