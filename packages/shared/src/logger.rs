//! Logging setup for the Hibiki binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers both the library crate of the binary and the binary
/// itself. `RUST_LOG` overrides the default when set.
///
/// # Arguments
///
/// * `crate_name` - Library crate the binary belongs to (e.g., "hibiki_server")
/// * `binary_name` - The name of the binary (e.g., "hibiki-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use hibiki_shared::logger::setup_logger;
///
/// setup_logger("hibiki_server", "hibiki-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(crate_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// Binary names use `-` while tracing targets use `_`, so both names are
/// normalized first. The binary directive is only added when its target
/// differs from the crate's.
fn default_filter(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    let crate_target = crate_name.replace('-', "_");
    let binary_target = binary_name.replace('-', "_");

    let mut targets = vec![crate_target];
    if !targets.contains(&binary_target) {
        targets.push(binary_target);
    }
    targets.push("tower_http".to_string());

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}
