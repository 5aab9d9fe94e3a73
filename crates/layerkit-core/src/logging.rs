#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! layerkit instruments itself with [`tracing`]. This module re-exports the
//! macros so downstream crates in the workspace share one import path, and
//! with the `subscriber` feature offers a ready-made subscriber for binaries
//! and tests.

pub use tracing::{debug, debug_span, error, info, info_span, trace, trace_span, warn};

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "LAYERKIT_LOG";

/// Environment variable selecting the output format (`json` or `text`).
pub const LOG_FORMAT_ENV: &str = "LAYERKIT_LOG_FORMAT";

/// Install a global subscriber filtered by [`LOG_ENV`].
///
/// Falls back to `default_directive` (e.g. `"layerkit=info"`) when the
/// variable is unset or invalid. Emits JSON lines when [`LOG_FORMAT_ENV`] is
/// `json`. Returns an error if a global subscriber is already installed.
#[cfg(feature = "subscriber")]
pub fn install_subscriber(
    default_directive: &str,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
    }
}
