//! Opt-in `tracing` bootstrap for hosts that do not bring their own subscriber.
//!
//! The chart pipeline only emits `debug!` and `trace!` events, so nothing here
//! is required for correct rendering. Hosts that already install a subscriber
//! should skip this module entirely.

/// Installs a compact stderr subscriber filtered by `RUST_LOG` (defaulting to
/// `info`) when built with the `telemetry` feature.
///
/// Returns `true` once the subscriber is installed, and `false` when the
/// feature is off or another global subscriber won the race.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
