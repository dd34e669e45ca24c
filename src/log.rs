//! Audit strings and tracing setup.
//!
//! Commands, orders and execution outcomes expose a one-line audit string.
//! The engine emits it under the `audit` tracing target before the entity is
//! dropped, so any subscriber can capture a full game transcript.

use tracing_subscriber::EnvFilter;

/// Something that can describe itself as a single audit line.
pub trait Loggable {
    fn string_to_log(&self) -> String;
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Emits an entity's audit line.
pub fn audit(entity: &impl Loggable) {
    tracing::info!(target: "audit", "{}", entity.string_to_log());
}
