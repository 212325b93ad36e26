//! Logging setup

use crate::{Error, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing, honouring `RUST_LOG` and falling back to `level`
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Config(format!("tracing init: {}", e)))?;

    tracing::debug!("tracing initialized with level: {}", level);
    Ok(())
}
