//! Console logging for the binary.
//!
//! `RUST_LOG` wins when set; otherwise `info`, or `debug` with `-v`.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
