//! SnapTile - snap-tiling layout engine
//!
//! Command-line entry point.

use clap::Parser;
use snaptile::{
    cli::{run_cli, SnapTileCli},
    logging::{init_logging, LogConfig},
    Result, SnapTileError,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = SnapTileCli::parse();

    let log_config = LogConfig::from_env().with_verbosity(cli.verbose);
    init_logging(&log_config).map_err(|e| {
        SnapTileError::ConfigurationError(format!("Failed to initialize logging: {}", e))
    })?;

    if run_cli(cli).await.is_err() {
        std::process::exit(1);
    }

    Ok(())
}
