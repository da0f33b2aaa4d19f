mod commands;
mod enums;

pub use commands::*;
pub use enums::*;

use clap::Parser;

#[derive(Parser)]
#[command(name = "testmetry")]
#[command(about = "Query test-execution telemetry", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Telemetry source: a store file path or a server URL. Falls back
    /// to the config file, then TESTMETRY_PATH, then the data directory.
    #[arg(long, global = true, value_name = "PATH|URL")]
    pub source: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
