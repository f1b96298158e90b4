use gem_config::GemConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod ask;
pub mod query;
pub mod schema;
pub mod shared;
pub mod shell;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: &Commands,
    config: &GemConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Shell(args) => shell::handle(args, config, flags).await,
        Commands::Schema(args) => schema::handle(args, config, flags).await,
        Commands::Query(args) => query::handle(args, config, flags).await,
        Commands::Ask(args) => ask::handle(args, config, flags).await,
    }
}
