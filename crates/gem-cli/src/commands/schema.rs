use gem_config::GemConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output;
use crate::progress;

/// Handle `qgem schema`.
pub async fn handle(args: &SchemaArgs, config: &GemConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut session = bootstrap::session(config)?;
    let spinner = progress::follow(session.subscribe());

    let loaded = session.select_file(&args.file).await;
    let view = session.view().clone();
    drop(session);
    let _ = spinner.await;
    loaded?;

    let schema = view.schema.unwrap_or_default();
    output::print(&output::render_schema(&schema, flags.format)?);
    Ok(())
}
