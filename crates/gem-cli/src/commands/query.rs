use gem_config::GemConfig;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::QueryArgs;
use crate::commands::shared::display_limit;
use crate::output;
use crate::progress;

/// Handle `qgem query`.
pub async fn handle(args: &QueryArgs, config: &GemConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut session = bootstrap::session(config)?;
    let spinner = progress::follow(session.subscribe());

    let outcome = match session.select_file(&args.file).await {
        Ok(()) => {
            session.set_query_text(args.sql.as_str());
            session.run_editor().await
        }
        Err(error) => Err(error),
    };
    drop(session);
    let _ = spinner.await;

    let result = outcome?;
    output::print(&output::render_result(
        &result,
        flags.format,
        display_limit(flags, config),
    )?);
    Ok(())
}
