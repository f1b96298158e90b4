use anyhow::bail;
use gem_config::GemConfig;
use gem_session::SessionError;

use crate::bootstrap;
use crate::cli::root_commands::AskArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::display_limit;
use crate::output;
use crate::progress;

/// Handle `qgem ask`.
pub async fn handle(args: &AskArgs, config: &GemConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.question.trim().is_empty() {
        bail!("question must not be empty");
    }
    if !config.ai.is_configured() {
        bail!("{}", output::AI_DISABLED);
    }

    let mut session = bootstrap::session(config)?;
    let spinner = progress::follow(session.subscribe());

    let outcome = match session.select_file(&args.file).await {
        Ok(()) => session.ask_ai(&args.question).await,
        Err(error) => Err(error),
    };
    let sql = session.view().query_text.clone();
    drop(session);
    let _ = spinner.await;

    if args.show_sql && generated_sql(&outcome) {
        if flags.format == OutputFormat::Table {
            output::print(&format!("{sql}\n"));
        } else {
            output::eprint(&sql);
        }
    }

    let result = outcome?;
    output::print(&output::render_result(
        &result,
        flags.format,
        display_limit(flags, config),
    )?);
    Ok(())
}

/// Whether translation got far enough to put SQL in the editor.
pub fn generated_sql<T>(outcome: &Result<T, SessionError>) -> bool {
    !matches!(
        outcome,
        Err(SessionError::Init(_)
            | SessionError::Open(_)
            | SessionError::SchemaRead(_)
            | SessionError::NoSchema
            | SessionError::Config(_)
            | SessionError::Translation(_))
    )
}

#[cfg(test)]
mod tests {
    use super::generated_sql;
    use gem_session::SessionError;

    #[test]
    fn sql_is_shown_only_after_translation() {
        assert!(generated_sql::<()>(&Ok(())));
        assert!(generated_sql::<()>(&Err(SessionError::Query("no such column".into()))));
        assert!(!generated_sql::<()>(&Err(SessionError::Translation("timeout".into()))));
        assert!(!generated_sql::<()>(&Err(SessionError::NoSchema)));
        assert!(!generated_sql::<()>(&Err(SessionError::Open("bad".into()))));
    }
}
