use std::io::{IsTerminal, Write};
use std::path::Path;

use anyhow::Context;
use gem_ai::GeminiClient;
use gem_config::GemConfig;
use gem_engine::EngineRuntime;
use gem_engine::split::is_complete;
use gem_session::{CLOSE_PROMPT, Session};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::bootstrap;
use crate::cli::root_commands::ShellArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::ask::generated_sql;
use crate::commands::shared::{display_limit, is_yes, needs_confirmation};
use crate::output;
use crate::progress;

const HELP: &str = "\
Enter SQL ending with ';' to run it. Multi-line input is collected until the statement is complete.

.open PATH      Load a database file (.db, .sqlite, .sqlite3)
.schema         Show tables and columns
.sidebar        Toggle the schema explorer
.query [SQL]    Show the editor buffer, or replace it without running
.run            Run the editor buffer
.ask QUESTION   Ask in plain language; the generated SQL is run read-only
.close          Disconnect from the database
.status         Show connection and AI status
.help           Show this help
.quit           Leave the shell";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One parsed line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Blank,
    Dot { name: &'a str, arg: &'a str },
    Sql,
}

fn classify(line: &str, continuing: bool) -> Input<'_> {
    let trimmed = line.trim();
    if continuing {
        return Input::Sql;
    }
    if trimmed.is_empty() {
        return Input::Blank;
    }
    match trimmed.strip_prefix('.') {
        Some(command) => {
            let (name, arg) = command
                .split_once(char::is_whitespace)
                .map_or((command, ""), |(name, arg)| (name, arg.trim()));
            Input::Dot { name, arg }
        }
        None => Input::Sql,
    }
}

/// Strip one pair of matching quotes around a path argument.
fn unquote(arg: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|quote| arg.strip_prefix(*quote)?.strip_suffix(*quote))
        .unwrap_or(arg)
}

struct Shell<'a> {
    session: Session<GeminiClient>,
    config: &'a GemConfig,
    flags: &'a GlobalFlags,
    limit: Option<usize>,
    input: Lines<BufReader<Stdin>>,
    interactive: bool,
    pending: String,
}

/// Handle `qgem shell`.
pub async fn handle(args: &ShellArgs, config: &GemConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = bootstrap::session(config)?;
    let spinner = progress::follow(session.subscribe());

    let mut shell = Shell {
        session,
        config,
        flags,
        limit: display_limit(flags, config),
        input: BufReader::new(tokio::io::stdin()).lines(),
        interactive: std::io::stdin().is_terminal(),
        pending: String::new(),
    };

    if !flags.quiet {
        output::print(&format!(
            "QueryGem {}. Type .help for commands.",
            env!("CARGO_PKG_VERSION")
        ));
        if !shell.session.view().ai_available {
            output::print(output::AI_DISABLED);
        }
    }

    if let Some(file) = &args.file {
        shell.open(file).await?;
    }
    let result = shell.run().await;

    drop(shell);
    let _ = spinner.await;
    result
}

impl Shell<'_> {
    async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.prompt(if self.pending.is_empty() {
                "qgem> "
            } else {
                "  ...> "
            })?;
            let Some(line) = self.input.next_line().await.context("failed to read input")? else {
                break;
            };
            if self.handle_line(&line).await? == Flow::Quit {
                break;
            }
        }

        if !self.pending.trim().is_empty() {
            tracing::debug!(pending = %self.pending, "discarding incomplete statement at end of input");
        }
        Ok(())
    }

    fn prompt(&self, text: &str) -> anyhow::Result<()> {
        if !self.interactive {
            return Ok(());
        }
        progress::suspend(|| {
            print!("{text}");
            std::io::stdout().flush()
        })
        .context("failed to write prompt")
    }

    async fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        match classify(line, !self.pending.is_empty()) {
            Input::Blank => Ok(Flow::Continue),
            Input::Dot { name, arg } => self.dot_command(name, arg).await,
            Input::Sql => {
                if !self.pending.is_empty() {
                    self.pending.push('\n');
                }
                self.pending.push_str(line);
                if is_complete(&self.pending) {
                    let sql = std::mem::take(&mut self.pending);
                    self.session.set_query_text(sql.trim());
                    self.run_editor().await?;
                }
                Ok(Flow::Continue)
            }
        }
    }

    async fn dot_command(&mut self, name: &str, arg: &str) -> anyhow::Result<Flow> {
        match name {
            "open" if arg.is_empty() => output::eprint("usage: .open PATH"),
            "open" => self.open(Path::new(unquote(arg))).await?,
            "schema" => self.show_schema()?,
            "sidebar" => {
                self.session.toggle_sidebar();
                if self.session.view().sidebar_open {
                    self.show_schema()?;
                } else {
                    output::print("Schema explorer closed.");
                }
            }
            "query" if arg.is_empty() => output::print(&self.session.view().query_text),
            "query" => self.session.set_query_text(arg),
            "run" => self.run_editor().await?,
            "ask" => self.ask(arg).await?,
            "close" => self.close().await?,
            "status" => output::print(&output::render_status(
                self.session.view(),
                EngineRuntime::get().map(EngineRuntime::version),
            )),
            "help" => output::print(HELP),
            "quit" | "exit" => return Ok(Flow::Quit),
            other => output::eprint(&format!(
                "Unknown command: .{other}. Type .help for commands."
            )),
        }
        Ok(Flow::Continue)
    }

    async fn open(&mut self, path: &Path) -> anyhow::Result<()> {
        if self.session.select_file(path).await.is_ok() {
            let view = self.session.view();
            if let Some(name) = &view.file_name {
                output::print(&format!("Connected to: {name}"));
            }
            if view.sidebar_open {
                self.show_schema()?;
            }
            if view.last_error().is_none() {
                output::print(&format!("Editor: {}", view.query_text));
                return Ok(());
            }
        }
        self.show_results()
    }

    fn show_schema(&self) -> anyhow::Result<()> {
        match &self.session.view().schema {
            Some(schema) => output::print(&output::render_schema(schema, self.flags.format)?),
            None => output::print("No database loaded."),
        }
        Ok(())
    }

    fn show_results(&self) -> anyhow::Result<()> {
        let view = self.session.view();
        let rendered = match view.last_result() {
            Some(result) if self.flags.format != OutputFormat::Table => {
                output::render_result(result, self.flags.format, self.limit)?
            }
            _ => output::render_results_panel(view, self.limit)?,
        };
        output::print(&rendered);
        Ok(())
    }

    async fn run_editor(&mut self) -> anyhow::Result<()> {
        // Failures land in the view and render as the error panel.
        let _ = self.session.run_editor().await;
        self.show_results()
    }

    async fn ask(&mut self, question: &str) -> anyhow::Result<()> {
        if question.is_empty() {
            output::eprint("usage: .ask QUESTION");
            return Ok(());
        }
        if !self.session.view().ai_available {
            output::print(output::AI_DISABLED);
            return Ok(());
        }

        let outcome = self.session.ask_ai(question).await;
        if generated_sql(&outcome) {
            output::print(&format!("Generated SQL: {}", self.session.view().query_text));
        }
        self.show_results()
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        if !self.session.is_connected() {
            self.session.close_connection(|_| true);
            output::print("No database loaded.");
            return Ok(());
        }

        let confirmed = if needs_confirmation(self.flags, self.config) {
            self.prompt_always(&format!("{CLOSE_PROMPT} [y/N] "))?;
            let answer = self
                .input
                .next_line()
                .await
                .context("failed to read confirmation")?;
            answer.as_deref().is_some_and(is_yes)
        } else {
            true
        };

        if self.session.close_connection(|_| confirmed) {
            output::print("Disconnected.");
        } else {
            output::print("Still connected.");
        }
        Ok(())
    }

    /// Confirmation questions are shown even when input is piped.
    fn prompt_always(&self, text: &str) -> anyhow::Result<()> {
        progress::suspend(|| {
            eprint!("{text}");
            std::io::stderr().flush()
        })
        .context("failed to write prompt")
    }
}
