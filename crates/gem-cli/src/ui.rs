use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var("COLUMNS").ok().as_deref(),
    ));
}

fn resolve(flags: &GlobalFlags, is_tty: bool, no_color: bool, columns: Option<&str>) -> UiPrefs {
    let interactive = is_tty && !flags.quiet;
    UiPrefs {
        color: interactive && flags.format == OutputFormat::Table && !no_color,
        progress: interactive && flags.format != OutputFormat::Json,
        term_width: columns
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|width| *width >= 40),
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        color: false,
        progress: false,
        term_width: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(format: OutputFormat, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            limit: None,
            quiet,
            verbose: false,
            yes: false,
        }
    }

    #[test]
    fn spinners_need_an_interactive_terminal() {
        assert!(resolve(&flags(OutputFormat::Table, false), true, false, None).progress);
        assert!(!resolve(&flags(OutputFormat::Table, false), false, false, None).progress);
        assert!(!resolve(&flags(OutputFormat::Table, true), true, false, None).progress);
        assert!(!resolve(&flags(OutputFormat::Json, false), true, false, None).progress);
    }

    #[test]
    fn color_respects_no_color() {
        assert!(resolve(&flags(OutputFormat::Table, false), true, false, None).color);
        assert!(!resolve(&flags(OutputFormat::Table, false), true, true, None).color);
        assert!(!resolve(&flags(OutputFormat::Raw, false), true, false, None).color);
    }

    #[test]
    fn narrow_or_invalid_widths_are_ignored() {
        let flags = flags(OutputFormat::Table, false);
        assert_eq!(resolve(&flags, true, false, Some("120")).term_width, Some(120));
        assert_eq!(resolve(&flags, true, false, Some("20")).term_width, None);
        assert_eq!(resolve(&flags, true, false, Some("wide")).term_width, None);
    }
}
