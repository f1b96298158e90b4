use gem_config::GemConfig;

use crate::cli::GlobalFlags;

/// Rows shown per result set: `--limit`, then `general.display_limit`.
/// Zero means no cap.
#[must_use]
pub fn display_limit(flags: &GlobalFlags, config: &GemConfig) -> Option<usize> {
    match flags.limit.unwrap_or(config.general.display_limit) {
        0 => None,
        limit => usize::try_from(limit).ok(),
    }
}

/// Whether a disconnect needs an explicit yes from the user.
#[must_use]
pub const fn needs_confirmation(flags: &GlobalFlags, config: &GemConfig) -> bool {
    !flags.yes && config.general.confirm_disconnect
}

/// `y`/`yes` in any case; everything else, including an empty answer, is no.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn flags(limit: Option<u32>, yes: bool) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Table,
            limit,
            quiet: false,
            verbose: false,
            yes,
        }
    }

    #[test]
    fn flag_limit_takes_precedence() {
        let config = GemConfig::default();
        assert_eq!(display_limit(&flags(Some(5), false), &config), Some(5));
        assert_eq!(display_limit(&flags(None, false), &config), Some(200));
        assert_eq!(display_limit(&flags(Some(0), false), &config), None);
    }

    #[test]
    fn yes_flag_skips_confirmation() {
        let mut config = GemConfig::default();
        assert!(needs_confirmation(&flags(None, false), &config));
        assert!(!needs_confirmation(&flags(None, true), &config));

        config.general.confirm_disconnect = false;
        assert!(!needs_confirmation(&flags(None, false), &config));
    }

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
