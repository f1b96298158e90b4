use gem_config::GemConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &GemConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &GemConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.ai.is_configured() && has_single_underscore_key(&env_keys, "QUERYGEM_AI") {
        warnings.push(
            "AI config has no API key while QUERYGEM_AI* env vars exist. Use double underscores (example: QUERYGEM_AI__API_KEY)."
                .to_string(),
        );
    }

    if has_single_underscore_key(&env_keys, "QUERYGEM_GENERAL") {
        warnings.push(
            "QUERYGEM_GENERAL* env vars are ignored. Use double underscores (example: QUERYGEM_GENERAL__DISPLAY_LIMIT)."
                .to_string(),
        );
    }

    warnings
}

/// `QUERYGEM_AI_API_KEY` matches, `QUERYGEM_AI__API_KEY` does not.
fn has_single_underscore_key(keys: &[String], section: &str) -> bool {
    let nested = format!("{section}__");
    keys.iter()
        .any(|key| key.starts_with(section) && !key.starts_with(&nested))
}
