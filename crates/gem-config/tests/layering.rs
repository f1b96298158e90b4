//! Integration tests for TOML and environment layering.
//!
//! Uses figment::Jail for sandboxed cwd and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use gem_config::GemConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_ai_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[ai]
api_key = "toml-key"
model = "gemini-2.0-pro"
endpoint = "http://127.0.0.1:9999"
allow_writes = true

[general]
display_limit = 50
confirm_disconnect = false
"#,
        )?;

        let config: GemConfig = Figment::from(Serialized::defaults(GemConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.ai.api_key, "toml-key");
        assert_eq!(config.ai.model, "gemini-2.0-pro");
        assert_eq!(config.ai.endpoint, "http://127.0.0.1:9999");
        assert!(config.ai.allow_writes);
        assert!(config.ai.is_configured());
        assert_eq!(config.general.display_limit, 50);
        assert!(!config.general.confirm_disconnect);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[ai]
api_key = "only-key"
"#,
        )?;

        let config: GemConfig = Figment::from(Serialized::defaults(GemConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert_eq!(config.general.display_limit, 200);
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".querygem")?;
        jail.create_file(
            ".querygem/config.toml",
            r#"
[general]
display_limit = 7
"#,
        )?;

        let config = GemConfig::load().expect("config loads");
        assert_eq!(config.general.display_limit, 7);
        Ok(())
    });
}

#[test]
fn legacy_gemini_key_maps_to_ai_api_key() {
    Jail::expect_with(|jail| {
        jail.set_env("GEMINI_API_KEY", "legacy-key");

        let config: GemConfig = GemConfig::figment().extract()?;
        assert_eq!(config.ai.api_key, "legacy-key");
        assert!(config.ai.is_configured());
        Ok(())
    });
}

#[test]
fn prefixed_key_beats_legacy_key() {
    Jail::expect_with(|jail| {
        jail.set_env("GEMINI_API_KEY", "legacy-key");
        jail.set_env("QUERYGEM_AI__API_KEY", "prefixed-key");

        let config: GemConfig = GemConfig::figment().extract()?;
        assert_eq!(config.ai.api_key, "prefixed-key");
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".querygem")?;
        jail.create_file(
            ".querygem/config.toml",
            r#"
[ai]
model = "from-toml"
"#,
        )?;
        jail.set_env("QUERYGEM_AI__MODEL", "from-env");

        let config = GemConfig::load().expect("config loads");
        assert_eq!(config.ai.model, "from-env");
        Ok(())
    });
}

#[test]
fn invalid_endpoint_fails_load() {
    Jail::expect_with(|jail| {
        jail.set_env("QUERYGEM_AI__ENDPOINT", "ftp://example.com");

        let err = GemConfig::load().unwrap_err();
        assert!(err.to_string().contains("ai.endpoint"));
        Ok(())
    });
}
