//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::Path, sync::Arc};

use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;
use tracing::warn;

use super::types::Res;

/// Default name of the calm slash command.
fn default_calm_command() -> String {
    "/calm".to_string()
}

/// Configuration for the calm-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared, immutable configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// The configuration values themselves.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Slack app-level token used to open the Socket Mode session (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token used for Web API calls (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Name of the slash command the bot answers (`CALM_COMMAND`).
    #[serde(default = "default_calm_command")]
    pub calm_command: String,
}

impl Config {
    /// Loads the configuration from the environment and an optional TOML file.
    ///
    /// If no path is given, `.hidden/config.toml` is used when it exists.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default());

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        Self::from_builder(cfg)
    }

    /// Builds and validates the configuration from a prepared builder.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Res<Self> {
        let result = Config {
            inner: Arc::new(builder.build()?.try_deserialize()?),
        };

        if result.slack_app_token.is_empty() {
            return Err(anyhow::anyhow!("Slack app token (`SLACK_APP_TOKEN`) must not be empty."));
        }

        if result.slack_bot_token.is_empty() {
            return Err(anyhow::anyhow!("Slack bot token (`SLACK_BOT_TOKEN`) must not be empty."));
        }

        if !result.calm_command.starts_with('/') || result.calm_command.len() < 2 {
            return Err(anyhow::anyhow!("Calm command must be a `/`-prefixed command name."));
        }

        if !result.slack_app_token.starts_with("xapp-") {
            warn!("Slack app token does not start with `xapp-`; Socket Mode will likely reject it.");
        }

        if !result.slack_bot_token.starts_with("xoxb-") {
            warn!("Slack bot token does not start with `xoxb-`.");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use config::{File, FileFormat};

    use super::*;

    fn from_toml(toml: &str) -> Res<Config> {
        Config::from_builder(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn loads_tokens_and_defaults_the_command() {
        let config = from_toml(
            r#"
            slack_app_token = "xapp-1-test"
            slack_bot_token = "xoxb-test"
            "#,
        )
        .unwrap();

        assert_eq!(config.slack_app_token, "xapp-1-test");
        assert_eq!(config.slack_bot_token, "xoxb-test");
        assert_eq!(config.calm_command, "/calm");
    }

    #[test]
    fn missing_app_token_fails() {
        let result = from_toml(r#"slack_bot_token = "xoxb-test""#);

        assert!(result.is_err());
    }

    #[test]
    fn missing_bot_token_fails() {
        let result = from_toml(r#"slack_app_token = "xapp-1-test""#);

        assert!(result.is_err());
    }

    #[test]
    fn empty_token_fails() {
        let result = from_toml(
            r#"
            slack_app_token = ""
            slack_bot_token = "xoxb-test"
            "#,
        );

        assert!(result.unwrap_err().to_string().contains("SLACK_APP_TOKEN"));
    }

    #[test]
    fn command_must_start_with_slash() {
        let result = from_toml(
            r#"
            slack_app_token = "xapp-1-test"
            slack_bot_token = "xoxb-test"
            calm_command = "calm"
            "#,
        );

        assert!(result.is_err());
    }
}
