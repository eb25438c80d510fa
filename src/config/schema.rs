use crate::error::ConfigError;
use crate::links::types::LinkRules;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TOKEN_PLACEHOLDER: &str = "PUT-YOUR-BOT-TOKEN-HERE";

/// Written on first run so every knob is visible next to its default.
const DEFAULT_CONFIG_TOML: &str = r#"# Affilink configuration.

# Tag appended to every rewritten link, e.g. "mytag-21".
affiliate_tag = ""

# Host markers recognized as marketplace product pages.
marketplace_hosts = ["amazon."]

# Host markers recognized as redirecting short links.
shortener_hosts = ["amzn.to", "amzn.eu"]

# Domain used when building rewritten links.
reply_domain = "www.amazon.it"

# Timeout (seconds) for one short-link expansion request.
resolve_timeout_secs = 8

# Accept only the explicit /dp/, /gp/product/, /product/ and
# query-parameter forms; skip the permissive bare-segment fallback.
strict_segments = false

[channels.telegram]
# Get a token from @BotFather on Telegram.
bot_token = "PUT-YOUR-BOT-TOKEN-HERE"
# Telegram @usernames or numeric user IDs allowed to use the bot;
# "*" allows everyone.
allowed_users = ["*"]
"#;

/// Process-wide configuration, loaded once at startup and treated as
/// immutable for the process lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml, computed at load time, not serialized.
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Tag appended to every rewritten link.
    #[serde(default)]
    pub affiliate_tag: String,

    /// Host markers recognized as marketplace product pages.
    #[serde(default = "default_marketplace_hosts")]
    pub marketplace_hosts: Vec<String>,

    /// Host markers recognized as redirecting short links.
    #[serde(default = "default_shortener_hosts")]
    pub shortener_hosts: Vec<String>,

    /// Domain used when building rewritten links.
    #[serde(default = "default_reply_domain")]
    pub reply_domain: String,

    /// Timeout for one short-link expansion request. Tuned short so one
    /// dead origin cannot stall a message.
    #[serde(default = "default_resolve_timeout_secs")]
    pub resolve_timeout_secs: u64,

    /// Skip the permissive bare-segment fallback pattern.
    #[serde(default)]
    pub strict_segments: bool,

    #[serde(default)]
    pub channels: ChannelsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsConfig {
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(default = "default_allowed_users")]
    pub allowed_users: Vec<String>,
}

fn default_marketplace_hosts() -> Vec<String> {
    vec!["amazon.".into()]
}

fn default_shortener_hosts() -> Vec<String> {
    vec!["amzn.to".into(), "amzn.eu".into()]
}

fn default_reply_domain() -> String {
    "www.amazon.it".into()
}

fn default_resolve_timeout_secs() -> u64 {
    8
}

fn default_allowed_users() -> Vec<String> {
    vec!["*".into()]
}

impl Config {
    /// Load `~/.affilink/config.toml`, writing a commented default file on
    /// first run, then apply environment overrides for secrets.
    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;

        let mut config = Self::load_or_init_at(&home.join(".affilink"))?;
        config.override_secrets(
            std::env::var("AFFILINK_BOT_TOKEN").ok(),
            std::env::var("AFFILINK_TAG").ok(),
        );
        Ok(config)
    }

    fn load_or_init_at(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join("config.toml");

        if !config_path.exists() {
            fs::create_dir_all(dir)?;
            fs::write(&config_path, DEFAULT_CONFIG_TOML)?;
            tracing::info!(path = %config_path.display(), "wrote default config");
        }

        let contents = fs::read_to_string(&config_path)?;
        let mut config = Self::from_toml(&contents)?;
        config.config_path = config_path;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Environment wins over the file for secrets, so deployments can keep
    /// the token off disk entirely.
    pub fn override_secrets(&mut self, bot_token: Option<String>, affiliate_tag: Option<String>) {
        if let Some(token) = bot_token {
            match self.channels.telegram.as_mut() {
                Some(tg) => tg.bot_token = token,
                None => {
                    self.channels.telegram = Some(TelegramConfig {
                        bot_token: token,
                        allowed_users: default_allowed_users(),
                    });
                }
            }
        }
        if let Some(tag) = affiliate_tag {
            self.affiliate_tag = tag;
        }
    }

    /// Startup guard: refuse to run with a missing or placeholder token or
    /// an empty affiliate tag.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.affiliate_tag.trim().is_empty() {
            return Err(ConfigError::Validation("affiliate_tag is not set".into()));
        }

        let Some(tg) = &self.channels.telegram else {
            return Err(ConfigError::Validation(
                "no [channels.telegram] section in the config".into(),
            ));
        };
        if tg.bot_token.trim().is_empty() || tg.bot_token == TOKEN_PLACEHOLDER {
            return Err(ConfigError::Validation(
                "telegram bot_token is not set (get one from @BotFather)".into(),
            ));
        }

        Ok(())
    }

    /// The immutable matching rules handed to the pipeline.
    pub fn link_rules(&self) -> LinkRules {
        LinkRules {
            marketplace_hosts: self.marketplace_hosts.clone(),
            shortener_hosts: self.shortener_hosts.clone(),
            reply_domain: self.reply_domain.clone(),
            affiliate_tag: self.affiliate_tag.clone(),
            resolve_timeout: Duration::from_secs(self.resolve_timeout_secs),
            strict_segments: self.strict_segments,
        }
    }
}
