use std::fmt;
use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

pub const CREDENTIAL_VAR: &str = "GROQ_API_KEY";
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_LANGUAGES: &[&str] = &["en", "en-IN", "hi"];

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub languages: Option<Vec<String>>,
    pub user_agent: Option<String>,
}

impl Config {
    /// Load config from ~/.config/urlsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("urlsum")
        .join("config.toml")
}

/// API key for the completion service; never printed
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Blank or missing values yield no credential
    pub fn from_value(value: Option<String>) -> Option<Self> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Credential)
    }

    pub fn from_env() -> Option<Self> {
        Self::from_value(std::env::var(CREDENTIAL_VAR).ok())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Resolved, read-only settings shared by every request
#[derive(Debug, Clone)]
pub struct Settings {
    pub credential: Option<Credential>,
    pub model: String,
    pub base_url: String,
    pub languages: Vec<String>,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credential: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Layer the config file over the defaults
    pub fn from_config(config: Config, credential: Option<Credential>) -> Self {
        let defaults = Settings::default();
        Self {
            credential,
            model: config.model.unwrap_or(defaults.model),
            base_url: config.base_url.unwrap_or(defaults.base_url),
            languages: config
                .languages
                .filter(|langs| !langs.is_empty())
                .unwrap_or(defaults.languages),
            user_agent: config.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
model = "llama-3.3-70b-versatile"
base_url = "http://localhost:8080/v1"
languages = ["de", "en"]
user_agent = "Mozilla/5.0 (X11; Linux x86_64)"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.as_deref(), Some("llama-3.3-70b-versatile"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.languages, Some(vec!["de".to_string(), "en".to_string()]));
        assert_eq!(config.user_agent.as_deref(), Some("Mozilla/5.0 (X11; Linux x86_64)"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.model.is_none());
        assert!(config.languages.is_none());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_config(Config::default(), None);
        assert_eq!(settings.model, "llama3-70b-8192");
        assert_eq!(settings.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(settings.languages, vec!["en", "en-IN", "hi"]);
        assert_eq!(settings.user_agent, "Mozilla/5.0");
        assert!(settings.credential.is_none());
    }

    #[test]
    fn test_settings_empty_language_list_falls_back() {
        let config: Config = toml::from_str("languages = []").unwrap();
        let settings = Settings::from_config(config, None);
        assert_eq!(settings.languages, vec!["en", "en-IN", "hi"]);
    }

    #[test]
    fn test_credential_blank_is_absent() {
        assert!(Credential::from_value(None).is_none());
        assert!(Credential::from_value(Some(String::new())).is_none());
        assert!(Credential::from_value(Some("   ".into())).is_none());
        let cred = Credential::from_value(Some(" gsk_abc ".into())).unwrap();
        assert_eq!(cred.expose(), "gsk_abc");
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let cred = Credential::from_value(Some("gsk_secret".into())).unwrap();
        assert!(!format!("{cred:?}").contains("gsk_secret"));
    }
}
