use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::*;

pub const CLAUDE_API_KEY_PLACEHOLDER: &str = "your_actual_claude_api_key_here";
const DEV_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Settings of the conversation backend that generates persona replies
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AssistantConfig {
    pub claude_api_key: Option<Secret<String>>,
    pub secret_key: Secret<String>,
    pub debug: bool,
    /// Number of messages sent to the model with each request
    pub max_conversation_history: usize,
    /// Response length limit
    pub default_max_tokens: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            claude_api_key: None,
            secret_key: Secret::new(DEV_SECRET_KEY.to_owned()),
            debug: true,
            max_conversation_history: 10,
            default_max_tokens: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigCheck {
    pub valid: bool,
    pub issues: Vec<String>,
}

impl AssistantConfig {
    fn claude_api_key_is_set(&self) -> bool {
        self.claude_api_key
            .as_ref()
            .map(|key| {
                let key = key.expose_secret();
                !key.is_empty() && key != CLAUDE_API_KEY_PLACEHOLDER
            })
            .unwrap_or(false)
    }

    pub fn uses_dev_secret_key(&self) -> bool {
        self.secret_key.expose_secret() == DEV_SECRET_KEY
    }

    pub fn validate(&self) -> ConfigCheck {
        let mut issues = vec![];
        let key_missing = self
            .claude_api_key
            .as_ref()
            .map(|key| key.expose_secret().is_empty())
            .unwrap_or(true);

        if key_missing {
            issues.push(String::from(
                "CLAUDE_API_KEY not found in environment variables",
            ));
        }
        if !self.claude_api_key_is_set() {
            issues.push(String::from(
                "CLAUDE_API_KEY needs to be set to your real API key",
            ));
        }

        ConfigCheck {
            valid: issues.is_empty(),
            issues,
        }
    }

    /// Logs the state of the assistant settings and returns whether they are usable
    pub fn check_environment(&self) -> bool {
        let check = self.validate();

        info!(
            "Claude API key: {}",
            if self.claude_api_key_is_set() {
                "set"
            } else {
                "missing"
            }
        );
        info!(
            "Debug mode: {}",
            if self.debug { "enabled" } else { "disabled" }
        );
        if self.uses_dev_secret_key() {
            warn!("Using development secret key");
        }

        if check.valid {
            info!("All configuration looks good");
        } else {
            for issue in &check.issues {
                warn!("Configuration issue: {}", issue);
            }
        }
        check.valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reports_both_issues() {
        let check = AssistantConfig::default().validate();
        assert!(!check.valid);
        assert_eq!(check.issues.len(), 2);
    }

    #[test]
    fn placeholder_key_is_not_real() {
        let config = AssistantConfig {
            claude_api_key: Some(Secret::new(CLAUDE_API_KEY_PLACEHOLDER.to_owned())),
            ..Default::default()
        };
        let check = config.validate();
        assert_eq!(
            check.issues,
            vec![String::from(
                "CLAUDE_API_KEY needs to be set to your real API key"
            )]
        );
        assert!(!config.check_environment());
    }

    #[test]
    fn real_key_is_valid() {
        let config = AssistantConfig {
            claude_api_key: Some(Secret::new(String::from("sk-ant-test"))),
            ..Default::default()
        };
        assert!(config.validate().valid);
        assert!(config.check_environment());
        assert!(config.uses_dev_secret_key());
    }

    #[test]
    fn defaults_match_backend_limits() {
        let config = AssistantConfig::default();
        assert_eq!(config.max_conversation_history, 10);
        assert_eq!(config.default_max_tokens, 300);
        assert!(config.debug);
    }
}
