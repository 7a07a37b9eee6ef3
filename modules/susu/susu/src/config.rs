use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SusuConfig {
    #[serde(default = "default_max_field_length")]
    pub max_field_length: usize,
    /// Longest savings account, in months. Every month schedules up to 31
    /// markings inside one transaction.
    #[serde(default = "default_max_duration_months")]
    pub max_duration_months: i32,
    #[serde(default)]
    pub marking_status: MarkingStatusConfig,
}

impl Default for SusuConfig {
    fn default() -> Self {
        Self {
            max_field_length: default_max_field_length(),
            max_duration_months: default_max_duration_months(),
            marking_status: MarkingStatusConfig::default(),
        }
    }
}

fn default_max_field_length() -> usize {
    100
}

fn default_max_duration_months() -> i32 {
    60
}

/// Status domain of savings markings.
///
/// `default` is the status a scheduled marking starts in; a marking can only
/// be paid from that status, and paying moves it to `paid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkingStatusConfig {
    pub allowed: Vec<String>,
    pub default: String,
    pub paid: String,
}

impl Default for MarkingStatusConfig {
    fn default() -> Self {
        Self {
            allowed: vec!["pending".to_owned(), "paid".to_owned()],
            default: "pending".to_owned(),
            paid: "paid".to_owned(),
        }
    }
}

impl MarkingStatusConfig {
    #[must_use]
    pub fn is_allowed(&self, status: &str) -> bool {
        self.allowed.iter().any(|s| s == status)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("susu.max_field_length must be greater than zero")]
    ZeroFieldLength,
    #[error("susu.max_duration_months must be greater than zero")]
    NonPositiveDuration,
    #[error("susu.marking_status.allowed must not be empty")]
    EmptyStatusDomain,
    #[error("susu.marking_status.{key} '{value}' is not in allowed")]
    StatusNotAllowed { key: &'static str, value: String },
    #[error("susu.marking_status.default and paid must differ")]
    PaidIsDefault,
}

impl SusuConfig {
    /// Check the configuration once at startup.
    ///
    /// # Errors
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_field_length == 0 {
            return Err(ConfigError::ZeroFieldLength);
        }
        if self.max_duration_months <= 0 {
            return Err(ConfigError::NonPositiveDuration);
        }
        let status = &self.marking_status;
        if status.allowed.is_empty() {
            return Err(ConfigError::EmptyStatusDomain);
        }
        for (key, value) in [("default", &status.default), ("paid", &status.paid)] {
            if !status.is_allowed(value) {
                return Err(ConfigError::StatusNotAllowed {
                    key,
                    value: value.clone(),
                });
            }
        }
        if status.default == status.paid {
            return Err(ConfigError::PaidIsDefault);
        }
        Ok(())
    }
}
