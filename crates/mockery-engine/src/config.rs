//! Mockery configuration

use std::env;

/// Environment variable toggling parameter type restriction checks
pub const CHECK_TYPES_ENV: &str = "MOCKERY_CHECK_TYPES";

/// Environment variable toggling warnings for unexpected calls
pub const LOG_UNEXPECTED_ENV: &str = "MOCKERY_LOG_UNEXPECTED";

/// Settings applied to every mock a [`Mockery`](crate::Mockery) creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockeryConfig {
    /// Reject arguments that violate a parameter's type restriction
    pub check_type_restrictions: bool,
    /// Emit a `warn!` event for each unexpected call during replay
    pub log_unexpected_calls: bool,
}

impl Default for MockeryConfig {
    fn default() -> Self {
        Self {
            check_type_restrictions: true,
            log_unexpected_calls: true,
        }
    }
}

impl MockeryConfig {
    /// Defaults, overridden by `MOCKERY_CHECK_TYPES` and `MOCKERY_LOG_UNEXPECTED`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            check_type_restrictions: env_flag(CHECK_TYPES_ENV, defaults.check_type_restrictions),
            log_unexpected_calls: env_flag(LOG_UNEXPECTED_ENV, defaults.log_unexpected_calls),
        }
    }

    /// Set `check_type_restrictions`
    pub fn with_type_checks(mut self, enabled: bool) -> Self {
        self.check_type_restrictions = enabled;
        self
    }

    /// Set `log_unexpected_calls`
    pub fn with_unexpected_logging(mut self, enabled: bool) -> Self {
        self.log_unexpected_calls = enabled;
        self
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name).map_or(default, |value| parse_flag(&value, default))
}

fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "0" | "false" | "off" | "no" => false,
        "1" | "true" | "on" | "yes" => true,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MockeryConfig::default();
        assert!(config.check_type_restrictions);
        assert!(config.log_unexpected_calls);
    }

    #[test]
    fn test_parse_flag() {
        assert!(!parse_flag("0", true));
        assert!(!parse_flag("OFF", true));
        assert!(!parse_flag(" false ", true));
        assert!(parse_flag("on", false));
        assert!(parse_flag("garbage", true));
        assert!(!parse_flag("garbage", false));
    }

    #[test]
    fn test_builders() {
        let config = MockeryConfig::default()
            .with_type_checks(false)
            .with_unexpected_logging(false);
        assert!(!config.check_type_restrictions);
        assert!(!config.log_unexpected_calls);
    }
}
