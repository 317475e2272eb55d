/// Cache configuration shared by manager constructors
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Entry lifetime applied when nothing else is configured.
pub const DEFAULT_EXPIRE_HOURS: u64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache entry lifetime in hours
    pub expire_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expire_hours: DEFAULT_EXPIRE_HOURS,
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            expire_hours: std::env::var("CACHE_EXPIRE_HOURS")
                .unwrap_or_else(|_| DEFAULT_EXPIRE_HOURS.to_string())
                .parse()
                .unwrap_or(DEFAULT_EXPIRE_HOURS),
        }
    }

    /// TTL applied to every cache save.
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.expire_hours * 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_day() {
        let config = CacheConfig::default();
        assert_eq!(config.expire_hours, 24);
        assert_eq!(config.lifetime(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_lifetime_converts_hours() {
        let config = CacheConfig { expire_hours: 2 };
        assert_eq!(config.lifetime(), Duration::from_secs(7_200));
    }

    #[test]
    fn test_from_env_falls_back_to_default() {
        // one test for all three cases so the env mutations cannot race
        std::env::remove_var("CACHE_EXPIRE_HOURS");
        assert_eq!(CacheConfig::from_env().expire_hours, DEFAULT_EXPIRE_HOURS);

        std::env::set_var("CACHE_EXPIRE_HOURS", "2");
        assert_eq!(CacheConfig::from_env().expire_hours, 2);

        std::env::set_var("CACHE_EXPIRE_HOURS", "abc");
        assert_eq!(CacheConfig::from_env().expire_hours, DEFAULT_EXPIRE_HOURS);

        std::env::remove_var("CACHE_EXPIRE_HOURS");
    }
}
