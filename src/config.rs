//! Engine configuration and the injected clock.
//!
//! Every time-dependent component takes the clock at construction instead
//! of calling `Utc::now()` directly, so tests can pin "now".

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engine configuration, loaded from the host application's config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Fraction of relevance an occurrence keeps per elapsed day.
    #[serde(default = "default_decay_per_day")]
    pub decay_per_day: f64,
    /// How many entries "featured" panels surface.
    #[serde(default = "default_featured_limit")]
    pub featured_limit: usize,
}

fn default_decay_per_day() -> f64 {
    0.95
}

fn default_featured_limit() -> usize {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decay_per_day: default_decay_per_day(),
            featured_limit: default_featured_limit(),
        }
    }
}

/// Supplier of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A pinned instant, for deterministic tests.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Shared clock handle passed into store constructors.
pub type SharedClock = Arc<dyn Clock>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.decay_per_day, 0.95);
        assert_eq!(config.featured_limit, 5);
    }

    #[test]
    fn test_config_deserializes_with_missing_fields() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.decay_per_day, 0.95);
    }

    #[test]
    fn test_config_overrides() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"decayPerDay": 0.9, "featuredLimit": 10}"#).unwrap();
        assert_eq!(config.decay_per_day, 0.9);
        assert_eq!(config.featured_limit, 10);
    }

    #[test]
    fn test_fixed_clock_is_pinned() {
        let instant = Utc::now();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
    }
}
