use std::time::Duration;

use fitslot_core::materialize::{validate_horizon_days, DEFAULT_HORIZON_DAYS};

/// Default period between full open-slot refreshes: 6 hours.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 21_600;

/// Open-slot materialization settings shared by the API and the worker.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Days, starting at trainer-local today, covered by open slots.
    pub horizon_days: u32,
    /// Period of the full refresh loop.
    pub interval: Duration,
}

impl RefreshConfig {
    /// Load from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `SLOT_HORIZON_DAYS`          | `180`   |
    /// | `SLOT_REFRESH_INTERVAL_SECS` | `21600` |
    pub fn from_env() -> Self {
        let horizon_days: u32 = std::env::var("SLOT_HORIZON_DAYS")
            .unwrap_or_else(|_| DEFAULT_HORIZON_DAYS.to_string())
            .parse()
            .expect("SLOT_HORIZON_DAYS must be a valid u32");
        validate_horizon_days(horizon_days).expect("SLOT_HORIZON_DAYS out of range");

        let interval_secs: u64 = std::env::var("SLOT_REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_INTERVAL_SECS.to_string())
            .parse()
            .expect("SLOT_REFRESH_INTERVAL_SECS must be a valid u64");

        Self {
            horizon_days,
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
        }
    }
}
