use serde::Serialize;
use sha2::{Digest, Sha256};

/// Tunables for the academy core. Every field has an env override so scripted
/// sessions and tests can shrink timers without touching code.
#[derive(Clone, Serialize)]
pub struct Config {
    /// Fraction of the question bank that must be answered correctly.
    pub pass_ratio: f64,
    /// Credits granted on a passing assessment (fixed grant, not additive).
    pub reward_credits: i64,
    /// Cash mirrored into the portfolio on first trading activation.
    pub starting_balance: f64,
    /// Assessment countdown duration.
    pub assessment_secs: u64,
    /// Display-only assessment fee; never touches the user record.
    pub assessment_fee: f64,
    /// Market feed tick interval.
    pub tick_ms: u64,
    /// Symmetric bound on the per-tick price delta.
    pub price_jitter: f64,
    /// Simulated processing delay before a course purchase settles.
    pub purchase_settle_ms: u64,
    pub store_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            pass_ratio: std::env::var("PASS_RATIO").ok().and_then(|v| v.parse().ok()).unwrap_or(0.8),
            reward_credits: std::env::var("REWARD_CREDITS").ok().and_then(|v| v.parse().ok()).unwrap_or(10_000),
            starting_balance: std::env::var("STARTING_BALANCE").ok().and_then(|v| v.parse().ok()).unwrap_or(10_000.0),
            assessment_secs: std::env::var("ASSESSMENT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(1800),
            assessment_fee: std::env::var("ASSESSMENT_FEE").ok().and_then(|v| v.parse().ok()).unwrap_or(49.0),
            tick_ms: std::env::var("TICK_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            price_jitter: std::env::var("PRICE_JITTER").ok().and_then(|v| v.parse().ok()).unwrap_or(2.5),
            purchase_settle_ms: std::env::var("PURCHASE_SETTLE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(2000),
            store_path: std::env::var("STORE_PATH").unwrap_or_else(|_| "./academy.sqlite".to_string()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// SHA256 of the serialized config, for tagging logs and session records.
    pub fn config_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_json().as_bytes());
        hex::encode(hasher.finalize())
    }
}

pub fn ts_epoch_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

/// RFC3339 timestamp with milliseconds.
pub fn ts_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
