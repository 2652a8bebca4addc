use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fetch::{FetchOptions, Retrigger, SettlementPolicy};

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchDefaults,
    /// Named endpoint paths (e.g. `plan_today = "/api/plan/pre/today"`).
    #[serde(default = "default_endpoints")]
    pub endpoints: BTreeMap<String, String>,
}

/// Backend the dashboard talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend (e.g. "http://127.0.0.1:8000").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

/// Default controller behaviour for views built from this config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchDefaults {
    #[serde(default = "default_immediate")]
    pub immediate: bool,
    #[serde(default)]
    pub retrigger: Retrigger,
    #[serde(default)]
    pub settlement: SettlementPolicy,
}

impl FetchDefaults {
    pub fn options<T>(&self) -> FetchOptions<T> {
        FetchOptions::new()
            .immediate(self.immediate)
            .retrigger(self.retrigger)
            .settlement(self.settlement)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_immediate() -> bool {
    true
}

fn default_endpoints() -> BTreeMap<String, String> {
    BTreeMap::from([("plan_today".to_string(), "/api/plan/pre/today".to_string())])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            fetch: FetchDefaults::default(),
            endpoints: default_endpoints(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for FetchDefaults {
    fn default() -> Self {
        Self {
            immediate: default_immediate(),
            retrigger: Retrigger::default(),
            settlement: SettlementPolicy::default(),
        }
    }
}
