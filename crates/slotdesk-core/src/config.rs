//! Gate Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the search path treats locked records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPolicy {
    /// Search runs over the full set and surfaces locked records
    #[default]
    Bypass,
    /// Locked hits are blurred like list rows
    Enforce,
}

/// Access gate settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Upper bound for each upstream call (entitlement, one record page)
    pub request_timeout_ms: u64,
    /// Page size used when walking the full ordered set
    pub full_set_page_size: u32,
    /// Pages walked before the full set is reported unavailable
    pub max_full_set_pages: u32,
    /// Search path behavior
    pub search_policy: SearchPolicy,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            full_set_page_size: 100,
            max_full_set_pages: 1000,
            search_policy: SearchPolicy::Bypass,
        }
    }
}

impl GateConfig {
    /// Per-call timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
