//! CLI Commands

pub mod config;
pub mod customers;
pub mod plan;

use anyhow::Context;
use slotdesk_client::{Client, ClientConfig};
use slotdesk_console::Console;
use slotdesk_core::{GateConfig, GateError, TenantContext};
use std::sync::Arc;

/// Everything a gated command needs
pub struct Session {
    pub console: Console,
    pub tenant: TenantContext,
}

impl Session {
    pub fn new(
        api_url: &str,
        api_key: Option<&str>,
        tenant_id: Option<&str>,
        gate: GateConfig,
    ) -> anyhow::Result<Self> {
        let tenant_id = tenant_id
            .context("No tenant configured. Pass --tenant-id or run `slotdesk config set tenant_id <id>`")?;

        let client = Client::with_config(ClientConfig {
            base_url: api_url.to_string(),
            api_key: api_key.unwrap_or_default().to_string(),
            timeout: gate.request_timeout(),
            ..Default::default()
        })?;
        let client = Arc::new(client);

        Ok(Self {
            console: Console::new(client.clone(), client, gate),
            tenant: TenantContext::new(tenant_id),
        })
    }
}

/// User-facing error for a failed gated view; the cause goes to the log
pub fn gate_error(error: GateError) -> anyhow::Error {
    tracing::debug!(error = %error, "gated view failed");
    anyhow::anyhow!(error.load_failure_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotdesk_core::ResourceType;

    #[test]
    fn test_gate_error_hides_upstream_detail() {
        let error = gate_error(GateError::RecordSetUnavailable {
            resource: ResourceType::Customers,
            reason: "upstream unavailable: 503".into(),
        });
        assert_eq!(error.to_string(), "Unable to load customers. Please try again.");

        let error = gate_error(GateError::RecordNotFound {
            resource: ResourceType::Customers,
            id: "c9".into(),
        });
        assert_eq!(error.to_string(), "This customer no longer exists.");
    }
}
