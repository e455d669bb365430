//! View enforcement adapters
//!
//! Four independent call sites - list, detail, search and export - each
//! resolve the tenant's entitlement, load the full ordered record set and run
//! the same [`select_accessible`] decision before rendering.
//!
//! [`select_accessible`]: slotdesk_core::select_accessible

#![warn(missing_docs)]

pub mod banner;
pub mod detail;
pub mod export;
pub mod list;
pub mod loader;
pub mod search;

use slotdesk_core::{EntitlementResolver, GateConfig, PlanService, RecordStore};
use std::sync::Arc;

pub use banner::Banner;
pub use detail::DetailView;
pub use export::{export_filename, ExportFile, SUMMARY_ROW_ID};
pub use list::{ListView, RowView};
pub use loader::GateSnapshot;
pub use search::SearchView;

/// Entry point for every gated view.
///
/// Holds no per-request state; each call re-derives the decision from fresh
/// upstream reads.
#[derive(Clone)]
pub struct Console {
    resolver: EntitlementResolver,
    store: Arc<dyn RecordStore>,
    config: GateConfig,
}

impl Console {
    /// Console over a plan service and a record store
    pub fn new(plans: Arc<dyn PlanService>, store: Arc<dyn RecordStore>, config: GateConfig) -> Self {
        Self {
            resolver: EntitlementResolver::new(plans, config.request_timeout()),
            store,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use slotdesk_core::{
        EntitlementPayload, InMemoryPlanService, InMemoryRecordStore, ResourceRecord, ResourceType,
        TenantContext,
    };

    pub fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + chrono::Duration::minutes(minute)
    }

    /// Customers c01..cNN, c01 oldest, with name and email
    pub fn customers(count: usize) -> Vec<ResourceRecord> {
        (1..=count)
            .map(|i| {
                ResourceRecord::new(format!("c{:02}", i), at(i as i64))
                    .with_field("name", format!("Customer {}", i))
                    .with_field("email", format!("customer{}@example.com", i))
            })
            .collect()
    }

    pub struct Fixture {
        pub plans: Arc<InMemoryPlanService>,
        pub store: Arc<InMemoryRecordStore>,
        pub console: Console,
        pub tenant: TenantContext,
    }

    /// Tenant with `count` customers under the given plan payload
    pub fn fixture(count: usize, payload: EntitlementPayload) -> Fixture {
        fixture_with(count, payload, GateConfig::default())
    }

    pub fn fixture_with(count: usize, payload: EntitlementPayload, config: GateConfig) -> Fixture {
        let plans = Arc::new(InMemoryPlanService::new());
        let store = Arc::new(InMemoryRecordStore::new());
        let tenant = TenantContext::new("seller-1");

        plans.set(&tenant, ResourceType::Customers, payload);
        store.set(&tenant, ResourceType::Customers, customers(count));

        let console = Console::new(plans.clone(), store.clone(), config);
        Fixture { plans, store, console, tenant }
    }
}
