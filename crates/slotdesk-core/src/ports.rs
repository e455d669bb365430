//! Collaborator ports - the plan service and the record store
//!
//! Both are owned by the remote API; the gate only reads from them. The HTTP
//! implementations live in `slotdesk-client`, the in-memory ones here back
//! tests and local development.

use crate::entitlements::EntitlementPayload;
use crate::model::{RecordPage, RecordQuery, ResourceRecord, ResourceType, TenantContext, TenantId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Default page size when a query names none
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Collaborator errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Upstream unreachable or returned an error status
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// Payload did not match the contract
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Call exceeded its deadline
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Plan/subscription state for a tenant
#[async_trait]
pub trait PlanService: Send + Sync {
    /// Current entitlement payload for a resource
    async fn entitlement(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
    ) -> Result<EntitlementPayload, SourceError>;
}

/// Paginated record source.
///
/// Without a text query, records come back ordered by `createdAt` ascending.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// One page of records
    async fn records(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        query: &RecordQuery,
    ) -> Result<RecordPage, SourceError>;

    /// Single record by id
    async fn record(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        id: &str,
    ) -> Result<ResourceRecord, SourceError>;
}

type Key = (TenantId, ResourceType);

/// In-memory plan service
#[derive(Default)]
pub struct InMemoryPlanService {
    entries: RwLock<HashMap<Key, Result<EntitlementPayload, SourceError>>>,
    delay: RwLock<Option<Duration>>,
    calls: AtomicUsize,
}

impl InMemoryPlanService {
    /// Empty service; unknown tenants are reported unavailable
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload returned for a tenant/resource
    pub fn set(&self, tenant: &TenantContext, resource: ResourceType, payload: EntitlementPayload) {
        self.entries
            .write()
            .insert((tenant.tenant_id.clone(), resource), Ok(payload));
    }

    /// Make a tenant/resource fail with the given error
    pub fn fail(&self, tenant: &TenantContext, resource: ResourceType, error: SourceError) {
        self.entries
            .write()
            .insert((tenant.tenant_id.clone(), resource), Err(error));
    }

    /// Delay every response
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write() = Some(delay);
    }

    /// Number of entitlement calls served
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PlanService for InMemoryPlanService {
    async fn entitlement(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
    ) -> Result<EntitlementPayload, SourceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.entries
            .read()
            .get(&(tenant.tenant_id.clone(), resource))
            .cloned()
            .unwrap_or_else(|| Err(SourceError::Unavailable(format!("no plan for tenant {}", tenant.tenant_id))))
    }
}

/// In-memory record store
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<Key, Vec<ResourceRecord>>>,
    failure: RwLock<Option<SourceError>>,
    delay: RwLock<Option<Duration>>,
    page_calls: AtomicUsize,
}

impl InMemoryRecordStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record set of a tenant/resource
    pub fn set(&self, tenant: &TenantContext, resource: ResourceType, records: Vec<ResourceRecord>) {
        self.records
            .write()
            .insert((tenant.tenant_id.clone(), resource), records);
    }

    /// Append one record
    pub fn insert(&self, tenant: &TenantContext, resource: ResourceType, record: ResourceRecord) {
        self.records
            .write()
            .entry((tenant.tenant_id.clone(), resource))
            .or_default()
            .push(record);
    }

    /// Make every call fail
    pub fn fail_with(&self, error: SourceError) {
        *self.failure.write() = Some(error);
    }

    /// Delay every response
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write() = Some(delay);
    }

    /// Number of page requests served
    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::Relaxed)
    }

    async fn gate(&self) -> Result<(), SourceError> {
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.failure.read().clone();
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn ordered(&self, tenant: &TenantContext, resource: ResourceType) -> Vec<ResourceRecord> {
        let mut records = self
            .records
            .read()
            .get(&(tenant.tenant_id.clone(), resource))
            .cloned()
            .unwrap_or_default();
        records.sort_by(ResourceRecord::creation_order);
        records
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn records(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        query: &RecordQuery,
    ) -> Result<RecordPage, SourceError> {
        self.page_calls.fetch_add(1, Ordering::Relaxed);
        self.gate().await?;

        let mut records = self.ordered(tenant, resource);
        if let Some(text) = query.query.as_deref() {
            records.retain(|r| r.matches_text(text));
        }

        let total = records.len();
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1) as usize;
        let page = query.page.unwrap_or(1).max(1) as usize;
        let total_pages = total.div_ceil(page_size);

        let records = records
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        Ok(RecordPage {
            records,
            total_records: total as u64,
            total_pages: total_pages as u32,
        })
    }

    async fn record(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        id: &str,
    ) -> Result<ResourceRecord, SourceError> {
        self.gate().await?;
        self.ordered(tenant, resource)
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, minute: u32) -> ResourceRecord {
        ResourceRecord::new(id, Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap())
    }

    #[tokio::test]
    async fn test_record_store_orders_and_pages() {
        let store = InMemoryRecordStore::new();
        let tenant = TenantContext::new("t1");

        store.set(
            &tenant,
            ResourceType::Customers,
            vec![record("c", 3), record("a", 1), record("b", 2)],
        );

        let page = store
            .records(&tenant, ResourceType::Customers, &RecordQuery::page(1, 2))
            .await
            .unwrap();
        let ids: Vec<_> = page.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(page.total_records, 3);
        assert_eq!(page.total_pages, 2);

        let page = store
            .records(&tenant, ResourceType::Customers, &RecordQuery::page(2, 2))
            .await
            .unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "c");
    }

    #[tokio::test]
    async fn test_record_store_is_tenant_scoped() {
        let store = InMemoryRecordStore::new();
        let t1 = TenantContext::new("t1");
        let t2 = TenantContext::new("t2");

        store.insert(&t1, ResourceType::Customers, record("a", 1));

        let page = store
            .records(&t2, ResourceType::Customers, &RecordQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total_records, 0);
        assert!(store.record(&t2, ResourceType::Customers, "a").await.is_err());
    }

    #[test]
    fn test_plan_service_unknown_tenant() {
        let plans = InMemoryPlanService::new();
        let result = tokio_test::block_on(
            plans.entitlement(&TenantContext::new("nobody"), ResourceType::Customers),
        );

        assert!(matches!(result, Err(SourceError::Unavailable(_))));
        assert_eq!(plans.calls(), 1);
    }

    #[tokio::test]
    async fn test_record_store_failure() {
        let store = InMemoryRecordStore::new();
        store.fail_with(SourceError::Unavailable("503".into()));

        let result = store
            .records(&TenantContext::new("t1"), ResourceType::Customers, &RecordQuery::default())
            .await;
        assert_eq!(result, Err(SourceError::Unavailable("503".into())));
    }
}
