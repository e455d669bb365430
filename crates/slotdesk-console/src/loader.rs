//! Entitlement and full-set loading shared by every adapter

use crate::Console;
use slotdesk_core::{
    select_accessible, AccessibilityDecision, Entitlement, GateError, GateResult, RecordPage,
    RecordQuery, ResourceRecord, ResourceType, SourceError, TenantContext,
};

/// Everything one adapter invocation knows about the gate
#[derive(Debug, Clone)]
pub struct GateSnapshot {
    /// Resolved (or fail-closed) entitlement
    pub entitlement: Entitlement,
    /// Full record set, oldest first
    pub records: Vec<ResourceRecord>,
    /// Partition of `records` under `entitlement`
    pub decision: AccessibilityDecision,
}

impl GateSnapshot {
    /// Record by id from the full set
    pub fn record(&self, id: &str) -> Option<&ResourceRecord> {
        self.decision.position(id).and_then(|i| self.records.get(i))
    }

    /// Accessible records, oldest first
    pub fn accessible_records(&self) -> &[ResourceRecord] {
        &self.records[..self.decision.accessible_count()]
    }
}

impl Console {
    /// Resolve the entitlement, then load the full set and decide.
    pub async fn snapshot(&self, tenant: &TenantContext, resource: ResourceType) -> GateResult<GateSnapshot> {
        let entitlement = self.resolver.resolve(tenant, resource).await;
        let records = self.full_set(tenant, resource).await?;
        Ok(self.decide(entitlement, records))
    }

    pub(crate) fn decide(&self, entitlement: Entitlement, mut records: Vec<ResourceRecord>) -> GateSnapshot {
        records.sort_by(ResourceRecord::creation_order);
        let decision = select_accessible(&records, &entitlement);

        tracing::debug!(
            tenant = %entitlement.tenant_id,
            resource = %entitlement.resource,
            limit = %entitlement.limit,
            total = decision.total_count,
            excess = decision.excess_count,
            "access decision"
        );

        GateSnapshot {
            entitlement,
            records,
            decision,
        }
    }

    /// Full ordered record set, walked page by page
    pub async fn full_set(&self, tenant: &TenantContext, resource: ResourceType) -> GateResult<Vec<ResourceRecord>> {
        self.collect_pages(tenant, resource, None).await
    }

    /// Every page of a query, concatenated
    pub(crate) async fn collect_pages(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        text: Option<&str>,
    ) -> GateResult<Vec<ResourceRecord>> {
        let page_size = self.config.full_set_page_size.max(1);
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let query = RecordQuery {
                page: Some(page),
                page_size: Some(page_size),
                query: text.map(String::from),
            };
            let result = self.fetch_page(tenant, resource, &query).await?;
            records.extend(result.records);

            if page >= result.total_pages {
                break;
            }
            if page >= self.config.max_full_set_pages {
                return Err(GateError::RecordSetUnavailable {
                    resource,
                    reason: format!(
                        "record set spans more than {} pages of {}",
                        self.config.max_full_set_pages, page_size
                    ),
                });
            }
            page += 1;
        }

        Ok(records)
    }

    /// One page, bounded by the request timeout
    pub(crate) async fn fetch_page(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        query: &RecordQuery,
    ) -> GateResult<RecordPage> {
        let timeout = self.config.request_timeout();
        tokio::time::timeout(timeout, self.store.records(tenant, resource, query))
            .await
            .unwrap_or(Err(SourceError::Timeout(timeout)))
            .map_err(|e| record_set_unavailable(tenant, resource, e))
    }

    /// One record from the detail endpoint, bounded by the request timeout
    pub(crate) async fn fetch_record(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        id: &str,
    ) -> GateResult<ResourceRecord> {
        let timeout = self.config.request_timeout();
        match tokio::time::timeout(timeout, self.store.record(tenant, resource, id))
            .await
            .unwrap_or(Err(SourceError::Timeout(timeout)))
        {
            Ok(record) => Ok(record),
            Err(SourceError::NotFound(_)) => Err(GateError::RecordNotFound {
                resource,
                id: id.to_string(),
            }),
            Err(e) => Err(record_set_unavailable(tenant, resource, e)),
        }
    }
}

fn record_set_unavailable(tenant: &TenantContext, resource: ResourceType, error: SourceError) -> GateError {
    tracing::warn!(tenant = %tenant.tenant_id, resource = %resource, error = %error, "record fetch failed");
    GateError::RecordSetUnavailable {
        resource,
        reason: error.to_string(),
    }
}
