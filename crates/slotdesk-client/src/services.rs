//! Endpoint services and the gate port implementations

use super::*;
use async_trait::async_trait;
use slotdesk_core::{
    EntitlementPayload, PlanService, RecordPage, RecordQuery, RecordStore, ResourceRecord,
    ResourceType, SourceError, TenantContext,
};

// Plans Service
pub struct PlansService {
    client: Client,
}

impl PlansService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// `GET /tenants/{tenant}/plan/limits/{resource}`
    pub async fn limits(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
    ) -> Result<EntitlementPayload> {
        self.client
            .get(
                &["tenants", tenant.tenant_id.as_str(), "plan", "limits", resource.as_str()],
                &[],
            )
            .await
    }
}

// Records Service
pub struct RecordsService {
    client: Client,
}

impl RecordsService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// `GET /tenants/{tenant}/{resource}?page=&pageSize=&query=`
    pub async fn list(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        query: &RecordQuery,
    ) -> Result<RecordPage> {
        let mut params = vec![];
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(page_size) = query.page_size {
            params.push(("pageSize", page_size.to_string()));
        }
        if let Some(text) = &query.query {
            params.push(("query", text.clone()));
        }

        self.client
            .get(&["tenants", tenant.tenant_id.as_str(), resource.as_str()], &params)
            .await
    }

    /// `GET /tenants/{tenant}/{resource}/{id}`
    pub async fn get(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        id: &str,
    ) -> Result<ResourceRecord> {
        self.client
            .get(&["tenants", tenant.tenant_id.as_str(), resource.as_str(), id], &[])
            .await
    }
}

#[async_trait]
impl PlanService for Client {
    async fn entitlement(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
    ) -> std::result::Result<EntitlementPayload, SourceError> {
        self.plans()
            .limits(tenant, resource)
            .await
            .map_err(|e| e.into_source_error(self.inner.config.timeout))
    }
}

#[async_trait]
impl RecordStore for Client {
    async fn records(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        query: &RecordQuery,
    ) -> std::result::Result<RecordPage, SourceError> {
        self.resources()
            .list(tenant, resource, query)
            .await
            .map_err(|e| e.into_source_error(self.inner.config.timeout))
    }

    async fn record(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        id: &str,
    ) -> std::result::Result<ResourceRecord, SourceError> {
        self.resources()
            .get(tenant, resource, id)
            .await
            .map_err(|e| e.into_source_error(self.inner.config.timeout))
    }
}
