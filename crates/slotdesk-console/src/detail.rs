//! Single-record detail view

use crate::banner::Banner;
use crate::Console;
use serde::{Deserialize, Serialize};
use slotdesk_core::{GateError, GateResult, ResourceRecord, ResourceType, TenantContext};

/// Outcome of opening one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailView {
    /// Accessible record
    Visible {
        /// Record from the detail endpoint
        record: ResourceRecord,
        /// Notices above the record
        banners: Vec<Banner>,
    },
    /// Locked record behind a full overlay
    Blocked {
        /// Requested id
        id: String,
        /// Overlay and notices
        banners: Vec<Banner>,
    },
}

impl DetailView {
    /// Whether the record is behind the overlay
    pub fn is_blocked(&self) -> bool {
        matches!(self, DetailView::Blocked { .. })
    }

    /// Notices for this view
    pub fn banners(&self) -> &[Banner] {
        match self {
            DetailView::Visible { banners, .. } | DetailView::Blocked { banners, .. } => banners,
        }
    }
}

impl Console {
    /// Open one record.
    ///
    /// Lock membership comes from the decision over the current full set;
    /// ids carry no ordering, so they are never compared directly.
    pub async fn detail(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        id: &str,
    ) -> GateResult<DetailView> {
        let snapshot = self.snapshot(tenant, resource).await?;
        let mut banners = Banner::for_decision(&snapshot.entitlement, &snapshot.decision);

        if snapshot.decision.is_locked(id) {
            tracing::debug!(tenant = %tenant.tenant_id, resource = %resource, id, "detail blocked");
            banners.insert(0, Banner::Locked { resource });
            return Ok(DetailView::Blocked {
                id: id.to_string(),
                banners,
            });
        }

        if !snapshot.decision.is_accessible(id) {
            return Err(GateError::RecordNotFound {
                resource,
                id: id.to_string(),
            });
        }

        let record = self.fetch_record(tenant, resource, id).await?;
        Ok(DetailView::Visible { record, banners })
    }
}
