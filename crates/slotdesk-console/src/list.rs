//! Paginated list view

use crate::banner::Banner;
use crate::loader::GateSnapshot;
use crate::Console;
use serde::{Deserialize, Serialize};
use slotdesk_core::{GateResult, Limit, RecordQuery, ResourceRecord, ResourceType, TenantContext};

/// One row of a gated table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RowView {
    /// Accessible record, shown in full
    Visible {
        /// The record
        record: ResourceRecord,
    },
    /// Locked record; only its existence is shown
    Blurred {
        /// Record id
        id: String,
    },
}

impl RowView {
    /// Row id
    pub fn id(&self) -> &str {
        match self {
            RowView::Visible { record } => &record.id,
            RowView::Blurred { id } => id,
        }
    }

    /// Whether the row is blurred
    pub fn is_blurred(&self) -> bool {
        matches!(self, RowView::Blurred { .. })
    }

    /// Gate a page of records against a snapshot.
    ///
    /// A record missing from the snapshot was created after the full set was
    /// read; it is blurred unless the plan is unlimited.
    pub(crate) fn gate(records: Vec<ResourceRecord>, snapshot: &GateSnapshot) -> Vec<RowView> {
        let unlimited = snapshot.entitlement.limit == Limit::Unlimited;
        records
            .into_iter()
            .map(|record| {
                if unlimited || snapshot.decision.is_accessible(&record.id) {
                    RowView::Visible { record }
                } else {
                    RowView::Blurred { id: record.id }
                }
            })
            .collect()
    }
}

/// One page of a gated list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListView {
    /// Resource listed
    pub resource: ResourceType,
    /// 1-based page number
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
    /// Records across all pages
    pub total_records: u64,
    /// Page count
    pub total_pages: u32,
    /// Rows on this page
    pub rows: Vec<RowView>,
    /// Accessible records across the full set
    pub accessible_count: usize,
    /// Locked records across the full set
    pub excess_count: usize,
    /// Notices above the table
    pub banners: Vec<Banner>,
}

impl Console {
    /// Render one page of a gated list.
    ///
    /// The cutoff needs the full set, so the whole set is read alongside the
    /// requested page.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        page: u32,
        page_size: u32,
    ) -> GateResult<ListView> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let entitlement = self.resolver.resolve(tenant, resource).await;
        let query = RecordQuery::page(page, page_size);
        let (records, page_result) = tokio::try_join!(
            self.full_set(tenant, resource),
            self.fetch_page(tenant, resource, &query),
        )?;
        let snapshot = self.decide(entitlement, records);

        Ok(ListView {
            resource,
            page,
            page_size,
            total_records: page_result.total_records,
            total_pages: page_result.total_pages,
            rows: RowView::gate(page_result.records, &snapshot),
            accessible_count: snapshot.decision.accessible_count(),
            excess_count: snapshot.decision.excess_count,
            banners: Banner::for_decision(&snapshot.entitlement, &snapshot.decision),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use slotdesk_core::{EntitlementPayload, GateError, SourceError};

    fn blurred_ids(view: &ListView) -> Vec<&str> {
        view.rows.iter().filter(|r| r.is_blurred()).map(|r| r.id()).collect()
    }

    #[tokio::test]
    async fn test_last_page_blurs_newest() {
        let fx = fixture(12, EntitlementPayload::finite(10));

        let view = fx
            .console
            .list(&fx.tenant, ResourceType::Customers, 2, 10)
            .await
            .unwrap();

        assert_eq!(view.rows.len(), 2);
        assert_eq!(blurred_ids(&view), vec!["c11", "c12"]);
        assert_eq!(view.excess_count, 2);
        assert_eq!(view.total_records, 12);
        assert!(matches!(view.banners[0], Banner::Excess { excess: 2, .. }));
    }

    #[tokio::test]
    async fn test_first_page_uses_full_set_cutoff() {
        let fx = fixture(12, EntitlementPayload::finite(10));

        let view = fx
            .console
            .list(&fx.tenant, ResourceType::Customers, 1, 10)
            .await
            .unwrap();

        // Every row on page one is within the oldest ten, but the banner still shows
        assert!(blurred_ids(&view).is_empty());
        assert_eq!(view.banners.len(), 1);
    }

    #[tokio::test]
    async fn test_under_limit_no_banner() {
        let fx = fixture(8, EntitlementPayload::finite(10));

        let view = fx
            .console
            .list(&fx.tenant, ResourceType::Customers, 1, 20)
            .await
            .unwrap();

        assert_eq!(view.rows.len(), 8);
        assert!(blurred_ids(&view).is_empty());
        assert!(view.banners.is_empty());
    }

    #[tokio::test]
    async fn test_blurred_row_hides_content() {
        let fx = fixture(3, EntitlementPayload::finite(1));

        let view = fx
            .console
            .list(&fx.tenant, ResourceType::Customers, 1, 10)
            .await
            .unwrap();
        let json = serde_json::to_value(&view.rows[2]).unwrap();

        assert_eq!(json, serde_json::json!({ "state": "blurred", "id": "c03" }));
    }

    #[tokio::test]
    async fn test_plan_outage_blurs_everything() {
        let fx = fixture(4, EntitlementPayload::unlimited());
        fx.plans.fail(&fx.tenant, ResourceType::Customers, SourceError::Unavailable("down".into()));

        let view = fx
            .console
            .list(&fx.tenant, ResourceType::Customers, 1, 10)
            .await
            .unwrap();

        assert_eq!(blurred_ids(&view).len(), 4);
        assert_eq!(view.banners, vec![Banner::LimitUnknown { resource: ResourceType::Customers }]);
    }

    #[tokio::test]
    async fn test_store_outage_is_an_error_not_an_empty_page() {
        let fx = fixture(4, EntitlementPayload::finite(10));
        fx.store.fail_with(SourceError::Unavailable("503".into()));

        let result = fx.console.list(&fx.tenant, ResourceType::Customers, 1, 10).await;

        let err = result.unwrap_err();
        assert!(matches!(err, GateError::RecordSetUnavailable { .. }));
        assert_eq!(err.load_failure_message(), "Unable to load customers. Please try again.");
    }

    #[test]
    fn test_record_created_after_snapshot_is_blurred() {
        let fx = fixture(2, EntitlementPayload::finite(5));
        let snapshot = fx.console.decide(
            slotdesk_core::Entitlement::resolved(&fx.tenant, ResourceType::Customers, Limit::Finite(5)),
            customers(2),
        );

        let rows = RowView::gate(customers(3), &snapshot);
        assert!(!rows[1].is_blurred());
        assert!(rows[2].is_blurred());
    }
}
