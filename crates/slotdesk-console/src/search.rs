//! Text search over a resource

use crate::banner::Banner;
use crate::list::RowView;
use crate::Console;
use serde::{Deserialize, Serialize};
use slotdesk_core::{GateResult, ResourceType, SearchPolicy, TenantContext};

/// Search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchView {
    /// Resource searched
    pub resource: ResourceType,
    /// Query text
    pub query: String,
    /// Policy applied to the hits
    pub policy: SearchPolicy,
    /// Matching records
    pub hits: Vec<RowView>,
    /// Notices above the results
    pub banners: Vec<Banner>,
}

impl Console {
    /// Run a text query.
    ///
    /// Under [`SearchPolicy::Bypass`] the query runs over the full set and
    /// locked records come back unblurred. [`SearchPolicy::Enforce`] blurs
    /// them as the list view does.
    pub async fn search(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        query: &str,
    ) -> GateResult<SearchView> {
        let policy = self.config.search_policy;
        let entitlement = self.resolver.resolve(tenant, resource).await;

        let (hits, banners) = match policy {
            SearchPolicy::Bypass => {
                let records = self.collect_pages(tenant, resource, Some(query)).await?;
                let hits = records.into_iter().map(|record| RowView::Visible { record }).collect();
                let banners = Banner::for_entitlement(&entitlement);
                (hits, banners)
            }
            SearchPolicy::Enforce => {
                let (records, matches) = tokio::try_join!(
                    self.full_set(tenant, resource),
                    self.collect_pages(tenant, resource, Some(query)),
                )?;
                let snapshot = self.decide(entitlement, records);
                let banners = Banner::for_decision(&snapshot.entitlement, &snapshot.decision);
                (RowView::gate(matches, &snapshot), banners)
            }
        };

        tracing::debug!(
            tenant = %tenant.tenant_id,
            resource = %resource,
            ?policy,
            hits = hits.len(),
            "search"
        );

        Ok(SearchView {
            resource,
            query: query.to_string(),
            policy,
            hits,
            banners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use slotdesk_core::{EntitlementPayload, GateConfig};

    #[tokio::test]
    async fn test_bypass_surfaces_locked_record() {
        let fx = fixture(12, EntitlementPayload::finite(10));

        let view = fx
            .console
            .search(&fx.tenant, ResourceType::Customers, "Customer 12")
            .await
            .unwrap();

        assert_eq!(view.policy, SearchPolicy::Bypass);
        assert_eq!(view.hits.len(), 1);
        match &view.hits[0] {
            RowView::Visible { record } => assert_eq!(record.id, "c12"),
            other => panic!("expected visible hit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_enforce_blurs_locked_hits() {
        let config = GateConfig {
            search_policy: SearchPolicy::Enforce,
            ..Default::default()
        };
        let fx = fixture_with(12, EntitlementPayload::finite(10), config);

        // "Customer 1" matches c01, c10, c11, c12
        let view = fx
            .console
            .search(&fx.tenant, ResourceType::Customers, "Customer 1")
            .await
            .unwrap();

        let blurred: Vec<_> = view.hits.iter().filter(|h| h.is_blurred()).map(|h| h.id()).collect();
        assert_eq!(view.hits.len(), 4);
        assert_eq!(blurred, vec!["c11", "c12"]);
        assert!(matches!(view.banners[0], Banner::Excess { .. }));
    }

    #[tokio::test]
    async fn test_bypass_banners_match_entitlement() {
        let fx = fixture(12, EntitlementPayload::finite(10).expired("Plan lapsed"));

        let view = fx
            .console
            .search(&fx.tenant, ResourceType::Customers, "Customer")
            .await
            .unwrap();

        // No excess banner: bypassed search does not lock anything
        assert_eq!(view.banners, vec![Banner::PlanExpired { message: "Plan lapsed".into() }]);
        assert_eq!(view.hits.len(), 12);
        assert!(view.hits.iter().all(|h| !h.is_blurred()));
    }

    #[tokio::test]
    async fn test_no_matches() {
        let fx = fixture(5, EntitlementPayload::unlimited());

        let view = fx
            .console
            .search(&fx.tenant, ResourceType::Customers, "nobody")
            .await
            .unwrap();

        assert!(view.hits.is_empty());
        assert!(view.banners.is_empty());
    }
}
