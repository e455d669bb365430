//! Notices rendered above gated views

use serde::{Deserialize, Serialize};
use slotdesk_core::{AccessibilityDecision, Entitlement, ResourceType};
use std::fmt;

/// A notice attached to a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Banner {
    /// Some records exceed the plan limit
    Excess {
        /// Resource
        resource: ResourceType,
        /// Records in the full set
        total: usize,
        /// Plan limit
        limit: u64,
        /// Locked records
        excess: usize,
    },
    /// Subscription has lapsed
    PlanExpired {
        /// Message from the plan service
        message: String,
    },
    /// Plan service could not be read; access is minimal
    LimitUnknown {
        /// Resource
        resource: ResourceType,
    },
    /// Full block overlay over a locked record
    Locked {
        /// Resource
        resource: ResourceType,
    },
}

impl Banner {
    /// Banners that depend on the entitlement alone
    pub fn for_entitlement(entitlement: &Entitlement) -> Vec<Banner> {
        let mut banners = Vec::new();

        if entitlement.is_unavailable() {
            banners.push(Banner::LimitUnknown {
                resource: entitlement.resource,
            });
        }
        if entitlement.plan_expired {
            banners.push(Banner::PlanExpired {
                message: entitlement.expiry_message.clone(),
            });
        }

        banners
    }

    /// Banners shared by the list, detail, search and export views
    pub fn for_decision(entitlement: &Entitlement, decision: &AccessibilityDecision) -> Vec<Banner> {
        let mut banners = Self::for_entitlement(entitlement);

        // A fail-closed limit of zero is not a plan limit; LimitUnknown covers it
        if !entitlement.is_unavailable() && decision.has_excess() {
            if let Some(limit) = decision.limit_count {
                banners.push(Banner::Excess {
                    resource: entitlement.resource,
                    total: decision.total_count,
                    limit,
                    excess: decision.excess_count,
                });
            }
        }

        banners
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Banner::Excess { resource, total, limit, excess } => write!(
                f,
                "You have {} {} but your plan includes {}. The {} newest are locked; upgrade your plan to access them.",
                total, resource, limit, excess
            ),
            Banner::PlanExpired { message } if message.trim().is_empty() => {
                f.write_str("Your plan has expired. Renew it to keep full access.")
            }
            Banner::PlanExpired { message } => f.write_str(message),
            Banner::LimitUnknown { resource } => write!(
                f,
                "We couldn't confirm your plan limits, so access to {} is limited for now. Please try again shortly.",
                resource
            ),
            Banner::Locked { resource } => write!(
                f,
                "This {} is beyond your plan's limit. Upgrade your plan to view it.",
                resource.singular()
            ),
        }
    }
}
