//! Tenant Entitlements and fail-closed resolution
//!
//! The resolver never hands out `Unlimited` unless the plan service said so:
//! transport errors, malformed payloads and timeouts all resolve to
//! `Finite(0)`.

use crate::error::{GateError, GateResult};
use crate::model::{ResourceType, TenantContext, TenantId};
use crate::ports::{PlanService, SourceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Keyword the plan service uses for uncapped plans
pub const UNLIMITED_KEYWORD: &str = "unlimited";

/// Record allowance for a resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    /// No cap
    Unlimited,
    /// At most this many records
    Finite(u64),
}

impl Limit {
    /// Cap as a count; `None` when unlimited
    pub fn cap(&self) -> Option<u64> {
        match self {
            Limit::Unlimited => None,
            Limit::Finite(n) => Some(*n),
        }
    }

    /// Whether `total` records fit under the limit
    pub fn allows(&self, total: u64) -> bool {
        match self {
            Limit::Unlimited => true,
            Limit::Finite(n) => total <= *n,
        }
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Unlimited => f.write_str(UNLIMITED_KEYWORD),
            Limit::Finite(n) => write!(f, "{}", n),
        }
    }
}

/// `limit` as it appears on the wire: an integer or a keyword
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLimit {
    /// Non-negative numeric limit
    Count(u64),
    /// Negative numeric limit; always rejected
    Negative(i64),
    /// Keyword limit; only `"unlimited"` is valid
    Keyword(String),
}

impl TryFrom<&RawLimit> for Limit {
    type Error = GateError;

    fn try_from(raw: &RawLimit) -> Result<Self, Self::Error> {
        match raw {
            RawLimit::Count(n) => Ok(Limit::Finite(*n)),
            RawLimit::Negative(n) => Err(GateError::InvalidEntitlement(format!("negative limit {}", n))),
            RawLimit::Keyword(k) if k.trim().eq_ignore_ascii_case(UNLIMITED_KEYWORD) => Ok(Limit::Unlimited),
            RawLimit::Keyword(k) => Err(GateError::InvalidEntitlement(format!("unknown limit {:?}", k))),
        }
    }
}

/// Entitlement payload returned by the plan service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementPayload {
    /// Integer or `"unlimited"`
    pub limit: RawLimit,
    /// Records the plan service counts against the limit
    #[serde(default)]
    pub current: u64,
    /// Subscription has lapsed
    #[serde(default)]
    pub plan_expired: bool,
    /// Message to show when the plan has lapsed
    #[serde(default)]
    pub expiry_message: String,
}

impl EntitlementPayload {
    /// Finite payload; a negative count is kept as-is and rejected on resolve
    pub fn finite(limit: i64) -> Self {
        let limit = u64::try_from(limit).map_or(RawLimit::Negative(limit), RawLimit::Count);
        Self {
            limit,
            current: 0,
            plan_expired: false,
            expiry_message: String::new(),
        }
    }

    /// Uncapped payload
    pub fn unlimited() -> Self {
        Self {
            limit: RawLimit::Keyword(UNLIMITED_KEYWORD.to_string()),
            ..Self::finite(0)
        }
    }

    /// Mark the plan expired
    pub fn expired(mut self, message: impl Into<String>) -> Self {
        self.plan_expired = true;
        self.expiry_message = message.into();
        self
    }
}

/// How an entitlement was obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Read from the plan service
    Resolved,
    /// Plan service failed; limit forced to zero
    Unavailable,
}

/// A tenant's current allowance for one resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Tenant
    pub tenant_id: TenantId,
    /// Resource
    pub resource: ResourceType,
    /// Allowance
    pub limit: Limit,
    /// Usage as counted by the plan service
    pub current: u64,
    /// Subscription has lapsed
    pub plan_expired: bool,
    /// Message to show when the plan has lapsed
    pub expiry_message: String,
    /// Where the limit came from
    pub resolution: Resolution,
}

impl Entitlement {
    /// Validate a plan service payload.
    ///
    /// An expired plan keeps its last finite limit; expiry only adds a banner.
    pub fn from_payload(
        tenant: &TenantContext,
        resource: ResourceType,
        payload: &EntitlementPayload,
    ) -> GateResult<Self> {
        let limit = Limit::try_from(&payload.limit)?;
        Ok(Self {
            tenant_id: tenant.tenant_id.clone(),
            resource,
            limit,
            current: payload.current,
            plan_expired: payload.plan_expired,
            expiry_message: payload.expiry_message.clone(),
            resolution: Resolution::Resolved,
        })
    }

    /// Minimal-access entitlement used whenever the plan service cannot answer
    pub fn fail_closed(tenant: &TenantContext, resource: ResourceType) -> Self {
        Self {
            tenant_id: tenant.tenant_id.clone(),
            resource,
            limit: Limit::Finite(0),
            current: 0,
            plan_expired: false,
            expiry_message: String::new(),
            resolution: Resolution::Unavailable,
        }
    }

    /// Convenience constructor for a resolved entitlement
    pub fn resolved(tenant: &TenantContext, resource: ResourceType, limit: Limit) -> Self {
        Self {
            limit,
            resolution: Resolution::Resolved,
            ..Self::fail_closed(tenant, resource)
        }
    }

    /// True when the limit is a fail-closed default
    pub fn is_unavailable(&self) -> bool {
        self.resolution == Resolution::Unavailable
    }
}

/// Resolves entitlements from the plan service, failing closed.
#[derive(Clone)]
pub struct EntitlementResolver {
    plans: Arc<dyn PlanService>,
    timeout: Duration,
}

impl EntitlementResolver {
    /// Resolver over a plan service with a per-call deadline
    pub fn new(plans: Arc<dyn PlanService>, timeout: Duration) -> Self {
        Self { plans, timeout }
    }

    /// Current entitlement; never fails and never defaults to unlimited
    pub async fn resolve(&self, tenant: &TenantContext, resource: ResourceType) -> Entitlement {
        match self.try_resolve(tenant, resource).await {
            Ok(entitlement) => {
                tracing::debug!(
                    tenant = %tenant.tenant_id,
                    resource = %resource,
                    limit = %entitlement.limit,
                    plan_expired = entitlement.plan_expired,
                    "entitlement resolved"
                );
                entitlement
            }
            Err(e) => {
                tracing::warn!(
                    tenant = %tenant.tenant_id,
                    resource = %resource,
                    error = %e,
                    "entitlement unavailable, failing closed"
                );
                Entitlement::fail_closed(tenant, resource)
            }
        }
    }

    async fn try_resolve(&self, tenant: &TenantContext, resource: ResourceType) -> GateResult<Entitlement> {
        let payload = tokio::time::timeout(self.timeout, self.plans.entitlement(tenant, resource))
            .await
            .unwrap_or(Err(SourceError::Timeout(self.timeout)))
            .map_err(|e| GateError::EntitlementUnavailable {
                resource,
                reason: e.to_string(),
            })?;

        Entitlement::from_payload(tenant, resource, &payload)
    }
}
