//! Plan-Tier Resource Access Gate
//!
//! Caps how many records of a rate-limited resource a tenant may access once
//! their subscription quota is exceeded.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PLAN-TIER RESOURCE ACCESS GATE                     │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐  │
//! │  │ ENTITLEMENT RESOLVER │        │          RECORD STORE            │  │
//! │  │  PlanService (remote)│        │  paginated, createdAt ascending  │  │
//! │  │  fails closed → 0    │        │                                  │  │
//! │  └──────────┬───────────┘        └────────────────┬─────────────────┘  │
//! │             │                                     │                     │
//! │  ┌──────────▼─────────────────────────────────────▼─────────────────┐  │
//! │  │                   ACCESSIBILITY SELECTOR                          │  │
//! │  │     oldest N accessible │ newest (total - N) locked │ pure       │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │                                       │
//! │  ┌──────────┐  ┌──────────┐  ┌──▼───────┐  ┌──────────┐                │
//! │  │   List   │  │  Detail  │  │  Search  │  │  Export  │  (console)     │
//! │  └──────────┘  └──────────┘  └──────────┘  └──────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod access;
pub mod config;
pub mod entitlements;
pub mod error;
pub mod model;
pub mod ports;

pub use access::{select_accessible, AccessibilityDecision};
pub use config::{GateConfig, SearchPolicy};
pub use entitlements::{Entitlement, EntitlementPayload, EntitlementResolver, Limit, Resolution};
pub use error::{GateError, GateResult};
pub use model::{RecordPage, RecordQuery, ResourceRecord, ResourceType, TenantContext, TenantId};
pub use ports::{InMemoryPlanService, InMemoryRecordStore, PlanService, RecordStore, SourceError};
