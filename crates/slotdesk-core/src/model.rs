//! Gate Data Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Tenant ID, as issued by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Wrap a raw tenant id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit tenant identity for one request.
///
/// Every resolver, store and adapter call takes this value; nothing in the
/// gate reads tenant identity from ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantContext {
    /// Tenant the request acts for
    pub tenant_id: TenantId,
}

impl TenantContext {
    /// Context for the given tenant
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: TenantId::new(tenant_id),
        }
    }
}

/// Resource types known to the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Customer records (plan-gated)
    Customers,
    /// Appointments
    Appointments,
    /// Staff members
    Employees,
}

impl ResourceType {
    /// Path segment and export prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Appointments => "appointments",
            Self::Employees => "employees",
        }
    }

    /// Singular noun for messages
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Customers => "customer",
            Self::Appointments => "appointment",
            Self::Employees => "employee",
        }
    }

    /// Whether the plan service caps this resource
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::Customers)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customers" => Ok(Self::Customers),
            "appointments" => Ok(Self::Appointments),
            "employees" => Ok(Self::Employees),
            other => Err(format!("unknown resource type: {}", other)),
        }
    }
}

/// One record of a resource.
///
/// Domain fields stay an open JSON object so every resource type shares the
/// same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Record id
    pub id: String,
    /// Creation timestamp, the ordering key
    pub created_at: DateTime<Utc>,
    /// Domain fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl ResourceRecord {
    /// Record with no domain fields
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            fields: serde_json::Map::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Field rendered as display text; empty when absent or null
    pub fn field_text(&self, key: &str) -> String {
        match self.fields.get(key) {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Oldest first, id ascending on equal timestamps
    pub fn creation_order(a: &Self, b: &Self) -> Ordering {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Case-insensitive substring match over id and string fields
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        if self.id.to_lowercase().contains(&needle) {
            return true;
        }
        self.fields.values().any(|v| match v {
            serde_json::Value::String(s) => s.to_lowercase().contains(&needle),
            serde_json::Value::Number(n) => n.to_string().contains(&needle),
            _ => false,
        })
    }
}

/// Query for one page of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Records per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl RecordQuery {
    /// Query for a specific page
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            query: None,
        }
    }

    /// Free-text query
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            query: Some(text.into()),
            ..Default::default()
        }
    }
}

/// One page returned by the record store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    /// Records on this page
    pub records: Vec<ResourceRecord>,
    /// Records across all pages
    pub total_records: u64,
    /// Page count at the requested page size
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_wire_format() {
        let json = r#"{"id":"c1","createdAt":"2024-03-01T10:00:00Z","name":"Ada","phone":null}"#;
        let record: ResourceRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "c1");
        assert_eq!(record.created_at, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        assert_eq!(record.field_text("name"), "Ada");
        assert_eq!(record.field_text("phone"), "");
        assert_eq!(record.field_text("missing"), "");
    }

    #[test]
    fn test_creation_order_tiebreak() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let a = ResourceRecord::new("b", t);
        let b = ResourceRecord::new("a", t);
        let c = ResourceRecord::new("a", t - chrono::Duration::seconds(1));

        assert_eq!(ResourceRecord::creation_order(&a, &b), Ordering::Greater);
        assert_eq!(ResourceRecord::creation_order(&c, &b), Ordering::Less);
    }

    #[test]
    fn test_matches_text() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = ResourceRecord::new("cust-7", t)
            .with_field("name", "Grace Hopper")
            .with_field("visits", 42);

        assert!(record.matches_text("grace"));
        assert!(record.matches_text("CUST-7"));
        assert!(record.matches_text("42"));
        assert!(!record.matches_text("turing"));
    }

    #[test]
    fn test_resource_type_parse() {
        assert_eq!("customers".parse::<ResourceType>().unwrap(), ResourceType::Customers);
        assert!("coupons".parse::<ResourceType>().is_err());
        assert!(ResourceType::Customers.is_gated());
        assert!(!ResourceType::Appointments.is_gated());
    }
}
