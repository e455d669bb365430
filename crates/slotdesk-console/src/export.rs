//! Spreadsheet export of accessible records

use crate::banner::Banner;
use crate::loader::GateSnapshot;
use crate::Console;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use slotdesk_core::{GateError, GateResult, ResourceType, TenantContext};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Id written in the synthetic summary row
pub const SUMMARY_ROW_ID: &str = "SUMMARY";

const ID_COLUMN: &str = "id";
const CREATED_AT_COLUMN: &str = "createdAt";

/// `{resource}_{day}-{month}-{year}_{hour}-{minute}`
pub fn export_filename(resource: ResourceType, at: DateTime<Utc>) -> String {
    format!("{}_{}", resource, at.format("%d-%m-%Y_%H-%M"))
}

/// A rendered export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFile {
    /// File name without extension
    pub filename: String,
    /// Resource exported
    pub resource: ResourceType,
    /// Header row
    pub columns: Vec<String>,
    /// Data rows, summary row last
    pub rows: Vec<Vec<String>>,
    /// Ids of the exported records, oldest first
    pub exported_ids: Vec<String>,
    /// Summary text when records were withheld
    pub summary: Option<String>,
    /// Notices to show alongside the file
    pub banners: Vec<Banner>,
}

impl ExportFile {
    /// Build the export from the accessible part of a snapshot
    fn build(snapshot: &GateSnapshot, filename: String) -> Self {
        let resource = snapshot.entitlement.resource;
        let records = snapshot.accessible_records();
        let total = snapshot.decision.total_count;

        let field_columns: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.fields.keys().map(String::as_str))
            .collect();

        let mut columns = vec![ID_COLUMN.to_string(), CREATED_AT_COLUMN.to_string()];
        columns.extend(field_columns.iter().map(|c| c.to_string()));

        let mut rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| {
                let mut row = vec![
                    r.id.clone(),
                    r.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                ];
                row.extend(field_columns.iter().map(|c| r.field_text(c)));
                row
            })
            .collect();

        let exported = records.len();
        let excess = total.saturating_sub(exported);
        let summary = (excess > 0).then(|| {
            if snapshot.entitlement.is_unavailable() {
                format!(
                    "{} of {} {} exported; plan limits could not be confirmed, try again shortly",
                    exported, total, resource
                )
            } else {
                format!(
                    "{} of {} {} exported; {} {} require upgrade",
                    exported, total, resource, excess, resource
                )
            }
        });

        if let Some(text) = &summary {
            let mut row = vec![String::new(); columns.len()];
            row[0] = SUMMARY_ROW_ID.to_string();
            row[1] = text.clone();
            rows.push(row);
        }

        Self {
            filename,
            resource,
            columns,
            rows,
            exported_ids: records.iter().map(|r| r.id.clone()).collect(),
            summary,
            banners: Banner::for_decision(&snapshot.entitlement, &snapshot.decision),
        }
    }

    /// Encode as CSV
    pub fn to_csv(&self) -> GateResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.columns)
            .map_err(|e| GateError::Export(e.to_string()))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| GateError::Export(e.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|e| GateError::Export(e.to_string()))
    }

    /// Write `<dir>/<filename>.csv`
    pub fn write_to(&self, dir: &Path) -> GateResult<PathBuf> {
        let path = dir.join(format!("{}.csv", self.filename));
        std::fs::write(&path, self.to_csv()?)?;
        tracing::info!(path = %path.display(), rows = self.rows.len(), "export written");
        Ok(path)
    }
}

impl Console {
    /// Export the accessible records of a resource
    pub async fn export(&self, tenant: &TenantContext, resource: ResourceType) -> GateResult<ExportFile> {
        self.export_at(tenant, resource, Utc::now()).await
    }

    /// Export with an explicit timestamp for the file name
    pub async fn export_at(
        &self,
        tenant: &TenantContext,
        resource: ResourceType,
        at: DateTime<Utc>,
    ) -> GateResult<ExportFile> {
        let snapshot = self.snapshot(tenant, resource).await?;
        let file = ExportFile::build(&snapshot, export_filename(resource, at));

        tracing::debug!(
            tenant = %tenant.tenant_id,
            resource = %resource,
            exported = file.exported_ids.len(),
            withheld = snapshot.decision.excess_count,
            "export built"
        );

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use chrono::TimeZone;
    use slotdesk_core::{EntitlementPayload, ResourceRecord, SourceError};

    #[test]
    fn test_filename_convention() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(export_filename(ResourceType::Customers, at), "customers_07-03-2026_09-05");
    }

    #[tokio::test]
    async fn test_export_over_limit_adds_summary_row() {
        let fx = fixture(12, EntitlementPayload::finite(10));

        let file = fx.console.export(&fx.tenant, ResourceType::Customers).await.unwrap();
        let snapshot = fx.console.snapshot(&fx.tenant, ResourceType::Customers).await.unwrap();

        assert_eq!(file.rows.len(), 11);
        assert_eq!(file.exported_ids, snapshot.decision.accessible_ids);
        assert_eq!(file.rows[10][0], SUMMARY_ROW_ID);
        assert_eq!(file.rows[10][1], "10 of 12 customers exported; 2 customers require upgrade");
        assert_eq!(file.rows[10].len(), file.columns.len());
        assert!(file.rows.iter().all(|r| r[0] != "c11" && r[0] != "c12"));
    }

    #[tokio::test]
    async fn test_export_under_limit_has_no_summary() {
        let fx = fixture(8, EntitlementPayload::finite(10));

        let file = fx.console.export(&fx.tenant, ResourceType::Customers).await.unwrap();

        assert_eq!(file.rows.len(), 8);
        assert!(file.summary.is_none());
        assert!(file.rows.iter().all(|r| r[0] != SUMMARY_ROW_ID));
    }

    #[tokio::test]
    async fn test_export_zero_limit_only_summary() {
        let fx = fixture(10, EntitlementPayload::finite(0));

        let file = fx.console.export(&fx.tenant, ResourceType::Customers).await.unwrap();

        assert!(file.exported_ids.is_empty());
        assert_eq!(file.rows.len(), 1);
        assert_eq!(file.rows[0][1], "0 of 10 customers exported; 10 customers require upgrade");
    }

    #[tokio::test]
    async fn test_plan_outage_is_not_reported_as_upgrade() {
        let fx = fixture(5, EntitlementPayload::finite(10));
        fx.plans.fail(&fx.tenant, ResourceType::Customers, SourceError::Unavailable("down".into()));

        let file = fx.console.export(&fx.tenant, ResourceType::Customers).await.unwrap();

        assert!(file.exported_ids.is_empty());
        assert_eq!(
            file.summary.as_deref(),
            Some("0 of 5 customers exported; plan limits could not be confirmed, try again shortly")
        );
        assert_eq!(file.banners, vec![Banner::LimitUnknown { resource: ResourceType::Customers }]);
    }

    #[tokio::test]
    async fn test_large_export_keeps_creation_order() {
        let fx = fixture(0, EntitlementPayload::finite(4_900));
        let mut records = customers_at_scale(5_000);
        records.reverse();
        fx.store.set(&fx.tenant, ResourceType::Customers, records);

        let file = fx.console.export(&fx.tenant, ResourceType::Customers).await.unwrap();

        assert_eq!(file.exported_ids.len(), 4_900);
        assert_eq!(file.exported_ids.first().map(String::as_str), Some("r00000"));
        assert_eq!(file.exported_ids.last().map(String::as_str), Some("r04899"));
        assert_eq!(file.rows.len(), 4_901);
        assert_eq!(
            file.summary.as_deref(),
            Some("4900 of 5000 customers exported; 100 customers require upgrade")
        );
    }

    fn customers_at_scale(count: usize) -> Vec<ResourceRecord> {
        (0..count)
            .map(|i| ResourceRecord::new(format!("r{:05}", i), at(i as i64)))
            .collect()
    }

    #[tokio::test]
    async fn test_csv_encoding() {
        let fx = fixture(2, EntitlementPayload::finite(1));
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap();

        let file = fx
            .console
            .export_at(&fx.tenant, ResourceType::Customers, at)
            .await
            .unwrap();
        let csv = String::from_utf8(file.to_csv().unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(file.filename, "customers_19-10-2026_14-30");
        assert_eq!(lines[0], "id,createdAt,email,name");
        assert_eq!(lines[1], "c01,2024-05-01T08:01:00Z,customer1@example.com,Customer 1");
        assert_eq!(lines[2], "SUMMARY,1 of 2 customers exported; 1 customers require upgrade,,");
    }

    #[tokio::test]
    async fn test_write_to_dir() {
        let fx = fixture(3, EntitlementPayload::unlimited());
        let dir = tempfile::tempdir().unwrap();

        let file = fx.console.export(&fx.tenant, ResourceType::Customers).await.unwrap();
        let path = file.write_to(dir.path()).unwrap();

        assert!(path.ends_with(format!("{}.csv", file.filename)));
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written.lines().count(), 4);
    }
}
