//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use slotdesk_console::{Banner, RowView};
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse a `default_format` value from the config file
    pub fn from_config(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| Self::from_str(v, true).ok())
    }

    pub fn print<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(data)?);
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data)?);
            }
        }
        Ok(())
    }

    pub fn is_table(&self) -> bool {
        matches!(self, OutputFormat::Table)
    }
}

pub fn print_banners(banners: &[Banner]) {
    for banner in banners {
        let line = banner.to_string();
        match banner {
            Banner::Locked { .. } | Banner::LimitUnknown { .. } => eprintln!("{}", line.red().bold()),
            Banner::Excess { .. } | Banner::PlanExpired { .. } => eprintln!("{}", line.yellow()),
        }
    }
}

/// Render gated rows; blurred rows keep their place with masked cells
pub fn rows_table(rows: &[RowView], columns: &[&str]) -> String {
    let mut builder = Builder::default();
    let mut header = vec!["id".to_string(), "created".to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));
    builder.push_record(header);

    for row in rows {
        let record = match row {
            RowView::Visible { record } => {
                let mut cells = vec![
                    record.id.clone(),
                    record.created_at.format("%Y-%m-%d %H:%M").to_string(),
                ];
                cells.extend(columns.iter().map(|c| record.field_text(c)));
                cells
            }
            RowView::Blurred { id } => {
                let mut cells = vec![id.clone(), BLURRED.to_string()];
                cells.extend(columns.iter().map(|_| BLURRED.to_string()));
                cells
            }
        };
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

const BLURRED: &str = "░░░░░░";
