//! Customers commands

use super::{gate_error, Session};
use crate::output::{print_banners, rows_table, OutputFormat};
use crate::CustomerCommands;
use slotdesk_console::{DetailView, RowView};
use slotdesk_core::ResourceType;
use std::path::PathBuf;

const COLUMNS: &[&str] = &["name", "email", "phone"];

pub async fn handle(action: CustomerCommands, session: &Session, format: OutputFormat) -> anyhow::Result<()> {
    let resource = ResourceType::Customers;
    let console = &session.console;
    let tenant = &session.tenant;

    match action {
        CustomerCommands::List { page, page_size } => {
            let view = console.list(tenant, resource, page, page_size).await.map_err(gate_error)?;
            print_banners(&view.banners);
            if format.is_table() {
                println!("{}", rows_table(&view.rows, COLUMNS));
                println!(
                    "Page {} of {} ({} customers, {} locked)",
                    view.page,
                    view.total_pages.max(1),
                    view.total_records,
                    view.excess_count
                );
            } else {
                format.print(&view)?;
            }
        }
        CustomerCommands::Get { id } => {
            let view = console.detail(tenant, resource, &id).await.map_err(gate_error)?;
            print_banners(view.banners());
            match (&view, format.is_table()) {
                (DetailView::Visible { record, .. }, true) => {
                    let rows = vec![RowView::Visible { record: record.clone() }];
                    println!("{}", rows_table(&rows, COLUMNS));
                }
                (DetailView::Blocked { .. }, true) => {}
                (_, false) => format.print(&view)?,
            }
        }
        CustomerCommands::Search { query } => {
            let view = console.search(tenant, resource, &query).await.map_err(gate_error)?;
            print_banners(&view.banners);
            if format.is_table() {
                println!("{}", rows_table(&view.hits, COLUMNS));
                println!("{} matches for {:?}", view.hits.len(), view.query);
            } else {
                format.print(&view)?;
            }
        }
        CustomerCommands::Export { out } => {
            let file = console.export(tenant, resource).await.map_err(gate_error)?;
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            let path = file.write_to(&dir).map_err(gate_error)?;
            print_banners(&file.banners);
            if let Some(summary) = &file.summary {
                eprintln!("{}", summary);
            }
            println!("Exported {} customers to {}", file.exported_ids.len(), path.display());
        }
    }
    Ok(())
}
