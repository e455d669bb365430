//! Plan commands

use super::{gate_error, Session};
use crate::output::{print_banners, OutputFormat};
use crate::PlanCommands;
use serde::Serialize;
use slotdesk_console::Banner;
use slotdesk_core::{Limit, Resolution, ResourceType};

#[derive(Debug, Serialize)]
struct PlanSummary {
    tenant_id: String,
    resource: ResourceType,
    limit: Limit,
    resolution: Resolution,
    plan_expired: bool,
    total: usize,
    accessible: usize,
    locked: usize,
}

pub async fn handle(action: PlanCommands, session: &Session, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        PlanCommands::Show => {
            let snapshot = session
                .console
                .snapshot(&session.tenant, ResourceType::Customers)
                .await
                .map_err(gate_error)?;
            let ent = &snapshot.entitlement;
            let decision = &snapshot.decision;

            let summary = PlanSummary {
                tenant_id: ent.tenant_id.to_string(),
                resource: ent.resource,
                limit: ent.limit,
                resolution: ent.resolution,
                plan_expired: ent.plan_expired,
                total: decision.total_count,
                accessible: decision.accessible_count(),
                locked: decision.excess_count,
            };

            print_banners(&Banner::for_decision(ent, decision));
            if format.is_table() {
                println!("tenant:     {}", summary.tenant_id);
                println!("resource:   {}", summary.resource);
                println!("limit:      {}", summary.limit);
                println!("customers:  {} ({} accessible, {} locked)", summary.total, summary.accessible, summary.locked);
                println!("plan:       {}", if summary.plan_expired { "expired" } else { "active" });
            } else {
                format.print(&summary)?;
            }
        }
    }
    Ok(())
}
