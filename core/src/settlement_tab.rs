//! Settlement Summary tab.

use crate::{
    display::{Cell, ChartKind, ChartSpec, DisplayTable, Series},
    error::DashResult,
    group::{group_by, sum},
    record::{BillingTable, SettlementStatus},
    rng::{RngSlot, SubsystemRng},
    tab::{DashboardTab, TabId, TabPanel},
    types::CarrierName,
};
use serde::{Deserialize, Serialize};

/// Share of a carrier's disputed total still outstanding.
pub const OUTSTANDING_SHARE: f64 = 0.8;
/// Settled invoice counts are drawn from [1, 5).
const SETTLED_INVOICES_RANGE: (u64, u64) = (1, 5);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettlementRow {
    pub carrier_name: CarrierName,
    pub total_invoices: u64,
    pub disputed_amount_usd: f64,
    pub settled_invoices: u64,
    pub outstanding_amount: f64,
    pub settled_amount: f64,
}

impl SettlementRow {
    pub fn new(
        carrier_name: CarrierName,
        total_invoices: u64,
        disputed_amount_usd: f64,
        settled_invoices: u64,
    ) -> Self {
        let outstanding_amount = disputed_amount_usd * OUTSTANDING_SHARE;
        Self {
            carrier_name,
            total_invoices,
            disputed_amount_usd,
            settled_invoices,
            outstanding_amount,
            settled_amount: disputed_amount_usd - outstanding_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusCount {
    pub carrier_name: CarrierName,
    pub settlement_status: SettlementStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettlementSummary {
    pub carriers: Vec<SettlementRow>,
    /// Ordered by (carrier, status).
    pub status_counts: Vec<StatusCount>,
}

impl SettlementSummary {
    /// Pie slices: status label and count summed over carriers, in order of
    /// first appearance in `status_counts`.
    pub fn status_slices(&self) -> Vec<(&'static str, u64)> {
        let mut slices: Vec<(&'static str, u64)> = Vec::new();
        for sc in &self.status_counts {
            let label = sc.settlement_status.label();
            match slices.iter_mut().find(|(l, _)| *l == label) {
                Some((_, total)) => *total += sc.count,
                None => slices.push((label, sc.count)),
            }
        }
        slices
    }
}

pub fn summarize(table: &BillingTable, rng: &mut SubsystemRng) -> SettlementSummary {
    let carriers = group_by(table, |r| r.carrier_name.clone())
        .into_iter()
        .map(|(carrier_name, members)| {
            let settled = rng.int_between(SETTLED_INVOICES_RANGE.0, SETTLED_INVOICES_RANGE.1);
            SettlementRow::new(
                carrier_name,
                members.len() as u64,
                sum(&members, |r| r.disputed_amount_usd),
                settled,
            )
        })
        .collect();

    let status_counts = group_by(table, |r| (r.carrier_name.clone(), r.settlement_status))
        .into_iter()
        .map(|((carrier_name, settlement_status), members)| StatusCount {
            carrier_name,
            settlement_status,
            count: members.len() as u64,
        })
        .collect();

    SettlementSummary {
        carriers,
        status_counts,
    }
}

pub struct SettlementTab;

impl DashboardTab for SettlementTab {
    fn id(&self) -> TabId {
        TabId::SettlementSummary
    }

    fn slot(&self) -> RngSlot {
        RngSlot::SettlementSummary
    }

    fn render(&self, table: &BillingTable, rng: &mut SubsystemRng) -> DashResult<TabPanel> {
        let summary = summarize(table, rng);

        let mut carriers = DisplayTable::new(
            "Summary Table",
            &[
                "Carrier Name",
                "Total Invoices",
                "Disputed Amount (USD)",
                "Settled Invoices",
                "Outstanding Amount",
                "Settled Amount",
            ],
        );
        for row in &summary.carriers {
            carriers.push_row(vec![
                Cell::text(&row.carrier_name),
                Cell::Count(row.total_invoices),
                Cell::money(row.disputed_amount_usd),
                Cell::Count(row.settled_invoices),
                Cell::money(row.outstanding_amount),
                Cell::money(row.settled_amount),
            ]);
        }

        let slices = summary.status_slices();
        let pie = ChartSpec::build(
            ChartKind::Pie,
            "Settlement Status by Carrier",
            "Settlement Status",
            slices.iter().map(|(label, _)| label.to_string()).collect(),
            vec![Series {
                name: "Count".into(),
                values: slices.iter().map(|(_, count)| *count as f64).collect(),
            }],
        );

        log::debug!(
            "settlement_summary: {} carriers, {} status groups",
            summary.carriers.len(),
            summary.status_counts.len()
        );

        Ok(TabPanel::new(TabId::SettlementSummary, "Settlement Summary")
            .with_table(carriers)
            .with_chart(pie))
    }
}
