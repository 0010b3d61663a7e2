//! Dispute Summary tab.

use crate::{
    display::{Cell, ChartKind, ChartSpec, DisplayTable, Series},
    error::DashResult,
    group::{group_by, sum},
    invoice_recon_tab::totals_by_carrier,
    record::{BillingRecord, BillingTable, DisputeType, SettlementStatus},
    rng::{RngSlot, SubsystemRng},
    tab::{DashboardTab, TabId, TabPanel},
    types::CarrierName,
};
use serde::{Deserialize, Serialize};

const DISPUTED_USAGE_RANGE: (f64, f64) = (0.0, 500.0);
pub const MAX_DISPUTED_USAGE_MINUTES: f64 = 5000.0;

/// A billing record paired with its drawn disputed usage.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRow<'a> {
    pub record: &'a BillingRecord,
    /// Zero for rate disputes.
    pub disputed_usage_minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisputeSummaryRow {
    pub carrier_name: CarrierName,
    pub total_invoice_amount_usd: f64,
    /// Taken from the carrier's first row.
    pub dispute_type: Option<DisputeType>,
    pub total_disputed_amount_usd: f64,
    /// Clamped to [0, 5000].
    pub total_disputed_usage_minutes: f64,
    /// Taken from the carrier's first row.
    pub settlement_status: SettlementStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageTotal {
    pub carrier_name: CarrierName,
    /// Unclamped.
    pub disputed_usage_minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisputeSummary {
    pub carriers: Vec<DisputeSummaryRow>,
    pub usage_by_carrier: Vec<UsageTotal>,
}

/// Draw a disputed-usage value for every row, in row order.
pub fn attach_disputed_usage<'a>(table: &'a BillingTable, rng: &mut SubsystemRng) -> Vec<UsageRow<'a>> {
    table
        .iter()
        .map(|record| {
            let drawn = rng.uniform(DISPUTED_USAGE_RANGE.0, DISPUTED_USAGE_RANGE.1);
            let disputed_usage_minutes = match record.dispute_type {
                Some(DisputeType::RateDispute) => 0.0,
                _ => drawn,
            };
            UsageRow {
                record,
                disputed_usage_minutes,
            }
        })
        .collect()
}

/// Group usage rows by carrier. "First" columns read the first row of each
/// carrier in `rows` order, so reordering `rows` can change them.
pub fn summarize_rows(rows: &[UsageRow<'_>]) -> DisputeSummary {
    let groups = group_by(rows, |u| u.record.carrier_name.clone());

    let mut carriers = Vec::with_capacity(groups.len());
    let mut usage_by_carrier = Vec::with_capacity(groups.len());
    for (carrier_name, members) in groups {
        let first = members[0].record;
        let usage = sum(&members, |u| u.disputed_usage_minutes);

        carriers.push(DisputeSummaryRow {
            carrier_name: carrier_name.clone(),
            total_invoice_amount_usd: sum(&members, |u| u.record.invoice_amount_usd),
            dispute_type: first.dispute_type,
            total_disputed_amount_usd: sum(&members, |u| u.record.disputed_amount_usd),
            total_disputed_usage_minutes: usage.clamp(0.0, MAX_DISPUTED_USAGE_MINUTES),
            settlement_status: first.settlement_status,
        });
        usage_by_carrier.push(UsageTotal {
            carrier_name,
            disputed_usage_minutes: usage,
        });
    }

    DisputeSummary {
        carriers,
        usage_by_carrier,
    }
}

pub fn summarize(table: &BillingTable, rng: &mut SubsystemRng) -> DisputeSummary {
    summarize_rows(&attach_disputed_usage(table, rng))
}

pub struct DisputeTab;

impl DashboardTab for DisputeTab {
    fn id(&self) -> TabId {
        TabId::DisputeSummary
    }

    fn slot(&self) -> RngSlot {
        RngSlot::DisputeSummary
    }

    fn render(&self, table: &BillingTable, rng: &mut SubsystemRng) -> DashResult<TabPanel> {
        let summary = summarize(table, rng);

        let mut carriers = DisplayTable::new(
            "Summary Table",
            &[
                "Carrier Name",
                "Total Invoice Amount (USD)",
                "Dispute Type",
                "Total Disputed Amount (USD)",
                "Total Disputed Usage (Mins)",
                "Settlement Status",
            ],
        );
        for row in &summary.carriers {
            carriers.push_row(vec![
                Cell::text(&row.carrier_name),
                Cell::money(row.total_invoice_amount_usd),
                Cell::optional(row.dispute_type.map(|d| d.label())),
                Cell::money(row.total_disputed_amount_usd),
                Cell::money(row.total_disputed_usage_minutes),
                Cell::text(row.settlement_status.label()),
            ]);
        }

        let disputed = totals_by_carrier(table);
        let amounts_chart = ChartSpec::build(
            ChartKind::Bar,
            "Disputed Amounts by Carrier",
            "Carrier Name",
            disputed.iter().map(|t| t.key.clone()).collect(),
            vec![Series {
                name: "Disputed Amount (USD)".into(),
                values: disputed.iter().map(|t| t.disputed_amount_usd).collect(),
            }],
        );
        let usage_chart = ChartSpec::build(
            ChartKind::Bar,
            "Disputed Usage (Mins) by Carrier",
            "Carrier Name",
            summary
                .usage_by_carrier
                .iter()
                .map(|u| u.carrier_name.clone())
                .collect(),
            vec![Series {
                name: "Disputed Usage (Mins)".into(),
                values: summary
                    .usage_by_carrier
                    .iter()
                    .map(|u| u.disputed_usage_minutes)
                    .collect(),
            }],
        );

        log::debug!("dispute_summary: {} carriers", summary.carriers.len());

        Ok(TabPanel::new(TabId::DisputeSummary, "Dispute Summary")
            .with_table(carriers)
            .with_chart(amounts_chart)
            .with_chart(usage_chart))
    }
}
