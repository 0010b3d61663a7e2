//! Reconciliation Summary tab.
//!
//! Per-row receivables/payables are derived from the invoice, but the
//! summary table shows independently drawn receivables, payables and
//! settlement status per (carrier, billing cycle) group. The two never
//! agree; keep it that way until real receivables data replaces the draws.

use crate::{
    display::{Cell, ChartKind, ChartSpec, DisplayTable, Series},
    error::DashResult,
    group::{group_by, sum},
    record::{BillingTable, ReconciliationStatus},
    rng::{RngSlot, SubsystemRng},
    tab::{DashboardTab, TabId, TabPanel},
    types::CarrierName,
};
use serde::{Deserialize, Serialize};

const RECEIVABLES_RANGE: (f64, f64) = (1000.0, 3000.0);
const PAYABLES_RANGE: (f64, f64) = (500.0, 2500.0);

/// Row-level receivables and payables derived from one billing record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRow {
    pub carrier_name: CarrierName,
    pub billing_cycle: String,
    pub receivables: f64,
    pub payables: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CycleSettlement {
    Settled,
    Pending,
}

impl CycleSettlement {
    pub const ALL: [CycleSettlement; 2] = [Self::Settled, Self::Pending];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Settled => "Settled",
            Self::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleSummaryRow {
    pub carrier_name: CarrierName,
    pub billing_cycle: String,
    pub invoice_amount_usd: f64,
    pub disputed_amount_usd: f64,
    pub receivables: f64,
    pub payables: f64,
    pub netted_amount: f64,
    pub settlement_status: CycleSettlement,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingTotal {
    pub carrier_name: CarrierName,
    pub invoice_amount_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconciliationSummary {
    pub ledger: Vec<LedgerRow>,
    pub cycles: Vec<CycleSummaryRow>,
    pub pending_by_carrier: Vec<PendingTotal>,
}

pub fn summarize(table: &BillingTable, rng: &mut SubsystemRng) -> ReconciliationSummary {
    let ledger = table
        .iter()
        .map(|r| LedgerRow {
            carrier_name: r.carrier_name.clone(),
            billing_cycle: r.billing_cycle.clone(),
            receivables: r.invoice_amount_usd - r.disputed_amount_usd,
            payables: r.disputed_amount_usd,
        })
        .collect();

    let groups = group_by(table, |r| (r.carrier_name.clone(), r.billing_cycle.clone()));

    // Each random column is drawn in full before the next one.
    let n = groups.len();
    let receivables: Vec<f64> = (0..n)
        .map(|_| rng.uniform(RECEIVABLES_RANGE.0, RECEIVABLES_RANGE.1))
        .collect();
    let payables: Vec<f64> = (0..n)
        .map(|_| rng.uniform(PAYABLES_RANGE.0, PAYABLES_RANGE.1))
        .collect();
    let statuses: Vec<CycleSettlement> = (0..n).map(|_| *rng.choose(&CycleSettlement::ALL)).collect();

    let cycles = groups
        .into_iter()
        .enumerate()
        .map(|(i, ((carrier_name, billing_cycle), members))| CycleSummaryRow {
            carrier_name,
            billing_cycle,
            invoice_amount_usd: sum(&members, |r| r.invoice_amount_usd),
            disputed_amount_usd: sum(&members, |r| r.disputed_amount_usd),
            receivables: receivables[i],
            payables: payables[i],
            netted_amount: receivables[i] - payables[i],
            settlement_status: statuses[i],
        })
        .collect();

    let pending = table
        .iter()
        .filter(|r| r.reconciliation_status == ReconciliationStatus::Pending);
    let pending_by_carrier = group_by(pending, |r| r.carrier_name.clone())
        .into_iter()
        .map(|(carrier_name, members)| PendingTotal {
            carrier_name,
            invoice_amount_usd: sum(&members, |r| r.invoice_amount_usd),
        })
        .collect();

    ReconciliationSummary {
        ledger,
        cycles,
        pending_by_carrier,
    }
}

pub struct ReconciliationTab;

impl DashboardTab for ReconciliationTab {
    fn id(&self) -> TabId {
        TabId::ReconciliationSummary
    }

    fn slot(&self) -> RngSlot {
        RngSlot::ReconciliationSummary
    }

    fn render(&self, table: &BillingTable, rng: &mut SubsystemRng) -> DashResult<TabPanel> {
        let summary = summarize(table, rng);

        let mut cycles = DisplayTable::new(
            "Summary Table",
            &[
                "Carrier Name",
                "Billing Cycle",
                "Invoice Amount (USD)",
                "Disputed Amount (USD)",
                "Receivables",
                "Payables",
                "Netted Amount",
                "Settlement Status",
            ],
        );
        for row in &summary.cycles {
            cycles.push_row(vec![
                Cell::text(&row.carrier_name),
                Cell::text(&row.billing_cycle),
                Cell::money(row.invoice_amount_usd),
                Cell::money(row.disputed_amount_usd),
                Cell::money(row.receivables),
                Cell::money(row.payables),
                Cell::money(row.netted_amount),
                Cell::text(row.settlement_status.label()),
            ]);
        }

        let pending_chart = ChartSpec::build(
            ChartKind::Bar,
            "Invoices with Pending Reconciliation by Carrier",
            "Carrier Name",
            summary
                .pending_by_carrier
                .iter()
                .map(|p| p.carrier_name.clone())
                .collect(),
            vec![Series {
                name: "Invoice Amount (USD)".into(),
                values: summary
                    .pending_by_carrier
                    .iter()
                    .map(|p| p.invoice_amount_usd)
                    .collect(),
            }],
        );

        log::debug!(
            "reconciliation_summary: {} cycle groups, {} carriers pending",
            summary.cycles.len(),
            summary.pending_by_carrier.len()
        );

        Ok(TabPanel::new(TabId::ReconciliationSummary, "Reconciliation Summary")
            .with_table(cycles)
            .with_chart(pending_chart))
    }
}
