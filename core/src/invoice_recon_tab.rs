//! Invoice Recon tab: the row-level view plus invoice vs disputed totals
//! by carrier and by month.

use crate::{
    display::{Cell, ChartKind, ChartSpec, DisplayTable, Series},
    error::DashResult,
    group::{group_by, sum},
    record::{BillingRecord, BillingTable, DisputeType, ReconciliationStatus, SettlementStatus},
    rng::{RngSlot, SubsystemRng},
    tab::{DashboardTab, TabId, TabPanel},
    types::{CarrierName, MonthToken},
};
use serde::{Deserialize, Serialize};

pub const INVOICE_COLUMN: &str = "Invoice Amount (USD)";
pub const DISPUTED_COLUMN: &str = "Disputed Amount (USD)";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceReconRow {
    pub carrier_name: CarrierName,
    pub reconciliation_status: ReconciliationStatus,
    pub invoice_amount_usd: f64,
    pub disputed_amount_usd: f64,
    pub dispute_type: Option<DisputeType>,
    pub settlement_status: SettlementStatus,
}

impl From<&BillingRecord> for InvoiceReconRow {
    fn from(r: &BillingRecord) -> Self {
        Self {
            carrier_name: r.carrier_name.clone(),
            reconciliation_status: r.reconciliation_status,
            invoice_amount_usd: r.invoice_amount_usd,
            disputed_amount_usd: r.disputed_amount_usd,
            dispute_type: r.dispute_type,
            settlement_status: r.settlement_status,
        }
    }
}

/// Invoice and disputed sums for one group key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmountTotals<K> {
    pub key: K,
    pub invoice_amount_usd: f64,
    pub disputed_amount_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceRecon {
    pub rows: Vec<InvoiceReconRow>,
    pub by_carrier: Vec<AmountTotals<CarrierName>>,
    /// Month ascending.
    pub by_month: Vec<AmountTotals<MonthToken>>,
}

pub fn summarize(table: &BillingTable) -> InvoiceRecon {
    InvoiceRecon {
        rows: table.iter().map(InvoiceReconRow::from).collect(),
        by_carrier: totals_by_carrier(table),
        by_month: totals_by(table, |r| r.invoice_month.clone()),
    }
}

pub fn totals_by_carrier(table: &BillingTable) -> Vec<AmountTotals<CarrierName>> {
    totals_by(table, |r| r.carrier_name.clone())
}

fn totals_by<K: Ord>(
    table: &BillingTable,
    key: impl Fn(&&BillingRecord) -> K,
) -> Vec<AmountTotals<K>> {
    group_by(table, key)
        .into_iter()
        .map(|(key, members)| AmountTotals {
            key,
            invoice_amount_usd: sum(&members, |r| r.invoice_amount_usd),
            disputed_amount_usd: sum(&members, |r| r.disputed_amount_usd),
        })
        .collect()
}

fn totals_chart(
    kind: ChartKind,
    title: &str,
    x_label: &str,
    totals: &[AmountTotals<String>],
) -> Option<ChartSpec> {
    ChartSpec::build(
        kind,
        title,
        x_label,
        totals.iter().map(|t| t.key.clone()).collect(),
        vec![
            Series {
                name: INVOICE_COLUMN.into(),
                values: totals.iter().map(|t| t.invoice_amount_usd).collect(),
            },
            Series {
                name: DISPUTED_COLUMN.into(),
                values: totals.iter().map(|t| t.disputed_amount_usd).collect(),
            },
        ],
    )
}

pub struct InvoiceReconTab;

impl DashboardTab for InvoiceReconTab {
    fn id(&self) -> TabId {
        TabId::InvoiceRecon
    }

    fn slot(&self) -> RngSlot {
        RngSlot::InvoiceRecon
    }

    fn render(&self, table: &BillingTable, _rng: &mut SubsystemRng) -> DashResult<TabPanel> {
        let recon = summarize(table);

        let mut summary = DisplayTable::new(
            "Summary Table",
            &[
                "Carrier Name",
                "Reconciliation Status",
                INVOICE_COLUMN,
                DISPUTED_COLUMN,
                "Dispute Type",
                "Settlement Status",
            ],
        );
        for row in &recon.rows {
            summary.push_row(vec![
                Cell::text(&row.carrier_name),
                Cell::text(row.reconciliation_status.label()),
                Cell::money(row.invoice_amount_usd),
                Cell::money(row.disputed_amount_usd),
                Cell::optional(row.dispute_type.map(|d| d.label())),
                Cell::text(row.settlement_status.label()),
            ]);
        }

        log::debug!(
            "invoice_recon: {} rows, {} carriers, {} months",
            recon.rows.len(),
            recon.by_carrier.len(),
            recon.by_month.len()
        );

        Ok(TabPanel::new(TabId::InvoiceRecon, "Invoice Reconciliation Overview")
            .with_table(summary)
            .with_chart(totals_chart(
                ChartKind::GroupedBar,
                "Disputed vs Processed Amounts by Carrier",
                "Carrier Name",
                &recon.by_carrier,
            ))
            .with_chart(totals_chart(
                ChartKind::Line,
                "Invoice Disputes by Month",
                "Invoice Month",
                &recon.by_month,
            )))
    }
}
