//! Dashboard tab trait and the panel every tab renders into.
//!
//! RULE: Every tab implements DashboardTab.
//! The engine renders tabs in registration order on every pass,
//! each from the same filtered table.
//! Tabs never see each other's output.

use crate::{
    display::{ChartSpec, DisplayTable},
    error::DashResult,
    record::BillingTable,
    rng::{RngSlot, SubsystemRng},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TabId {
    InvoiceRecon,
    ReconciliationSummary,
    DisputeSummary,
    SettlementSummary,
}

impl TabId {
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvoiceRecon => "Invoice Recon",
            Self::ReconciliationSummary => "Reconciliation Summary",
            Self::DisputeSummary => "Dispute Summary",
            Self::SettlementSummary => "Settlement Summary",
        }
    }
}

/// Everything one tab shows: tables first, then charts.
/// Charts with nothing to plot are left out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabPanel {
    pub tab: TabId,
    pub heading: String,
    pub tables: Vec<DisplayTable>,
    pub charts: Vec<ChartSpec>,
}

impl TabPanel {
    pub fn new(tab: TabId, heading: &str) -> Self {
        Self {
            tab,
            heading: heading.to_string(),
            tables: Vec::new(),
            charts: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: DisplayTable) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_chart(mut self, chart: Option<ChartSpec>) -> Self {
        self.charts.extend(chart);
        self
    }

    pub fn table(&self, title: &str) -> Option<&DisplayTable> {
        self.tables.iter().find(|t| t.title == title)
    }

    pub fn chart(&self, title: &str) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.title == title)
    }
}

/// The contract every tab must fulfill.
pub trait DashboardTab: Send {
    fn id(&self) -> TabId;

    /// Stable RNG slot for this tab's auxiliary random columns.
    fn slot(&self) -> RngSlot;

    /// Called once per render pass.
    ///
    /// - `table`: the filtered billing table, never mutated
    /// - `rng`:   this tab's stream for this pass
    fn render(&self, table: &BillingTable, rng: &mut SubsystemRng) -> DashResult<TabPanel>;
}
