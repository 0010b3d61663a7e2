//! The billing record and the in-memory table the dashboard works on.

use crate::types::{CarrierName, MonthToken};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    Pending,
    Completed,
    InProgress,
}

impl ReconciliationStatus {
    pub const ALL: [ReconciliationStatus; 3] = [Self::Pending, Self::Completed, Self::InProgress];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisputeType {
    RateDispute,
    VolumeDispute,
}

impl DisputeType {
    pub const ALL: [DisputeType; 2] = [Self::RateDispute, Self::VolumeDispute];

    pub fn label(&self) -> &'static str {
        match self {
            Self::RateDispute => "Rate Dispute",
            Self::VolumeDispute => "Volume Dispute",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Settled,
    Unsettled,
}

impl SettlementStatus {
    pub const ALL: [SettlementStatus; 2] = [Self::Settled, Self::Unsettled];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Settled => "Settled",
            Self::Unsettled => "Unsettled",
        }
    }
}

/// One row of the billing table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillingRecord {
    pub carrier_name: CarrierName,
    pub invoice_amount_usd: f64,
    pub disputed_amount_usd: f64,
    pub reconciliation_status: ReconciliationStatus,
    /// Set iff the record is disputed.
    pub dispute_type: Option<DisputeType>,
    pub settlement_status: SettlementStatus,
    pub invoice_month: MonthToken,
    /// `"YYYY-MM-F"`, F = fortnight 1 or 2.
    pub billing_cycle: String,
    pub usage_minutes: f64,
}

impl BillingRecord {
    pub fn is_disputed(&self) -> bool {
        self.dispute_type.is_some()
    }
}

/// An ordered, immutable set of billing records.
///
/// Row order matters: "first" aggregates read the first row of each group
/// in this order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BillingTable {
    records: Vec<BillingRecord>,
}

impl BillingTable {
    pub fn new(records: Vec<BillingRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BillingRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BillingRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct carriers in first-seen order.
    pub fn carriers(&self) -> Vec<CarrierName> {
        distinct(self.records.iter().map(|r| &r.carrier_name))
    }

    /// Distinct months in first-seen order.
    pub fn months(&self) -> Vec<MonthToken> {
        distinct(self.records.iter().map(|r| &r.invoice_month))
    }
}

impl FromIterator<BillingRecord> for BillingTable {
    fn from_iter<I: IntoIterator<Item = BillingRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BillingTable {
    type Item = &'a BillingRecord;
    type IntoIter = std::slice::Iter<'a, BillingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}
