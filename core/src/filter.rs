//! Carrier / month selection and the filter stage.

use crate::{
    record::{BillingRecord, BillingTable},
    types::ALL,
};
use serde::{Deserialize, Serialize};

/// One select box: either no constraint, or an exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Parse a select-box value. `"All"` is the sentinel, anything else is
    /// matched exactly.
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Choice::All
        } else {
            Choice::Only(value.to_string())
        }
    }

    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Self::parse).unwrap_or_default()
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Choice::All => ALL,
            Choice::Only(v) => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub carrier: Choice,
    pub month: Choice,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(carrier: Choice, month: Choice) -> Self {
        Self { carrier, month }
    }

    pub fn parse(carrier: &str, month: &str) -> Self {
        Self::new(Choice::parse(carrier), Choice::parse(month))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.carrier == Choice::All && self.month == Choice::All
    }

    pub fn matches(&self, record: &BillingRecord) -> bool {
        self.carrier.matches(&record.carrier_name) && self.month.matches(&record.invoice_month)
    }
}

/// Rows of `table` matching `selection`, in their original order.
pub fn filter(table: &BillingTable, selection: &Selection) -> BillingTable {
    if selection.is_unconstrained() {
        return table.clone();
    }
    table.iter().filter(|r| selection.matches(r)).cloned().collect()
}

/// The values offered by the two select boxes, each led by `"All"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub carriers: Vec<String>,
    pub months: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &BillingTable) -> Self {
        let with_all = |values: Vec<String>| {
            std::iter::once(ALL.to_string()).chain(values).collect::<Vec<_>>()
        };
        Self {
            carriers: with_all(table.carriers()),
            months: with_all(table.months()),
        }
    }
}
