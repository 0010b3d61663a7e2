//! Synthetic billing table generation.
//!
//! Rows are produced month-major, carrier-minor. Per row the draw order is
//! fixed: invoice, dispute flag, disputed amount (disputed only), fortnight,
//! reconciliation status, dispute type (disputed only), settlement status
//! (disputed only), usage. Changing that order changes every table.

use crate::{
    config::GeneratorConfig,
    error::{DashError, DashResult},
    record::{BillingRecord, BillingTable, DisputeType, ReconciliationStatus, SettlementStatus},
    rng::{RngBank, RngSlot, SubsystemRng},
    types::{CarrierName, MonthToken},
};
use chrono::Months;

/// Generate the base table for `seed`. Same seed and config, same table.
pub fn generate_table(seed: u64, config: &GeneratorConfig) -> DashResult<BillingTable> {
    config.validate()?;
    let mut rng = RngBank::new(seed).for_slot(RngSlot::Generator);

    let months = month_tokens(config)?;
    let carriers = carrier_names(config.carriers);

    let mut records = Vec::with_capacity(config.row_count());
    for month in &months {
        for carrier in &carriers {
            records.push(draw_record(carrier, month, config, &mut rng));
        }
    }

    let disputed = records.iter().filter(|r| r.is_disputed()).count();
    log::debug!(
        "generated {} rows ({} disputed) from seed {seed}",
        records.len(),
        disputed
    );
    Ok(BillingTable::new(records))
}

/// `"Carrier 1"` … `"Carrier {count}"`.
pub fn carrier_names(count: u32) -> Vec<CarrierName> {
    (1..=count).map(|i| format!("Carrier {i}")).collect()
}

/// Consecutive `"YYYY-MM"` tokens starting at the configured month.
pub fn month_tokens(config: &GeneratorConfig) -> DashResult<Vec<MonthToken>> {
    let start = config.start_date()?;
    (0..config.months)
        .map(|offset| {
            start
                .checked_add_months(Months::new(offset))
                .map(|d| d.format("%Y-%m").to_string())
                .ok_or_else(|| DashError::InvalidConfig {
                    reason: format!("month range overflows after {} + {offset}", config.start_month),
                })
        })
        .collect()
}

fn draw_record(
    carrier: &str,
    month: &str,
    config: &GeneratorConfig,
    rng: &mut SubsystemRng,
) -> BillingRecord {
    let invoice_amount_usd = rng.uniform(config.invoice_min, config.invoice_max);
    let is_disputed = rng.chance(config.dispute_probability);
    let disputed_amount_usd = if is_disputed {
        rng.uniform(0.0, invoice_amount_usd * config.max_dispute_share)
    } else {
        0.0
    };
    let fortnight = rng.int_between(1, 3);
    let billing_cycle = format!("{month}-{fortnight}");

    let reconciliation_status = *rng.choose(&ReconciliationStatus::ALL);
    let dispute_type = is_disputed.then(|| *rng.choose(&DisputeType::ALL));
    let settlement_status = if is_disputed {
        *rng.choose(&SettlementStatus::ALL)
    } else {
        SettlementStatus::Settled
    };
    let usage_minutes = rng.uniform(config.usage_min, config.usage_max);

    BillingRecord {
        carrier_name: carrier.to_string(),
        invoice_amount_usd,
        disputed_amount_usd,
        reconciliation_status,
        dispute_type,
        settlement_status,
        invoice_month: month.to_string(),
        billing_cycle,
        usage_minutes,
    }
}
