//! Tab transforms over hand-built tables.
//!
//! Sums must not depend on row order; "first" columns must.

use telecom_recon_core::{
    dispute_tab::{self, UsageRow},
    filter::{filter, Selection},
    invoice_recon_tab,
    reconciliation_tab,
    record::{BillingRecord, BillingTable, DisputeType, ReconciliationStatus, SettlementStatus},
    rng::SubsystemRng,
    settlement_tab::{self, SettlementRow},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn record(carrier: &str, invoice: f64, disputed: f64, month: &str) -> BillingRecord {
    let disputed_flag = disputed > 0.0;
    BillingRecord {
        carrier_name: carrier.into(),
        invoice_amount_usd: invoice,
        disputed_amount_usd: disputed,
        reconciliation_status: ReconciliationStatus::Completed,
        dispute_type: disputed_flag.then_some(DisputeType::VolumeDispute),
        settlement_status: if disputed_flag {
            SettlementStatus::Unsettled
        } else {
            SettlementStatus::Settled
        },
        invoice_month: month.into(),
        billing_cycle: format!("{month}-1"),
        usage_minutes: 250.0,
    }
}

fn rng() -> SubsystemRng {
    SubsystemRng::new(7, 2)
}

fn mixed_table() -> BillingTable {
    let mut a2 = record("Carrier B", 1500.0, 300.0, "2024-02");
    a2.dispute_type = Some(DisputeType::RateDispute);
    a2.reconciliation_status = ReconciliationStatus::Pending;
    let mut b1 = record("Carrier A", 2500.0, 0.0, "2024-01");
    b1.reconciliation_status = ReconciliationStatus::Pending;
    BillingTable::new(vec![
        record("Carrier B", 1000.0, 100.0, "2024-01"),
        b1,
        a2,
        record("Carrier A", 4000.0, 400.0, "2024-03"),
        record("Carrier C", 3000.0, 0.0, "2024-02"),
    ])
}

fn reversed(table: &BillingTable) -> BillingTable {
    table.iter().rev().cloned().collect()
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn carrier_filter_then_sum_matches_worked_example() {
    let table = BillingTable::new(vec![
        record("Carrier A", 1000.0, 200.0, "2024-01"),
        record("Carrier A", 2000.0, 0.0, "2024-02"),
    ]);
    let filtered = filter(&table, &Selection::parse("Carrier A", "All"));
    assert_eq!(filtered.len(), 2, "both rows must be retained");

    let totals = invoice_recon_tab::totals_by_carrier(&filtered);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].key, "Carrier A");
    assert_eq!(totals[0].invoice_amount_usd, 3000.0);
    assert_eq!(totals[0].disputed_amount_usd, 200.0);
}

#[test]
fn settlement_amounts_follow_outstanding_share() {
    let row = SettlementRow::new("Carrier A".into(), 3, 500.0, 2);
    assert_eq!(row.outstanding_amount, 400.0);
    assert_eq!(row.settled_amount, 100.0);

    let table = BillingTable::new(vec![
        record("Carrier A", 2000.0, 200.0, "2024-01"),
        record("Carrier A", 3000.0, 300.0, "2024-02"),
    ]);
    let summary = settlement_tab::summarize(&table, &mut rng());
    let a = &summary.carriers[0];
    assert_eq!(a.total_invoices, 2);
    assert_eq!(a.disputed_amount_usd, 500.0);
    assert_eq!(a.outstanding_amount, 400.0);
    assert_eq!(a.settled_amount, 100.0);
    assert!((1..5).contains(&a.settled_invoices));
}

#[test]
fn invoice_recon_groups_by_carrier_and_month() {
    let recon = invoice_recon_tab::summarize(&mixed_table());
    assert_eq!(recon.rows.len(), 5);

    let carriers: Vec<&str> = recon.by_carrier.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(carriers, vec!["Carrier A", "Carrier B", "Carrier C"]);
    assert_eq!(recon.by_carrier[0].invoice_amount_usd, 6500.0);
    assert_eq!(recon.by_carrier[1].disputed_amount_usd, 400.0);

    let months: Vec<&str> = recon.by_month.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"], "months must ascend");
    assert_eq!(recon.by_month[0].invoice_amount_usd, 3500.0);
    assert_eq!(recon.by_month[1].disputed_amount_usd, 300.0);
}

#[test]
fn grouped_sums_ignore_row_order() {
    let table = mixed_table();
    let flipped = reversed(&table);

    let a = invoice_recon_tab::summarize(&table);
    let b = invoice_recon_tab::summarize(&flipped);
    assert_eq!(a.by_carrier, b.by_carrier);
    assert_eq!(a.by_month, b.by_month);

    let sa = settlement_tab::summarize(&table, &mut rng());
    let sb = settlement_tab::summarize(&flipped, &mut rng());
    for (x, y) in sa.carriers.iter().zip(&sb.carriers) {
        assert_eq!(x.carrier_name, y.carrier_name);
        assert_eq!(x.total_invoices, y.total_invoices);
        assert_eq!(x.disputed_amount_usd, y.disputed_amount_usd);
    }
    assert_eq!(sa.status_counts, sb.status_counts);
}

#[test]
fn first_aggregates_depend_on_row_order() {
    let table = mixed_table();
    let rows: Vec<UsageRow> = table
        .iter()
        .map(|record| UsageRow {
            record,
            disputed_usage_minutes: 10.0,
        })
        .collect();
    let mut flipped = rows.clone();
    flipped.reverse();

    let forward = dispute_tab::summarize_rows(&rows);
    let backward = dispute_tab::summarize_rows(&flipped);

    // Carrier B: first row is a volume dispute, last row a rate dispute.
    let b_fwd = &forward.carriers[1];
    let b_bwd = &backward.carriers[1];
    assert_eq!(b_fwd.carrier_name, "Carrier B");
    assert_eq!(b_fwd.dispute_type, Some(DisputeType::VolumeDispute));
    assert_eq!(b_bwd.dispute_type, Some(DisputeType::RateDispute));

    // Carrier A: first row undisputed, so "first" is absent in input order.
    assert_eq!(forward.carriers[0].dispute_type, None);
    assert_eq!(forward.carriers[0].settlement_status, SettlementStatus::Settled);
    assert_eq!(backward.carriers[0].dispute_type, Some(DisputeType::VolumeDispute));
    assert_eq!(backward.carriers[0].settlement_status, SettlementStatus::Unsettled);

    // Sums agree either way.
    assert_eq!(b_fwd.total_invoice_amount_usd, b_bwd.total_invoice_amount_usd);
    assert_eq!(b_fwd.total_disputed_usage_minutes, b_bwd.total_disputed_usage_minutes);
}

#[test]
fn rate_disputes_carry_no_disputed_usage() {
    let table = mixed_table();
    let rows = dispute_tab::attach_disputed_usage(&table, &mut rng());
    assert_eq!(rows.len(), table.len());
    for u in &rows {
        if u.record.dispute_type == Some(DisputeType::RateDispute) {
            assert_eq!(u.disputed_usage_minutes, 0.0);
        } else {
            assert!((0.0..500.0).contains(&u.disputed_usage_minutes));
        }
    }
}

#[test]
fn disputed_usage_is_clamped_to_5000_in_summary_only() {
    let table: BillingTable = (0..30)
        .map(|i| record("Carrier A", 1000.0, 0.0, &format!("2024-{:02}", i % 12 + 1)))
        .collect();
    let rows: Vec<UsageRow> = table
        .iter()
        .map(|record| UsageRow {
            record,
            disputed_usage_minutes: 400.0,
        })
        .collect();
    let summary = dispute_tab::summarize_rows(&rows);
    assert_eq!(summary.carriers[0].total_disputed_usage_minutes, 5000.0);
    assert_eq!(summary.usage_by_carrier[0].disputed_usage_minutes, 12_000.0);
}

#[test]
fn reconciliation_groups_by_carrier_and_cycle() {
    let table = mixed_table();
    let summary = reconciliation_tab::summarize(&table, &mut rng());

    assert_eq!(summary.ledger.len(), 5);
    assert_eq!(summary.ledger[0].receivables, 900.0);
    assert_eq!(summary.ledger[0].payables, 100.0);

    let keys: Vec<(&str, &str)> = summary
        .cycles
        .iter()
        .map(|c| (c.carrier_name.as_str(), c.billing_cycle.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("Carrier A", "2024-01-1"),
            ("Carrier A", "2024-03-1"),
            ("Carrier B", "2024-01-1"),
            ("Carrier B", "2024-02-1"),
            ("Carrier C", "2024-02-1"),
        ]
    );
    for c in &summary.cycles {
        assert!((1000.0..3000.0).contains(&c.receivables));
        assert!((500.0..2500.0).contains(&c.payables));
        assert_eq!(c.netted_amount, c.receivables - c.payables);
    }

    let pending: Vec<(&str, f64)> = summary
        .pending_by_carrier
        .iter()
        .map(|p| (p.carrier_name.as_str(), p.invoice_amount_usd))
        .collect();
    assert_eq!(pending, vec![("Carrier A", 2500.0), ("Carrier B", 1500.0)]);
}

#[test]
fn status_counts_group_by_carrier_and_status() {
    let summary = settlement_tab::summarize(&mixed_table(), &mut rng());
    let counts: Vec<(&str, SettlementStatus, u64)> = summary
        .status_counts
        .iter()
        .map(|s| (s.carrier_name.as_str(), s.settlement_status, s.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Carrier A", SettlementStatus::Settled, 1),
            ("Carrier A", SettlementStatus::Unsettled, 1),
            ("Carrier B", SettlementStatus::Unsettled, 2),
            ("Carrier C", SettlementStatus::Settled, 1),
        ]
    );
    assert_eq!(summary.status_slices(), vec![("Settled", 2), ("Unsettled", 3)]);
}

#[test]
fn empty_table_yields_empty_outputs() {
    let empty = BillingTable::default();

    let recon = invoice_recon_tab::summarize(&empty);
    assert!(recon.rows.is_empty() && recon.by_carrier.is_empty() && recon.by_month.is_empty());

    let rs = reconciliation_tab::summarize(&empty, &mut rng());
    assert!(rs.ledger.is_empty() && rs.cycles.is_empty() && rs.pending_by_carrier.is_empty());

    let ds = dispute_tab::summarize(&empty, &mut rng());
    assert!(ds.carriers.is_empty() && ds.usage_by_carrier.is_empty());

    let ss = settlement_tab::summarize(&empty, &mut rng());
    assert!(ss.carriers.is_empty() && ss.status_counts.is_empty());
    assert!(ss.status_slices().is_empty());
}
