//! Render passes: reproducibility, aux-seed policy, empty selections,
//! uploads.

use std::io::Write;
use telecom_recon_core::{
    config::{AuxSeedPolicy, DashboardConfig},
    display::{Cell, ChartKind},
    engine::{DashEngine, DashboardView},
    filter::Selection,
    tab::TabId,
    upload::UploadPanel,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn build(seed: u64) -> DashEngine {
    DashEngine::build_test(seed).expect("build_test failed")
}

fn summary_column(view: &DashboardView, tab: TabId, column: &str) -> Vec<Cell> {
    view.tab(tab)
        .and_then(|p| p.table("Summary Table"))
        .and_then(|t| t.column(column))
        .expect("summary column")
        .into_iter()
        .cloned()
        .collect()
}

fn write_temp(suffix: &str, bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn full_render_has_four_tabs_in_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut engine = build(42);
    let view = engine.render(&Selection::all()).unwrap();

    let order: Vec<TabId> = view.tabs.iter().map(|t| t.tab).collect();
    assert_eq!(
        order,
        vec![
            TabId::InvoiceRecon,
            TabId::ReconciliationSummary,
            TabId::DisputeSummary,
            TabId::SettlementSummary,
        ]
    );
    assert_eq!(view.total_rows, 120);
    assert_eq!(view.filtered_rows, 120);

    let invoice = view.tab(TabId::InvoiceRecon).unwrap();
    assert_eq!(invoice.tables[0].rows.len(), 120);
    let by_carrier = invoice.chart("Disputed vs Processed Amounts by Carrier").unwrap();
    assert_eq!(by_carrier.kind, ChartKind::GroupedBar);
    assert_eq!(by_carrier.categories.len(), 10);
    assert_eq!(by_carrier.series.len(), 2);
    let by_month = invoice.chart("Invoice Disputes by Month").unwrap();
    assert_eq!(by_month.kind, ChartKind::Line);
    assert_eq!(by_month.categories.first().map(String::as_str), Some("2024-01"));

    let dispute = view.tab(TabId::DisputeSummary).unwrap();
    assert_eq!(dispute.tables[0].rows.len(), 10);
    assert_eq!(dispute.charts.len(), 2);

    let settlement = view.tab(TabId::SettlementSummary).unwrap();
    let pie = settlement.chart("Settlement Status by Carrier").unwrap();
    assert_eq!(pie.kind, ChartKind::Pie);
    let total: f64 = pie.series[0].values.iter().sum();
    assert_eq!(total, 120.0, "pie slices must cover every row");
}

#[test]
fn display_values_are_rounded_to_cents() {
    let mut engine = build(42);
    let view = engine.render(&Selection::all()).unwrap();
    for cell in summary_column(&view, TabId::InvoiceRecon, "Invoice Amount (USD)") {
        match cell {
            Cell::Number(n) => assert_eq!(n, (n * 100.0).round() / 100.0),
            other => panic!("expected a number, got {other:?}"),
        }
    }
    for cell in summary_column(&view, TabId::InvoiceRecon, "Dispute Type") {
        assert!(matches!(cell, Cell::Text(_) | Cell::Empty));
    }
}

#[test]
fn fixed_aux_seed_makes_renders_identical() {
    let mut engine = build(42);
    let a = engine.render(&Selection::all()).unwrap();
    let b = engine.render(&Selection::all()).unwrap();

    assert_eq!(a.render_index, 0);
    assert_eq!(b.render_index, 1);
    assert_ne!(a.render_id, b.render_id);
    assert_eq!(a.tabs, b.tabs, "fixed aux seed must reproduce every tab");
}

#[test]
fn per_render_aux_seed_keeps_base_rows_but_redraws_aux_columns() {
    let mut engine = DashEngine::build(DashboardConfig {
        aux_seed: AuxSeedPolicy::PerRender,
        ..DashboardConfig::default()
    })
    .unwrap();
    let a = engine.render(&Selection::all()).unwrap();
    let b = engine.render(&Selection::all()).unwrap();

    assert_eq!(
        a.tab(TabId::InvoiceRecon),
        b.tab(TabId::InvoiceRecon),
        "base rows must not change between renders"
    );
    assert_ne!(
        summary_column(&a, TabId::ReconciliationSummary, "Receivables"),
        summary_column(&b, TabId::ReconciliationSummary, "Receivables"),
        "receivables are redrawn every render"
    );
    assert_eq!(
        summary_column(&a, TabId::SettlementSummary, "Outstanding Amount"),
        summary_column(&b, TabId::SettlementSummary, "Outstanding Amount"),
    );
}

#[test]
fn empty_selection_renders_empty_tables_and_no_charts() {
    let mut engine = build(42);
    let view = engine.render(&Selection::parse("Carrier 42", "All")).unwrap();
    assert_eq!(view.filtered_rows, 0);
    for panel in &view.tabs {
        assert!(
            panel.tables.iter().all(|t| t.is_empty()),
            "{:?} should have only empty tables",
            panel.tab
        );
        assert!(panel.charts.is_empty(), "{:?} should skip its charts", panel.tab);
    }
}

#[test]
fn single_carrier_single_month_selection() {
    let mut engine = build(42);
    let view = engine.render(&Selection::parse("Carrier 7", "2024-06")).unwrap();
    assert_eq!(view.filtered_rows, 1);
    assert_eq!(
        summary_column(&view, TabId::SettlementSummary, "Total Invoices"),
        vec![Cell::Count(1)]
    );
    assert_eq!(view.options.carriers.len(), 11, "options always come from the full table");
}

#[test]
fn csv_upload_is_shown_verbatim() {
    let file = write_temp(".csv", b"Carrier,Amount\nAcme,12.5\nGlobex,7\n");
    let mut engine = build(42);
    engine.set_upload(file.path());
    let view = engine.render(&Selection::all()).unwrap();

    match &view.upload {
        UploadPanel::Loaded { table } => {
            assert_eq!(table.columns, vec!["Carrier", "Amount"]);
            assert_eq!(table.rows, vec![vec!["Acme", "12.5"], vec!["Globex", "7"]]);
        }
        other => panic!("expected a loaded upload, got {other:?}"),
    }
    assert_eq!(view.total_rows, 120, "upload must not feed the billing table");
}

#[test]
fn malformed_upload_is_rejected_without_failing_the_render() {
    let file = write_temp(".xlsx", b"definitely not a zip archive");
    let mut engine = build(42);
    let panel = engine.set_upload(file.path()).clone();
    assert!(matches!(panel, UploadPanel::Rejected { .. }), "got {panel:?}");

    let view = engine.render(&Selection::all()).expect("render must still succeed");
    assert_eq!(view.upload, panel);
    assert_eq!(view.tabs.len(), 4);

    let other = write_temp(".pdf", b"%PDF-1.4");
    match engine.set_upload(other.path()) {
        UploadPanel::Rejected { message, .. } => assert!(message.contains("Unsupported")),
        p => panic!("expected rejection, got {p:?}"),
    }

    engine.clear_upload();
    assert_eq!(engine.upload(), &UploadPanel::None);
}

#[test]
fn invalid_config_fails_engine_construction() {
    let mut cfg = DashboardConfig::default_test();
    cfg.generator.carriers = 0;
    assert!(DashEngine::build(cfg).is_err());
}

#[test]
fn view_serializes_to_json() {
    let mut engine = build(42);
    let view = engine.render(&Selection::parse("Carrier 1", "All")).unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["tabs"][0]["tab"], "invoice_recon");
    assert_eq!(json["selection"]["carrier"]["only"], "Carrier 1");
    assert_eq!(json["upload"]["status"], "none");
}
