//! The dashboard engine: one full recomputation per interaction.
//!
//! RENDER ORDER (fixed, never reordered):
//!   1. Invoice Recon
//!   2. Reconciliation Summary
//!   3. Dispute Summary
//!   4. Settlement Summary
//!
//! RULES:
//!   - Every pass regenerates the base table from the configured seed.
//!   - Tabs only read the filtered table; none of them mutates it.
//!   - All randomness flows through the RngBank.

use crate::{
    config::{AuxSeedPolicy, DashboardConfig},
    dispute_tab::DisputeTab,
    error::DashResult,
    filter::{filter, FilterOptions, Selection},
    generator::generate_table,
    invoice_recon_tab::InvoiceReconTab,
    record::BillingTable,
    reconciliation_tab::ReconciliationTab,
    rng::{RngBank, RngSlot, SubsystemRng},
    settlement_tab::SettlementTab,
    tab::{DashboardTab, TabId, TabPanel},
    types::RenderIndex,
    upload::UploadPanel,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Everything the rendering surface needs for one interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub render_id: String,
    pub render_index: RenderIndex,
    pub selection: Selection,
    pub options: FilterOptions,
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub tabs: Vec<TabPanel>,
    pub upload: UploadPanel,
}

impl DashboardView {
    pub fn tab(&self, id: TabId) -> Option<&TabPanel> {
        self.tabs.iter().find(|t| t.tab == id)
    }
}

pub struct DashEngine {
    pub config: DashboardConfig,
    render_count: RenderIndex,
    tabs: Vec<Box<dyn DashboardTab>>,
    upload: UploadPanel,
}

impl DashEngine {
    /// An engine with no tabs registered. Most callers want `build`.
    pub fn new(config: DashboardConfig) -> DashResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            render_count: 0,
            tabs: Vec::new(),
            upload: UploadPanel::None,
        })
    }

    /// Build a fully wired engine with all four tabs registered.
    pub fn build(config: DashboardConfig) -> DashResult<Self> {
        let mut engine = DashEngine::new(config)?;

        // RENDER ORDER: fixed, never reordered.
        engine.register(Box::new(InvoiceReconTab));
        engine.register(Box::new(ReconciliationTab));
        engine.register(Box::new(DisputeTab));
        engine.register(Box::new(SettlementTab));
        Ok(engine)
    }

    /// Engine on `DashboardConfig::default_test()` with the given base seed.
    pub fn build_test(seed: u64) -> DashResult<Self> {
        Self::build(DashboardConfig {
            seed,
            ..DashboardConfig::default_test()
        })
    }

    pub fn register(&mut self, tab: Box<dyn DashboardTab>) {
        self.tabs.push(tab);
    }

    pub fn render_count(&self) -> RenderIndex {
        self.render_count
    }

    /// The unfiltered base table. Same config, same table, every call.
    pub fn base_table(&self) -> DashResult<BillingTable> {
        generate_table(self.config.seed, &self.config.generator)
    }

    pub fn filter_options(&self) -> DashResult<FilterOptions> {
        Ok(FilterOptions::from_table(&self.base_table()?))
    }

    /// Read an uploaded file for display on subsequent renders.
    /// Returns the panel; a malformed file is rejected, not raised.
    pub fn set_upload(&mut self, path: &Path) -> &UploadPanel {
        self.upload = UploadPanel::from_path(path);
        &self.upload
    }

    pub fn clear_upload(&mut self) {
        self.upload = UploadPanel::None;
    }

    pub fn upload(&self) -> &UploadPanel {
        &self.upload
    }

    /// Run one full pass: generate, filter, render every tab.
    pub fn render(&mut self, selection: &Selection) -> DashResult<DashboardView> {
        let render_index = self.render_count;
        self.render_count += 1;
        let render_id = Uuid::new_v4().to_string();

        let base = self.base_table()?;
        let filtered = filter(&base, selection);

        let mut tabs = Vec::with_capacity(self.tabs.len());
        for tab in &self.tabs {
            let mut rng = self.aux_rng(tab.slot(), render_index);
            tabs.push(tab.render(&filtered, &mut rng)?);
        }

        log::info!(
            "render {render_id} #{render_index}: carrier={} month={} rows {}/{}",
            selection.carrier.label(),
            selection.month.label(),
            filtered.len(),
            base.len()
        );

        Ok(DashboardView {
            render_id,
            render_index,
            selection: selection.clone(),
            options: FilterOptions::from_table(&base),
            total_rows: base.len(),
            filtered_rows: filtered.len(),
            tabs,
            upload: self.upload.clone(),
        })
    }

    fn aux_rng(&self, slot: RngSlot, render_index: RenderIndex) -> SubsystemRng {
        match self.config.aux_seed {
            AuxSeedPolicy::PerRender => {
                RngBank::new(self.config.seed).for_render(slot, render_index)
            }
            AuxSeedPolicy::Fixed(seed) => RngBank::new(seed).for_slot(slot),
        }
    }
}
