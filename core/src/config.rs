use crate::error::{DashError, DashResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the auxiliary random columns of each tab are seeded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuxSeedPolicy {
    /// A fresh stream every render pass. Base rows stay identical across
    /// renders; receivables, disputed usage and settled counts do not.
    #[default]
    PerRender,
    /// Every render pass reuses the same stream, so renders are identical.
    Fixed(u64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// First month of the generated range, `"YYYY-MM"`.
    pub start_month: String,
    pub months: u32,
    pub carriers: u32,
    pub dispute_probability: f64,
    pub invoice_min: f64,
    pub invoice_max: f64,
    /// Upper bound of a disputed amount as a share of its invoice.
    pub max_dispute_share: f64,
    pub usage_min: f64,
    pub usage_max: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_month: "2024-01".into(),
            months: 12,
            carriers: 10,
            dispute_probability: 0.2,
            invoice_min: 1000.0,
            invoice_max: 5000.0,
            max_dispute_share: 0.3,
            usage_min: 100.0,
            usage_max: 500.0,
        }
    }
}

impl GeneratorConfig {
    /// The single-month variant: one row per carrier.
    pub fn flat() -> Self {
        Self {
            months: 1,
            ..Self::default()
        }
    }

    /// Number of rows `generate_table` will produce.
    pub fn row_count(&self) -> usize {
        self.months as usize * self.carriers as usize
    }

    /// First day of `start_month`.
    pub fn start_date(&self) -> DashResult<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-01", self.start_month), "%Y-%m-%d").map_err(|e| {
            DashError::InvalidConfig {
                reason: format!("start_month '{}' is not YYYY-MM: {e}", self.start_month),
            }
        })
    }

    pub fn validate(&self) -> DashResult<()> {
        self.start_date()?;
        let invalid = |reason: String| Err(DashError::InvalidConfig { reason });

        if self.months == 0 {
            return invalid("months must be at least 1".into());
        }
        if self.carriers == 0 {
            return invalid("carriers must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.dispute_probability) {
            return invalid(format!(
                "dispute_probability {} outside [0, 1]",
                self.dispute_probability
            ));
        }
        if self.invoice_min <= 0.0 || self.invoice_max <= self.invoice_min {
            return invalid(format!(
                "invoice range [{}, {}) must be positive and non-empty",
                self.invoice_min, self.invoice_max
            ));
        }
        if !(0.0..=1.0).contains(&self.max_dispute_share) {
            return invalid(format!(
                "max_dispute_share {} outside [0, 1]",
                self.max_dispute_share
            ));
        }
        if self.usage_min <= 0.0 || self.usage_max <= self.usage_min {
            return invalid(format!(
                "usage range [{}, {}) must be positive and non-empty",
                self.usage_min, self.usage_max
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seed of the base billing table.
    pub seed: u64,
    pub aux_seed: AuxSeedPolicy,
    pub generator: GeneratorConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            aux_seed: AuxSeedPolicy::PerRender,
            generator: GeneratorConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with a fixed auxiliary seed, so every render is reproducible.
    pub fn default_test() -> Self {
        Self {
            aux_seed: AuxSeedPolicy::Fixed(7),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DashResult<()> {
        self.generator.validate()
    }
}
