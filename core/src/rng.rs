//! Deterministic random number generation.
//!
//! RULE: Nothing in the dashboard may call any platform RNG.
//! All randomness flows through SubsystemRng instances derived
//! from a seed the caller passes in explicitly.
//!
//! The base table and every tab get their own RNG stream, seeded
//! from (seed XOR slot_index). This means:
//!   - Adding a new tab never changes the base table or other tabs.
//!   - Each stream is fully reproducible in isolation.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

const SLOT_MIX: u64 = 0x9e37_79b9_7f4a_7c15;
const RENDER_MIX: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// A named, deterministic RNG for a single stream.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create an RNG from a seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(seed: u64, slot_index: u64) -> Self {
        let derived_seed = seed ^ slot_index.wrapping_mul(SLOT_MIX);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Roll a float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Roll an integer in [lo, hi). `hi` must be greater than `lo`.
    pub fn int_between(&mut self, lo: u64, hi: u64) -> u64 {
        assert!(hi > lo, "empty integer range {lo}..{hi}");
        lo + self.next_u64_below(hi - lo)
    }

    /// Pick one element uniformly. Panics on an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let index = self.next_u64_below(items.len() as u64) as usize;
        &items[index]
    }
}

/// Hands out RNG streams for one dashboard, indexed by stable slot.
pub struct RngBank {
    seed: u64,
}

impl RngBank {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn for_slot(&self, slot: RngSlot) -> SubsystemRng {
        SubsystemRng::new(self.seed, slot as u64).with_name(slot.name())
    }

    /// Stream for `slot` during render pass `render_index`.
    /// Different passes get different streams from the same seed.
    pub fn for_render(&self, slot: RngSlot, render_index: u64) -> SubsystemRng {
        let render_seed = self.seed ^ render_index.wrapping_add(1).wrapping_mul(RENDER_MIX);
        SubsystemRng::new(render_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum RngSlot {
    Generator = 0,
    ReconciliationSummary = 1,
    DisputeSummary = 2,
    SettlementSummary = 3,
    InvoiceRecon = 4,
    // Add new slots here. Append only.
}

impl RngSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generator => "generator",
            Self::ReconciliationSummary => "reconciliation_summary",
            Self::DisputeSummary => "dispute_summary",
            Self::SettlementSummary => "settlement_summary",
            Self::InvoiceRecon => "invoice_recon",
        }
    }
}
