//! Shared primitive types used across the dashboard.

/// A carrier's display name, e.g. `"Carrier 3"`.
pub type CarrierName = String;

/// A `"YYYY-MM"` month token. Zero-padded, so string order is month order.
pub type MonthToken = String;

/// Sequence number of a render pass within one engine.
pub type RenderIndex = u64;

/// The sentinel offered by both select boxes.
pub const ALL: &str = "All";
