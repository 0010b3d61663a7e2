pub mod config;
pub mod display;
pub mod dispute_tab;
pub mod engine;
pub mod error;
pub mod filter;
pub mod generator;
pub mod group;
pub mod invoice_recon_tab;
pub mod record;
pub mod reconciliation_tab;
pub mod rng;
pub mod settlement_tab;
pub mod tab;
pub mod types;
pub mod upload;
