//! PR Network Property-Based Invariant Tests
//!
//! Uses proptest to verify aggregation invariants across:
//! - Downline trees over random referral networks, acyclic and cyclic
//! - Scheme arithmetic and retention reconstruction
//! - Payout-log ingestion and wallet matching

pub mod ingest_invariants;
pub mod reconcile_invariants;
