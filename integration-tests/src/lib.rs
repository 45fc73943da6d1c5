//! PR Network Integration Tests
//!
//! End-to-end tests that write snapshot files to a temporary directory,
//! load them through the source layer and check what the engine and the
//! CLI report.
//!
//! # Areas Tested
//!
//! 1. **Downline trees**: generation counts, the 10-generation cap, cycles,
//!    malformed user rows
//! 2. **Reconciliation**: PR, Caring and Return Bonus statements against
//!    Polygonscan exports and send reports
//! 3. **Sources**: missing files, malformed JSON, TOML configuration
//! 4. **CLI**: rendered output for every command

pub mod harness;
