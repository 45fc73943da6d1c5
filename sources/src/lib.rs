//! Snapshot sources for the PR network engine.
//!
//! The engine is pure: it aggregates whatever user snapshot and payout logs
//! it is handed. This crate is the collaborator layer that obtains them:
//!
//! - **Configuration**: a TOML [`SourceConfig`] names where each snapshot
//!   lives (an `http(s)://` URL or a local file) and carries the
//!   [`EngineConfig`](pr_network_engine::EngineConfig).
//! - **Loading**: [`SnapshotLoader`] fetches all four snapshots concurrently
//!   and degrades any that fail to an empty, `Unavailable` set.
//! - **Sequencing**: [`QuerySequencer`] implements last-query-wins for callers
//!   that may start a new lookup before the previous one finished. The
//!   one-shot CLI does not need it; interactive embedders do.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`]    | `SourceConfig`, `Source`, default snapshot URLs |
//! | [`loader`]    | async fetching and degrade-to-empty |
//! | [`sequencer`] | query tickets |
//! | [`error`]     | crate-wide error enum |

pub mod config;
pub mod error;
pub mod loader;
pub mod sequencer;

pub use {
    config::{SnapshotKind, Source, SourceConfig},
    error::SourceError,
    loader::{SnapshotLoader, Snapshots},
    sequencer::{QuerySequencer, QueryTicket},
};
