//! Operator CLI for the PR network engine.

pub mod clap_app;
pub mod cli;
pub mod output;
pub mod process;
