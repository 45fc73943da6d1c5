use {
    crate::{
        cli::{CliCommand, CliConfig, OutputFormat, ProcessResult},
        output::{
            CliGenerationRow, CliGenerations, CliMemberSummaries, CliStatement, CliTree,
        },
    },
    log::*,
    pr_network_engine::{member_summaries, summarize_by_generation, ReconciliationEngine},
    pr_network_sources::{SnapshotLoader, Snapshots},
    serde::Serialize,
    std::fmt,
};

fn render<T: Serialize + fmt::Display>(output: &T, format: OutputFormat) -> ProcessResult {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
        OutputFormat::Display => Ok(format!("{output}")),
    }
}

/// Fetch every snapshot, then answer `command` from them.
pub async fn process_command(command: &CliCommand, config: &CliConfig) -> ProcessResult {
    let loader = SnapshotLoader::new(config.sources.clone())?;
    let snapshots = loader.load_all().await;
    process_with_snapshots(command, config, &snapshots)
}

/// Answer `command` from snapshots that are already in memory.
pub fn process_with_snapshots(
    command: &CliCommand,
    config: &CliConfig,
    snapshots: &Snapshots,
) -> ProcessResult {
    let engine = ReconciliationEngine::new(config.sources.engine.clone())?;
    let users = snapshots.users.users();
    let wallet = command.wallet();
    let unavailable_sources: Vec<String> = snapshots
        .unavailable()
        .iter()
        .map(ToString::to_string)
        .collect();
    debug!("processing `{command}`");

    match command {
        CliCommand::Tree { .. } => {
            let (forest, stats) = engine.tree_builder(users).build_with_stats(wallet);
            let mut output = CliTree::new(wallet, &forest, stats);
            output.unavailable_sources = unavailable_sources;
            render(&output, config.output_format)
        }
        CliCommand::Generations { .. } => {
            let forest = engine.tree_builder(users).build(wallet);
            let summary = summarize_by_generation(&forest);
            let output = CliGenerations {
                root_id: wallet.to_string(),
                total_members: summary.values().sum(),
                generations: summary
                    .into_iter()
                    .map(|(generation, members)| CliGenerationRow {
                        generation,
                        members,
                    })
                    .collect(),
                unavailable_sources,
            };
            render(&output, config.output_format)
        }
        CliCommand::Statement { .. } => {
            let output = CliStatement {
                statement: engine.reconcile_all(wallet, users, &snapshots.logs),
                unavailable_sources,
            };
            render(&output, config.output_format)
        }
        CliCommand::MemberSummary { .. } => {
            let forest = engine.tree_builder(users).build(wallet);
            let output = CliMemberSummaries {
                root_id: wallet.to_string(),
                members: member_summaries(&forest, &engine.config().caring_bonus),
                unavailable_sources,
            };
            render(&output, config.output_format)
        }
    }
}
