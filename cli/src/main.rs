use {
    anyhow::{Context, Result},
    pr_network_cli::{
        clap_app::get_clap_app,
        cli::{parse_command, parse_config},
        process::process_command,
    },
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = get_clap_app(
        "pr-network",
        "Referral trees and bonus reconciliation for the PR network",
        env!("CARGO_PKG_VERSION"),
    )
    .get_matches();

    let config = parse_config(&matches)?;
    let command = parse_command(&matches)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let output = runtime
        .block_on(process_command(&command, &config))
        .with_context(|| format!("`{command}` failed"))?;
    println!("{output}");
    Ok(())
}
