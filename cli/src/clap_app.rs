use {
    crate::cli::OutputFormat,
    clap::{App, AppSettings, Arg, SubCommand},
};

const SOURCE_HELP: &str = "Every SOURCE is either an http(s):// URL or a local file path.";

fn wallet_arg<'ab, 'v>() -> Arg<'ab, 'v> {
    Arg::with_name("wallet")
        .index(1)
        .value_name("WALLET")
        .takes_value(true)
        .required(true)
        .help("Wallet address of the query root")
}

fn source_arg<'ab, 'v>(name: &'ab str, long: &'ab str, help: &'ab str) -> Arg<'ab, 'v> {
    Arg::with_name(name)
        .long(long)
        .value_name("SOURCE")
        .takes_value(true)
        .global(true)
        .help(help)
}

pub fn get_clap_app<'ab, 'v>(name: &str, about: &'ab str, version: &'v str) -> App<'ab, 'v> {
    App::new(name)
        .about(about)
        .version(version)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("config")
                .short("C")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .global(true)
                .help("TOML file naming snapshot sources and engine settings"),
        )
        .arg(source_arg(
            "users",
            "users",
            "User snapshot; overrides the config file",
        ))
        .arg(source_arg(
            "pr_log",
            "pr-log",
            "PR Bonus payout log; overrides the config file",
        ))
        .arg(source_arg(
            "caring_log",
            "caring-log",
            "Caring Bonus payout log; overrides the config file",
        ))
        .arg(source_arg(
            "return_log",
            "return-log",
            "Return Bonus payout log; overrides the config file",
        ))
        .arg(
            Arg::with_name("max_depth")
                .long("max-depth")
                .value_name("GENERATIONS")
                .takes_value(true)
                .global(true)
                .help("Deepest generation to include [default: 10]"),
        )
        .arg(
            Arg::with_name("no_cycle_guard")
                .long("no-cycle-guard")
                .global(true)
                .help("Follow referral cycles until the depth cap instead of skipping them"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("FORMAT")
                .takes_value(true)
                .global(true)
                .possible_values(OutputFormat::VALUES)
                .help("Return information in the specified output format"),
        )
        .after_help(SOURCE_HELP)
        .subcommand(
            SubCommand::with_name("tree")
                .about("Show the downline tree under a wallet")
                .arg(wallet_arg()),
        )
        .subcommand(
            SubCommand::with_name("generations")
                .about("Show member counts per generation")
                .arg(wallet_arg()),
        )
        .subcommand(
            SubCommand::with_name("statement")
                .about("Reconcile PR, Caring and Return Bonus entitlements against payouts")
                .arg(wallet_arg()),
        )
        .subcommand(
            SubCommand::with_name("member-summary")
                .about("Export per-member unilevel totals for a downline")
                .arg(wallet_arg()),
        )
}
