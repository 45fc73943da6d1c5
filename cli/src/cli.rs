use {
    clap::ArgMatches,
    pr_network_engine::EngineError,
    pr_network_sources::{Source, SourceConfig, SourceError},
    std::{fmt, path::Path, str::FromStr},
    thiserror::Error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Display,
    Json,
}

impl OutputFormat {
    pub const VALUES: &'static [&'static str] = &["display", "json"];
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "display" => Ok(OutputFormat::Display),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::BadParameter(format!(
                "unknown output format `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Tree { wallet: String },
    Generations { wallet: String },
    Statement { wallet: String },
    MemberSummary { wallet: String },
}

impl CliCommand {
    pub fn wallet(&self) -> &str {
        match self {
            CliCommand::Tree { wallet }
            | CliCommand::Generations { wallet }
            | CliCommand::Statement { wallet }
            | CliCommand::MemberSummary { wallet } => wallet,
        }
    }
}

impl fmt::Display for CliCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CliCommand::Tree { .. } => "tree",
            CliCommand::Generations { .. } => "generations",
            CliCommand::Statement { .. } => "statement",
            CliCommand::MemberSummary { .. } => "member-summary",
        };
        write!(f, "{name} {}", self.wallet())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub sources: SourceConfig,
    pub output_format: OutputFormat,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Bad parameter: {0}")]
    BadParameter(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProcessResult = Result<String, CliError>;

/// Global options may be given before or after the subcommand.
fn global_value_of<'a>(matches: &'a ArgMatches<'_>, name: &str) -> Option<&'a str> {
    matches.value_of(name).or_else(|| {
        matches
            .subcommand()
            .1
            .and_then(|sub_matches| sub_matches.value_of(name))
    })
}

fn global_is_present(matches: &ArgMatches<'_>, name: &str) -> bool {
    matches.is_present(name)
        || matches
            .subcommand()
            .1
            .is_some_and(|sub_matches| sub_matches.is_present(name))
}

/// Resolve `--config` and the per-source overrides into a [`CliConfig`].
pub fn parse_config(matches: &ArgMatches<'_>) -> Result<CliConfig, CliError> {
    let mut sources = match global_value_of(matches, "config") {
        Some(path) => SourceConfig::load(Path::new(path))?,
        None => SourceConfig::default(),
    };

    for (arg, slot) in [
        ("users", &mut sources.users),
        ("pr_log", &mut sources.pr_bonus_log),
        ("caring_log", &mut sources.caring_bonus_log),
        ("return_log", &mut sources.return_bonus_log),
    ] {
        if let Some(raw) = global_value_of(matches, arg) {
            *slot = Source::from(raw);
        }
    }

    if let Some(raw) = global_value_of(matches, "max_depth") {
        sources.engine.max_depth = raw
            .parse()
            .map_err(|_| CliError::BadParameter(format!("invalid --max-depth `{raw}`")))?;
    }
    if global_is_present(matches, "no_cycle_guard") {
        sources.engine.cycle_guard = false;
    }
    sources.validate()?;

    let output_format = global_value_of(matches, "output")
        .map(OutputFormat::from_str)
        .transpose()?
        .unwrap_or_default();

    Ok(CliConfig {
        sources,
        output_format,
    })
}

pub fn parse_command(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    let (name, sub_matches) = matches.subcommand();
    let wallet = sub_matches
        .and_then(|sub| sub.value_of("wallet"))
        .map(|wallet| wallet.trim().to_string())
        .filter(|wallet| !wallet.is_empty())
        .ok_or_else(|| CliError::BadParameter("a wallet address is required".to_string()))?;

    match name {
        "tree" => Ok(CliCommand::Tree { wallet }),
        "generations" => Ok(CliCommand::Generations { wallet }),
        "statement" => Ok(CliCommand::Statement { wallet }),
        "member-summary" => Ok(CliCommand::MemberSummary { wallet }),
        other => Err(CliError::BadParameter(format!("unknown command `{other}`"))),
    }
}
