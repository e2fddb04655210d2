use clap::builder::BoolishValueParser;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use github_client::{AccessToken, DEFAULT_API_URL};
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, SyncError};

/// Command line flags, each falling back to an environment variable.
#[derive(Debug, Parser)]
#[command(name = "invite-to-org", version)]
#[command(about = "Invite members of a source organization into a target organization")]
pub struct Args {
    /// The GitHub Token to use for authentication.
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// The GitHub Enterprise the organizations belong to.
    #[arg(long, env = "ENTERPRISE")]
    pub enterprise: Option<String>,

    /// The source organization.
    #[arg(long = "source-organization", env = "SOURCE_ORGANIZATION")]
    pub source_organization: Option<String>,

    /// The target organization.
    #[arg(long = "target-organization", env = "TARGET_ORGANIZATION")]
    pub target_organization: Option<String>,

    /// Team slug in the target organization to invite members into.
    #[arg(long)]
    pub team: Option<String>,

    /// Dry run mode.
    #[arg(
        long = "dry-run",
        env = "DRY_RUN",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub dry_run: bool,

    /// Verbosity level, 0=error, 1=warn, 2=info, 3=debug.
    #[arg(long, env = "VERBOSE", default_value_t = 0)]
    pub verbose: u8,

    /// GitHub REST API base URL.
    #[arg(long = "api-url", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

/// Validated configuration for one run
#[derive(Debug)]
pub struct Config {
    pub github_token: AccessToken,
    pub enterprise: String,
    pub source_organization: String,
    pub target_organization: String,
    pub team: Option<String>,
    pub dry_run: bool,
    pub verbose: u8,
    pub api_url: String,
}

impl Config {
    /// Load configuration from flags, environment variables and an optional `.env` file.
    ///
    /// `--help` and `--version` print and exit the process.
    pub fn load() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let args = match Args::try_parse() {
            Ok(args) => args,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp
                        | ErrorKind::DisplayVersion
                        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                e.exit()
            }
            Err(e) => return Err(SyncError::Config(e.to_string())),
        };

        Self::from_args(args)
    }

    /// Validate parsed flags. Empty values count as missing.
    pub fn from_args(args: Args) -> Result<Self> {
        Ok(Self {
            github_token: AccessToken::new(args.github_token.unwrap_or_default())
                .map_err(|_| SyncError::Config("GitHub Token is required".into()))?,
            enterprise: required(args.enterprise, "Enterprise")?,
            source_organization: required(args.source_organization, "Source Organization")?,
            target_organization: required(args.target_organization, "Target Organization")?,
            team: args.team.filter(|t| !t.trim().is_empty()),
            dry_run: args.dry_run,
            verbose: args.verbose,
            api_url: args.api_url,
        })
    }

    pub fn log_level(&self) -> LevelFilter {
        log_level(self.verbose)
    }

    /// `RUST_LOG` when set, otherwise the verbosity level.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(self.log_level().into())
            .from_env_lossy()
    }

    /// Subscriber for the run, writing to stderr.
    pub fn log_dispatch(&self) -> Dispatch {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(self.log_filter())
            .finish();
        Dispatch::new(subscriber)
    }
}

/// Subscriber for failures raised before a configuration exists: errors only, to stderr.
pub fn fallback_log_dispatch() -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::ERROR)
        .finish();
    Dispatch::new(subscriber)
}

/// Map the numeric verbosity to a level. Anything above 3 is debug.
pub fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SyncError::Config(format!("{} is required", name)))
}
