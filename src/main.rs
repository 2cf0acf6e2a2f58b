use clap::{Args, Parser, Subcommand};

use questhook::{ConfigFile, QuesthookError};

#[derive(Parser)]
#[command(
    name = "questhook",
    version,
    about = "Report deployed contract addresses to the challenge tracker",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Path to a questhook.json config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(flatten)]
    common: CommonArgs,

    /// Options for the default `report` behaviour
    #[command(flatten)]
    report: ReportArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct CommonArgs {
    /// Tracking service base URL
    #[arg(long, global = true, env = "QUESTHOOK_SERVICE_URL")]
    service_url: Option<String>,

    /// Challenge this deployment belongs to
    #[arg(long, global = true, env = "QUESTHOOK_CHALLENGE")]
    challenge: Option<String>,

    /// Where the token is cached
    #[arg(long, global = true, env = "QUESTHOOK_TOKEN_PATH")]
    token_path: Option<String>,

    /// Print the authorization URL without launching a browser
    #[arg(long, global = true)]
    no_browser: bool,

    /// Give up waiting for the browser callback after this many seconds
    #[arg(long, global = true, env = "QUESTHOOK_AUTH_TIMEOUT")]
    auth_timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report deployed contracts (the default when no command is given)
    Report(ReportArgs),

    /// Authenticate in the browser and cache the token
    Login,

    /// Remove the cached token
    Logout,

    /// Show whether a token is cached
    Status,
}

#[derive(Args)]
struct ReportArgs {
    /// Network folder under the deployments directory
    #[arg(long)]
    network: Option<String>,

    /// hardhat-deploy output directory
    #[arg(long)]
    deployments_dir: Option<String>,

    /// Chain id to report instead of reading it from the deployments or a node
    #[arg(long)]
    chain_id: Option<u64>,

    /// JSON-RPC endpoint to query eth_chainId from
    #[arg(long)]
    rpc_url: Option<String>,

    /// Extra contract as Name=address (repeatable)
    #[arg(long = "contract", value_name = "NAME=ADDRESS")]
    contracts: Vec<String>,

    /// JSON output
    #[arg(long)]
    json: bool,
}

impl CommonArgs {
    fn overrides(&self) -> ConfigFile {
        ConfigFile {
            service_url: self.service_url.clone(),
            challenge_slug: self.challenge.clone(),
            token_path: self.token_path.clone(),
            auth_timeout_secs: self.auth_timeout,
            open_browser: self.no_browser.then_some(false),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("QUESTHOOK_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = match &cli.command {
        Some(Commands::Report(args)) => args.json,
        None => cli.report.json,
        _ => false,
    };

    if let Err(e) = run(cli).await {
        questhook::cli::output::print_error(&e, json);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), QuesthookError> {
    let mut overrides = cli.common.overrides();

    match cli.command.unwrap_or(Commands::Report(cli.report)) {
        Commands::Report(args) => {
            overrides.network = args.network;
            overrides.deployments_dir = args.deployments_dir;
            overrides.rpc_url = args.rpc_url;
            let config = questhook::load_config(cli.config.as_deref(), overrides)?;
            questhook::cli::report::run_report(&config, args.chain_id, &args.contracts, args.json)
                .await
        }
        Commands::Login => {
            let config = questhook::load_config(cli.config.as_deref(), overrides)?;
            questhook::cli::auth::run_login(&config).await
        }
        Commands::Logout => {
            let config = questhook::load_config(cli.config.as_deref(), overrides)?;
            questhook::cli::auth::run_logout(&config)
        }
        Commands::Status => {
            let config = questhook::load_config(cli.config.as_deref(), overrides)?;
            questhook::cli::auth::run_status(&config)
        }
    }
}
