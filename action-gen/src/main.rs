//! NetBox Action Generator
//!
//! Regenerates StackStorm actions from a NetBox instance's OpenAPI schema.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use netbox_action_gen::config::{DEFAULT_HOST, DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATE, GeneratorConfig};
use netbox_action_gen::generate::generate;

#[derive(Parser, Debug)]
#[command(name = "gen-actions")]
#[command(about = "Generate StackStorm actions from a NetBox OpenAPI schema")]
#[command(version)]
struct Cli {
    /// NetBox hostname
    #[arg(long, env = "NETBOX_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Disable SSL certificate verification
    #[arg(long)]
    no_verify_ssl: bool,

    /// Output directory for generated actions
    #[arg(short, long, env = "NETBOX_ACTIONS_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Jinja template rendered for each action
    #[arg(short, long, env = "NETBOX_ACTION_TEMPLATE", default_value = DEFAULT_TEMPLATE)]
    template: PathBuf,

    /// Schema request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Dry run - print rendered actions instead of writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output logs as JSON
    #[arg(long)]
    json: bool,
}

impl From<Cli> for GeneratorConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            verify_tls: !cli.no_verify_ssl,
            output_dir: cli.output,
            template_path: cli.template,
            timeout: Duration::from_secs(cli.timeout),
            dry_run: cli.dry_run,
        }
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,netbox_action_gen=info".to_string(),
            2 => "info,netbox_action_gen=debug".to_string(),
            _ => "debug,netbox_action_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);
    debug!(?cli, "Parsed arguments");

    let config = GeneratorConfig::from(cli);
    match generate(&config).await {
        Ok(summary) => {
            summary.print();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
