use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nostk::{Nostk, NostkConfig, PublishReport, SubcommandRegistry};

#[derive(Debug, Parser)]
#[command(name = "nostk")]
#[command(about = "Publish Nostr events from the command line")]
#[command(version)]
struct Cli {
    /// Data directory (falls back to NOSTK_HOME, then $HOME/.nostk)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Per-relay connect and publish timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize the nostk environment
    Init,
    /// Create a private key and public key
    Genkey {
        /// Replace an existing key pair
        #[arg(long)]
        force: bool,
    },
    /// Show the relay list
    #[command(name = "lsRelays")]
    LsRelays,
    /// Edit the relay list in $EDITOR
    #[command(name = "editRelays")]
    EditRelays,
    /// Edit your profile in $EDITOR
    #[command(name = "editProfile")]
    EditProfile,
    /// Publish your profile
    #[command(name = "pubProfile")]
    PubProfile,
    /// Publish your relay list
    #[command(name = "pubRelays")]
    PubRelays,
    #[command(external_subcommand)]
    Publish(Vec<String>),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("nostk: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = SubcommandRegistry::standard();
    let mut command = Cli::command().after_help(publish_help(&registry));
    let matches = command.clone().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let Some(subcommand) = cli.command else {
        command.print_help()?;
        return Ok(());
    };

    let mut config = NostkConfig::from_env()?;
    if let Some(home) = cli.home {
        config = config.with_home(home);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let nostk = Nostk::new(config);

    match subcommand {
        Command::Init => {
            for path in nostk.init()? {
                println!("created {}", path.display());
            }
        }
        Command::Genkey { force } => {
            let keys = nostk.genkey(force)?;
            println!("{}", keys.bech32_public);
        }
        Command::LsRelays => {
            for line in nostk.relay_lines()? {
                println!("{line}");
            }
        }
        Command::EditRelays => nostk.edit_relays()?,
        Command::EditProfile => nostk.edit_profile()?,
        Command::PubProfile => {
            print_report(&nostk.publish_profile().await?, "published to");
        }
        Command::PubRelays => {
            print_report(&nostk.publish_relays().await?, "published relay list to");
        }
        Command::Publish(args) => {
            let program = std::env::args().next().unwrap_or_else(|| "nostk".to_string());
            let mut argv = Vec::with_capacity(args.len() + 1);
            argv.push(program);
            argv.extend(args);
            print_report(&nostk.publish_args(&argv).await?, "published to");
        }
    }
    Ok(())
}

fn publish_help(registry: &SubcommandRegistry) -> String {
    let mut help = String::from("Publish commands:\n");
    for spec in registry.specs() {
        help.push_str(&format!("  {:<40} {}\n", spec.usage(), spec.about));
    }
    help
}

fn print_report(report: &PublishReport, label: &str) {
    for outcome in &report.outcomes {
        println!("{}", outcome.line(label));
    }
    info!(
        event_id = %report.event_id,
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Publish finished"
    );
}
