//! RDV headless viewer — entry point.
//!
//! ```text
//! rdv-viewer                        Read the script from stdin
//! rdv-viewer --script <path>        Read the script from a file
//! rdv-viewer --config <path>        Use custom config TOML
//! rdv-viewer --gen-config           Dump default config and exit
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::io::BufReader;
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rdv_viewer::config::ViewerConfig;
use rdv_viewer::driver::Viewer;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rdv-viewer", about = "Headless remote desktop viewport driver")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "rdv-viewer.toml")]
    config: PathBuf,

    /// JSON-lines session script. Reads stdin when omitted.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Computer address (overrides config).
    #[arg(short, long)]
    address: Option<String>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        println!("{}", ViewerConfig::default_toml()?);
        return Ok(());
    }

    let mut config = ViewerConfig::load(&cli.config);
    if let Some(address) = cli.address {
        config.session.address = address;
    }

    // Init tracing. Stdout carries the event stream, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("rdv-viewer v{}", env!("CARGO_PKG_VERSION"));

    let mut viewer = Viewer::new(&config, Handle::current());
    let mut stdout = tokio::io::stdout();

    match cli.script {
        Some(path) => {
            info!("script: {}", path.display());
            let file = tokio::fs::File::open(&path).await?;
            viewer.run(BufReader::new(file), &mut stdout).await?;
        }
        None => {
            viewer.run(BufReader::new(tokio::io::stdin()), &mut stdout).await?;
        }
    }

    info!("shutting down");
    Ok(())
}
