use std::io::{self, Read};
use std::path::PathBuf;

use analysis_rpc::{serve, Service, ServiceConfig};
use anyhow::{bail, Context};
use chess_analysis::EngineSession;
use clap::{ArgGroup, Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "analysis-rpc")]
#[command(about = "Chess engine analysis and game review")]
struct Cli {
    /// Configuration file (defaults to ./analysis.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List legal moves for a FEN
    Legal { fen: String },
    /// Convert moves between UCI and SAN
    #[command(group(ArgGroup::new("notation").required(true).args(["uci", "san"])))]
    Convert {
        fen: String,
        /// UCI moves to convert to SAN
        #[arg(long, num_args = 0..)]
        uci: Option<Vec<String>>,
        /// SAN moves to convert to UCI
        #[arg(long, num_args = 0..)]
        san: Option<Vec<String>>,
    },
    /// Print the starting FEN and mainline of a PGN file
    Pgn {
        /// Path to a PGN file, or "-" for stdin
        file: String,
    },
    /// Evaluate a position with the configured engine
    Eval {
        fen: String,
        #[arg(short, long, default_value = "12")]
        depth: u32,
        #[arg(long, default_value = "1")]
        multipv: u32,
    },
    /// Answer JSON requests from stdin, one per line
    Serve,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ServiceConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve => {
            let mut service = Service::new(config);
            serve(&mut service, io::stdin().lock(), io::stdout().lock())
                .context("Request loop failed")?;
        }
        command => {
            let output = run(command, &config).unwrap_or_else(|e| json!({ "error": format!("{:#}", e) }));
            println!("{}", output);
        }
    }
    Ok(())
}

fn run(command: Commands, config: &ServiceConfig) -> anyhow::Result<Value> {
    let output = match command {
        Commands::Legal { fen } => json!({ "legal_moves_uci": chess_notation::legal_moves(&fen)? }),
        Commands::Convert { fen, uci, san } => match (uci, san) {
            (Some(moves), _) => json!({ "san": chess_notation::uci_to_san(&fen, &moves)? }),
            (None, Some(moves)) => json!({ "uci": chess_notation::san_to_uci(&fen, &moves)? }),
            (None, None) => bail!("Provide either --uci or --san"),
        },
        Commands::Pgn { file } => {
            let text = if file == "-" {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
                text
            } else {
                std::fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file))?
            };
            serde_json::to_value(chess_notation::load_pgn(&text)?)?
        }
        Commands::Eval { fen, depth, multipv } => {
            let mut session = EngineSession::new(config.engine.clone());
            let result = session.evaluate(&fen, depth, multipv);
            session.stop();
            serde_json::to_value(result?)?
        }
        Commands::Serve => bail!("serve is not a one-shot command"),
    };
    Ok(output)
}
