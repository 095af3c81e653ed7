//! meishi: digital business cards and stock guide
//!
//! Main entry point for the meishi command line.
//!
//! Usage:
//!   meishi card new <name> [options]   - Create a card
//!   meishi stock price <ticker>        - Show a quote
//!   meishi watchlist                   - Show the watchlist
//!   meishi --help                      - Show help

mod cli;
mod error;

use meishi_core::Config;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Execute a subcommand
    Command(Vec<String>),
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("meishi {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Command(args) => args,
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    let command = match cli::parse_command(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run `meishi --help` for usage.");
            return Err(e.into());
        }
    };

    if let Err(e) = cli::run(&config, command).await {
        tracing::error!("Command failed: {}", e);
        if e.is_backend() {
            eprintln!("The backend is not reachable right now. Please try again.");
        }
        return Err(e.into());
    }

    Ok(())
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("--help") | Some("-h") | Some("help") => RunMode::Help,
        Some("--version") | Some("-v") => RunMode::Version,
        _ => RunMode::Command(args),
    }
}

/// Print help message
fn print_help() {
    println!("meishi - digital business cards and stock guide");
    println!();
    println!("Usage:");
    println!("  meishi card new <name> [--phone label=value] [--email ...] [--website ...] [--fax ...]");
    println!("                         [--address text] [--privacy public|link_only|private]");
    println!("                         [--theme blue|pink] [--template N] [--photo path]");
    println!("  meishi card show <id>          Show a card");
    println!("  meishi card list [--json]      List your cards");
    println!("  meishi card delete <id>        Delete one of your cards");
    println!("  meishi card share <id>         Print the share link");
    println!("  meishi card collect <id>       Save someone's card");
    println!("  meishi card collection         List saved cards");
    println!("  meishi account [show]          Show the current account");
    println!("  meishi account link <provider> Link the anonymous account");
    println!("  meishi stock price <ticker>");
    println!("  meishi stock diagnosis <ticker>");
    println!("  meishi stock analyze <ticker> [question]");
    println!("  meishi stock news <query> [days]");
    println!("  meishi stock keyword");
    println!("  meishi watchlist [list]");
    println!("  meishi watchlist add <ticker> <company> [memo]");
    println!("  meishi watchlist memo <id> <memo>");
    println!("  meishi watchlist remove <id>");
    println!("  meishi prefs [show]");
    println!("  meishi prefs theme <blue|pink>");
    println!("  meishi prefs language <code>");
    println!("  meishi --help | --version");
    println!();
    println!("Environment Variables:");
    println!("  MEISHI_DB_PATH         SQLite database (default: data/meishi.db)");
    println!("  MEISHI_PHOTO_DIR       Photo directory (default: data/photos)");
    println!("  MEISHI_PUBLIC_URL      Origin for share links (default: http://localhost:5173)");
    println!("  MEISHI_PREFERENCES     Preferences file (default: data/preferences.toml)");
    println!("  STOCK_API_URL          Stock API base URL; unset or 'demo' for demo mode");
    println!("  STOCK_API_TIMEOUT      Request timeout in seconds (default: 30)");
    println!("  STOCK_DEMO_LATENCY_MS  Demo response delay (default: 500)");
    println!("  RUST_LOG               Log filter (default: info)");
}
