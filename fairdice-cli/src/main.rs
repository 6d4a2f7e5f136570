mod terminal;

use clap::Parser;
use fairdice_core::{DicePool, FairRandom, Game};
use terminal::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE_EXAMPLE: &str = "Example: fairdice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3";

#[derive(Parser)]
#[command(name = "fairdice")]
#[command(about = "Provably-fair non-transitive dice duel against the computer")]
#[command(version)]
struct Cli {
    /// Dice as comma-separated face lists, at least three of them
    dice: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the fairness transcript as JSON when the game ends
    #[arg(long)]
    audit: bool,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so protocol output on stdout stays clean
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "fairdice={},fairdice_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let pool = match DicePool::parse(&cli.dice) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE_EXAMPLE}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, pool) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, pool: DicePool) -> anyhow::Result<()> {
    let game = Game::new(pool, FairRandom::from_os(), Terminal::new());
    let (outcome, transcript) = game.run()?;
    tracing::debug!(?outcome, "game finished");

    if cli.audit {
        println!("{}", transcript.to_json()?);
    }
    Ok(())
}
