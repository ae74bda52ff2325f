//! letterbot entry point.
//!
//! One invocation performs one state transition (`tick`, the cron entry
//! point) or one of the direct maintenance commands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use letterbot::{BotConfig, BotRunner, FileInputSource, Lexicon, OutboxPublisher};

#[derive(Parser)]
#[command(name = "letterbot", version, about = "Mad-libs letter randomizer bot")]
struct Cli {
    /// Path to the bot configuration file.
    #[arg(long, env = "LETTERBOT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a fresh shuffled backlog and start the first template.
    Init,
    /// Perform one scheduled state transition.
    Tick,
    /// Bind words from TEXT into the current letter.
    ParseInput {
        text: String,
        /// Only consider the first word of the text.
        #[arg(long)]
        first_only: bool,
    },
    /// Fill all remaining slots from the word source and compose.
    FillMissing,
    /// Generate a complete randomized letter in one shot.
    Generate,
    /// Show run state and remaining word needs.
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "letterbot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BotConfig::from_file(path)?,
        None => BotConfig::load()?,
    };

    let lexicon = Lexicon::from_file(&config.lexicon_path)?;
    let input = FileInputSource::new(&config.input_path);
    let publisher = OutboxPublisher::new(&config.outbox_path);
    let mut runner = BotRunner::new(
        config,
        &lexicon,
        &lexicon,
        &lexicon,
        Box::new(input),
        Box::new(publisher),
    );

    let mut rng = rand::thread_rng();
    match cli.command {
        Command::Init => runner.init(&mut rng)?,
        Command::Tick => runner.tick(&mut rng)?,
        Command::ParseInput { text, first_only } => {
            let bound = runner.parse_input(&text, first_only)?;
            println!("bound {bound} words");
        }
        Command::FillMissing => {
            let (title, path) = runner.fill_missing()?;
            println!("{title}: {}", path.display());
        }
        Command::Generate => {
            let (title, path) = runner.generate(&mut rng)?;
            println!("{title}: {}", path.display());
        }
        Command::Show => print!("{}", runner.show()?),
    }

    Ok(())
}
