use std::io;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use madison_bingo::board::{BoardGenerator, SeedMode, week_key, week_label};
use madison_bingo::board_renderer::render_board_to_png;
use madison_bingo::celebration::{Silent, TerminalCelebration};
use madison_bingo::config::BingoConfig;
use madison_bingo::repl;
use madison_bingo::session::BingoSession;
use madison_bingo::view::{render, render_text};

#[derive(Parser, Debug)]
#[command(name = "madison-bingo", version, about = "Madison County photo bingo")]
struct Cli {
    #[arg(long, global = true, help = "JSON config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Activity catalog JSON, overrides the config file")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, value_enum, help = "How boards are randomized")]
    seed_mode: Option<SeedArg>,
    #[arg(long, global = true, help = "Seed for --seed-mode fixed (implies it when given alone)")]
    seed: Option<u64>,
    #[arg(long, global = true, help = "Do not ring the terminal bell on bingo")]
    no_sound: bool,
    #[arg(long, global = true, help = "Log as JSON lines on stderr")]
    log_json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively on stdin/stdout
    Play,
    /// Generate one board and render it
    Board {
        #[arg(long, default_value = "bingo_board.png")]
        out: PathBuf,
        #[arg(long, help = "Print the board as text instead of writing an image")]
        text: bool,
        #[arg(long, help = "Print the board labels as JSON instead of writing an image")]
        json: bool,
    },
    /// Print the week key boards are grouped by
    Week {
        #[arg(long, help = "Day to compute the week for (YYYY-MM-DD), defaults to today")]
        date: Option<NaiveDate>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SeedArg {
    Unseeded,
    Weekly,
    Fixed,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr)).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_writer(io::stderr)).init();
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<BingoConfig> {
    let mut config = match &cli.config {
        Some(path) => BingoConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => BingoConfig::default(),
    };
    if let Some(catalog) = &cli.catalog {
        config.catalog = Some(catalog.clone());
    }
    config.seed = match (cli.seed_mode, cli.seed) {
        (Some(SeedArg::Unseeded), _) => SeedMode::Unseeded,
        (Some(SeedArg::Weekly), _) => SeedMode::Weekly,
        (Some(SeedArg::Fixed), Some(seed)) | (None, Some(seed)) => SeedMode::Fixed { seed },
        (Some(SeedArg::Fixed), None) => match config.seed {
            fixed @ SeedMode::Fixed { .. } => fixed,
            _ => bail!("--seed-mode fixed needs --seed or a fixed seed in the config file"),
        },
        (None, None) => config.seed,
    };
    if cli.no_sound {
        config.celebration.sound = false;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = resolve_config(&cli)?;
    let catalog = config.load_catalog().context("loading activity catalog")?;
    let generator = BoardGenerator::new(catalog, config.seed);

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => {
            let celebration = TerminalCelebration::new(io::stdout(), config.celebration.sound);
            let mut session = BingoSession::new(generator, celebration).with_burst(config.celebration.confetti);
            repl::run(&mut session, io::stdin().lock(), io::stdout(), &config.render)?;
        }
        Commands::Board { out, text, json } => {
            let session = BingoSession::new(generator, Silent);
            if json {
                println!("{}", serde_json::to_string_pretty(session.board())?);
            } else if text {
                print!("{}", render_text(&render(&session)));
            } else {
                render_board_to_png(&render(&session), session.photos(), &config.render, &out)
                    .with_context(|| format!("rendering {}", out.display()))?;
                println!("Bingo board image written to {}", out.display());
            }
        }
        Commands::Week { date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            println!("{} ({})", week_label(date), week_key(date));
        }
    }
    Ok(())
}
