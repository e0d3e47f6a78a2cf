use clap::{Parser, Subcommand};
use steadyhand::store::ScoreStore;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Score file (two keys: lastScore, highScore).
    #[arg(global = true, short, long, default_value = "data/scores.json")]
    store: String,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one round: keep the device (feed) still, score a point per
    /// stable second.
    Play(cmd::play::PlayArgs),
    /// Show the persisted last and high scores.
    Scores(cmd::scores::ScoresArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = ScoreStore::new(&cli.store);

    match cli.command {
        Commands::Play(args) => cmd::play::run(args, &store),
        Commands::Scores(args) => cmd::scores::run(args, &store),
    }
}
