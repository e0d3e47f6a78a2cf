use crate::reports;
use clap::Args;
use std::process;
use steadyhand::config::Config;
use steadyhand::feedback::TerminalFeedback;
use steadyhand::feeds::{ReplayFeed, SyntheticFeed};
use steadyhand::runner::{RoundObserver, RoundRunner, RunnerOptions};
use steadyhand::sampler::SensorFeed;
use steadyhand::store::ScoreStore;
use steadyhand::ShResult;
use tracing::error;

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    #[command(flatten)]
    pub config: Config,
}

struct LivePrinter;

impl RoundObserver for LivePrinter {
    fn on_tick(&mut self, time_left: u32, score: u32, stable: bool) {
        let state = if stable { "● steady" } else { "○ moving" };
        println!("⏱  {:>3}s left | score {:>3} | {}", time_left, score, state);
    }
}

fn build_feeds(config: &Config) -> ShResult<Vec<Box<dyn SensorFeed>>> {
    let feed: Box<dyn SensorFeed> = match &config.feed.replay {
        Some(path) => Box::new(ReplayFeed::from_path(path)?),
        None => Box::new(SyntheticFeed::new(
            config.feed.seed,
            config.feed.calm_noise,
            config.feed.shake_noise,
            config.feed.shake_period_secs * 1000,
            config.feed.shake_secs * 1000,
        )),
    };
    Ok(vec![feed])
}

pub fn run(args: PlayArgs, store: &ScoreStore) {
    if let Err(e) = args.config.validate() {
        error!("{}", e);
        process::exit(1);
    }

    let feeds = build_feeds(&args.config).unwrap_or_else(|e| {
        error!("cannot build sensor feed: {}", e);
        process::exit(1);
    });

    println!("\n🎯 Hold steady for {}s!", args.config.game.duration_secs);

    let runner = RoundRunner::start(
        RunnerOptions::from(&args.config),
        feeds,
        Box::new(TerminalFeedback),
    );
    let mut runner = match runner {
        Ok(r) => r.with_observer(Box::new(LivePrinter)),
        Err(e) => {
            error!("❌ round failed to start: {}", e);
            process::exit(1);
        }
    };

    let summary = match runner.run_realtime() {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    // Zero-crossing already happened; persist before showing results
    // so the results read a consistent value. Best-effort: a failed
    // save is reported, never fatal.
    let saved = store.save(summary.score);
    let record = store.load_with_handoff(Some(summary.score));
    reports::print_results(&summary, &record, saved);
}
