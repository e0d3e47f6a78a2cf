use crate::reports;
use clap::Args;
use steadyhand::store::ScoreStore;

#[derive(Args, Debug, Clone)]
pub struct ScoresArgs {}

pub fn run(_args: ScoresArgs, store: &ScoreStore) {
    let record = store.load();
    reports::print_scores(&record);
}
