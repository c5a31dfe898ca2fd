use clap::Subcommand;
use focushub_core::time::format_minutes;

use crate::app::{print_json, App};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's focused time and session count
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::open()?;

    match action {
        StatsAction::Today { json } => {
            let today = app.stats.today();
            if json {
                print_json(&today)?;
            } else {
                println!(
                    "{}: {} focused, {} sessions",
                    today.date,
                    format_minutes(today.total_focused_minutes),
                    today.sessions_count
                );
            }
        }
    }
    Ok(())
}
