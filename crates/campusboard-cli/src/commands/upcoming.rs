use campusboard_core::{format_long_date, parse_date};
use chrono::Local;
use clap::Args;

use super::open_catalog;

#[derive(Args)]
pub struct UpcomingArgs {
    /// Window length in days (default: upcoming.window_days from config)
    #[arg(long)]
    days: Option<i64>,
    /// Reference date as YYYY-MM-DD (default: today)
    #[arg(long)]
    today: Option<String>,
    /// Print one line per event instead of JSON
    #[arg(long)]
    pretty: bool,
}

pub fn run(args: UpcomingArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, catalog) = open_catalog()?;

    let today = match args.today {
        Some(raw) => parse_date(&raw).ok_or(format!("invalid date '{raw}': expected YYYY-MM-DD"))?,
        None => Local::now().date_naive(),
    };
    let days = args.days.unwrap_or(config.upcoming.window_days);
    let events = catalog.upcoming(today, days)?;

    if args.pretty {
        if events.is_empty() {
            println!("No events in the next {days} days.");
        }
        for event in &events {
            println!("{}  {}  ({})", format_long_date(event.date), event.name, event.category);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&events)?);
    }
    Ok(())
}
