use clap::Args;

use super::open_catalog;

#[derive(Args)]
pub struct RecommendArgs {
    /// Free-text interests, e.g. "machine learning"
    interest: String,
    /// Maximum number of events (default: recommend.top_n from config)
    #[arg(long)]
    top: Option<usize>,
}

pub fn run(args: RecommendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, catalog) = open_catalog()?;
    let top_n = args.top.unwrap_or(config.recommend.top_n);
    let picks = catalog.recommend(&args.interest, top_n)?;
    println!("{}", serde_json::to_string_pretty(&picks)?);
    Ok(())
}
