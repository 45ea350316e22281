pub mod ask;
pub mod config;
pub mod event;
pub mod recommend;
pub mod upcoming;

use campusboard_core::storage::data_dir;
use campusboard_core::{Catalog, Config};

/// Load the config and open the catalog over the configured events file.
pub fn open_catalog() -> Result<(Config, Catalog), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let path = config.events_path(&data_dir()?);
    tracing::debug!(path = %path.display(), "opening events file");
    Ok((config, Catalog::open(path)))
}
