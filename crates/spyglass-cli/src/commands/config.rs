//! `spyglass config-path` - print where configuration lives.

use anyhow::Result;
use spyglass_core::AppConfig;

pub fn run() -> Result<()> {
    println!("{}", AppConfig::config_path()?.display());
    Ok(())
}
