//! The `config` command: show the effective merged configuration.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::infrastructure::config::ConfigLoader;

/// Arguments for `usher config`
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Print the configuration after defaults, files, and environment merge.
pub async fn execute(
    _args: ConfigArgs,
    config_path: Option<PathBuf>,
    json_mode: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", serde_yaml::to_string(&config)?);
    }

    Ok(())
}
