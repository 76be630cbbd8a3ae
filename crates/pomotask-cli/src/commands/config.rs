use clap::Subcommand;
use pomotask_core::Config;

use super::context::{self, CmdResult};
use super::settings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.focus_minutes", "sync.debounce_secs")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub async fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let before = config.timer;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
            if config.timer != before {
                settings::mirror_to_remote(&config).await?;
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            context::print_json(&config)?;
        }
        ConfigAction::Reset => {
            let before = Config::load_or_default().timer;
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
            if config.timer != before {
                settings::mirror_to_remote(&config).await?;
            }
        }
    }
    Ok(())
}
