use clap::Subcommand;
use pomotask_core::{theme, Config, Database, Theme};

use super::context::CmdResult;

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme explicitly
    Set {
        /// light or dark
        theme: String,
    },
}

pub fn run(action: ThemeAction) -> CmdResult {
    let fallback = if Config::load_or_default().ui.dark_mode {
        Theme::Dark
    } else {
        Theme::Light
    };
    let db = Database::open()?;

    let current = match action {
        ThemeAction::Show => theme::load(&db, fallback)?,
        ThemeAction::Toggle => theme::toggle(&db, fallback)?,
        ThemeAction::Set { theme: raw } => {
            let picked: Theme = raw.parse()?;
            theme::save(&db, picked)?;
            picked
        }
    };
    println!("{current}");
    Ok(())
}
