use clap::Subcommand;
use pomotask_core::{xp, Database};

use super::context::{self, CmdResult};

#[derive(Subcommand)]
pub enum XpAction {
    /// Print XP and level as JSON
    Show,
}

pub fn run(action: XpAction) -> CmdResult {
    let db = Database::open()?;
    match action {
        XpAction::Show => context::print_json(&xp::load(&db)),
    }
}
