use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use pomotask_core::auth::Session;
use pomotask_core::storage::RemoteConfig;
use pomotask_core::sync::{push_unowned, Debouncer};
use pomotask_core::{
    xp, Config, CoreError, CycleRunner, Database, RemoteBackend, SupabaseClient, TaskStore,
    TimerEngine,
};
use tokio::sync::oneshot;

use super::context::{self, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground (Ctrl-C pauses)
    Run {
        /// Start each next phase without waiting for Enter
        #[arg(long)]
        autoplay: bool,
        /// Quit after this many phases
        #[arg(long)]
        phases: Option<u32>,
    },
    /// Print the state a new run starts from, as JSON
    Show,
}

pub async fn run(action: TimerAction) -> CmdResult {
    let config = Config::load()?;

    match action {
        TimerAction::Run { autoplay, phases } => {
            let db = Database::open()?;
            run_foreground(config, &db, autoplay, phases).await
        }
        TimerAction::Show => context::print_json(&TimerEngine::new(config.timer).snapshot()),
    }
}

async fn run_foreground(
    mut config: Config,
    db: &Database,
    autoplay: bool,
    phases: Option<u32>,
) -> CmdResult {
    let xp_before = xp::load(db);
    let session = if config.remote.is_configured() {
        context::current_session()
    } else {
        None
    };

    // Unmirrored tasks are pushed once the timer has been running quietly
    // for the configured delay.
    let mut debouncer = Debouncer::new(Duration::from_secs(config.sync.debounce_secs));
    if let Some(session) = session.clone() {
        if TaskStore::load(db)?.unowned().next().is_some() {
            let remote = config.remote.clone();
            debouncer.schedule(move || async move {
                if let Err(e) = deferred_push(&remote, &session).await {
                    tracing::warn!(error = %e, "deferred task push failed");
                }
            });
        }
    }

    let engine = TimerEngine::new(config.timer);
    let mut runner = CycleRunner::new(engine, context::phase_alerts(&config.notifications), db)
        .with_autoplay(autoplay || config.autoplay);
    let mut remaining = phases;

    loop {
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        let outcome = runner.run(remaining, shutdown, render).await;
        println!();

        if let Some(left) = remaining.as_mut() {
            *left = left.saturating_sub(outcome.completed.len() as u32);
            if *left == 0 {
                break;
            }
        }

        let engine = runner.engine();
        let prompt = if outcome.interrupted {
            format!(
                "paused at {} in {}. Enter resumes, Ctrl-C quits",
                context::format_clock(engine.seconds_remaining()),
                engine.phase().label()
            )
        } else {
            format!("{} is next. Enter starts, Ctrl-C quits", engine.phase().label())
        };
        if !wait_for_enter(&prompt).await {
            break;
        }
        pick_up_settings(&mut config, runner.engine_mut());
    }

    if debouncer.cancel() {
        tracing::info!("run ended before the deferred push; use `pomotask sync push`");
    }

    let xp_after = xp::load(db);
    if xp_after != xp_before {
        println!("XP {} (level {})", xp_after.xp, xp_after.level);
        if let Some(session) = session {
            let client = context::remote(&config)?;
            if let Err(e) = client.update_profile_progress(&session, &xp_after).await {
                eprintln!("warning: could not update remote profile: {e}");
            }
        }
    }
    Ok(())
}

fn render(engine: &TimerEngine) {
    print!(
        "\r{:<12} {}  [{}/{}] ",
        engine.phase().label(),
        context::format_clock(engine.seconds_remaining()),
        engine.session_index(),
        engine.config().sessions_before_long_break,
    );
    let _ = std::io::stdout().flush();
}

/// Wait for a line on stdin. `false` on Ctrl-C or end of input.
async fn wait_for_enter(prompt: &str) -> bool {
    eprint!("{prompt} ");
    let (tx, rx) = oneshot::channel();
    // A plain thread, so a pending read never holds up process exit.
    std::thread::spawn(move || {
        let mut line = String::new();
        let got_line = std::io::stdin().read_line(&mut line).is_ok_and(|n| n > 0);
        let _ = tx.send(got_line);
    });
    tokio::select! {
        got_line = rx => got_line.unwrap_or(false),
        _ = tokio::signal::ctrl_c() => false,
    }
}

/// Reconcile settings edited since the run started.
fn pick_up_settings(config: &mut Config, engine: &mut TimerEngine) {
    let fresh = match Config::load() {
        Ok(fresh) => fresh,
        Err(e) => {
            tracing::warn!(error = %e, "config reload failed, keeping current settings");
            return;
        }
    };
    if fresh.timer == config.timer {
        return;
    }
    match engine.apply_settings(fresh.timer) {
        Ok(_) => {
            println!("settings updated");
            config.timer = fresh.timer;
        }
        Err(e) => eprintln!("warning: settings not applied: {e}"),
    }
}

async fn deferred_push(remote: &RemoteConfig, session: &Session) -> Result<(), CoreError> {
    let client = SupabaseClient::new(remote)?;
    let mut tasks = TaskStore::load(Database::open()?)?;
    let report = push_unowned(&client, session, &mut tasks).await?;
    tracing::info!(pushed = report.pushed, failed = report.failed.len(), "deferred task push");
    Ok(())
}
