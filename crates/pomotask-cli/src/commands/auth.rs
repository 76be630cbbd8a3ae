use std::io::BufRead;

use clap::Subcommand;
use pomotask_core::auth::{self, Session};
use pomotask_core::sync::complete_sign_in;
use pomotask_core::{
    Config, Database, RemoteBackend, SignUpOutcome, SupabaseClient, TaskStore, TimerEngine,
};

use super::context::{self, CmdResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account
    Signup {
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Display name stored on the profile
        #[arg(long)]
        username: Option<String>,
    },
    /// Sign in and pull settings and tasks
    Login {
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in account
    Status,
}

pub async fn run(action: AuthAction) -> CmdResult {
    let mut config = Config::load()?;

    match action {
        AuthAction::Signup {
            email,
            password,
            username,
        } => {
            let client = context::remote(&config)?;
            let password = password_or_stdin(password)?;
            if let Some(name) = username.as_deref() {
                auth::remember_username(&context::credentials(), name)?;
            }
            match client.sign_up(&email, &password, username.as_deref()).await? {
                SignUpOutcome::SignedIn(session) => {
                    println!("Account created for {email}");
                    finish_sign_in(&client, &mut config, session).await?;
                }
                SignUpOutcome::ConfirmationPending { .. } => {
                    println!("Account created. Confirm your e-mail, then run `pomotask auth login {email}`.");
                }
            }
        }
        AuthAction::Login { email, password } => {
            let client = context::remote(&config)?;
            let password = password_or_stdin(password)?;
            let session = client.sign_in(&email, &password).await?;
            println!("Signed in as {email}");
            finish_sign_in(&client, &mut config, session).await?;
        }
        AuthAction::Logout => {
            let creds = context::credentials();
            let Some(session) = auth::load_session(&creds)? else {
                println!("not signed in");
                return Ok(());
            };
            if let Ok(client) = context::remote(&config) {
                if let Err(e) = client.sign_out(&session).await {
                    eprintln!("warning: remote sign-out failed: {e}");
                }
            }
            auth::clear_session(&creds)?;
            println!("signed out");
        }
        AuthAction::Status => {
            let Some(session) = context::current_session() else {
                println!("not signed in");
                return Ok(());
            };
            println!(
                "signed in as {} ({})",
                session.email.as_deref().unwrap_or("unknown"),
                session.user_id
            );
            if !config.remote.is_configured() {
                return Ok(());
            }
            let client = context::remote(&config)?;
            match client.fetch_profile(&session).await {
                Ok(Some(profile)) => {
                    println!("username: {}", profile.display_name());
                    println!("level: {}", profile.level);
                }
                Ok(None) => eprintln!("warning: no remote profile yet"),
                Err(e) => eprintln!("warning: could not fetch profile: {e}"),
            }
        }
    }
    Ok(())
}

/// Persist the session, then hydrate settings and merge tasks.
async fn finish_sign_in(client: &SupabaseClient, config: &mut Config, session: Session) -> CmdResult {
    let creds = context::credentials();
    auth::save_session(&creds, &session)?;

    let db = Database::open()?;
    let mut engine = TimerEngine::new(config.timer);
    let mut tasks = TaskStore::load(&db)?;
    let report = complete_sign_in(client, &session, &creds, &mut engine, &mut tasks).await;

    if let Some(timer) = report.hydrated {
        config.timer = timer;
        config.save()?;
        if report.used_defaults {
            println!("no saved settings, using defaults");
        }
    }
    if report.profile_created {
        println!("profile created");
    }
    println!("{} task(s) merged", report.tasks_merged);
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

fn password_or_stdin(password: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(p) = password {
        return Ok(p);
    }
    eprint!("password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    if line.is_empty() {
        return Err("password required".into());
    }
    Ok(line)
}
