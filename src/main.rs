//! The AGROS binary: load the per-user policy, then run the dispatch loop.

use agros::{ConfigFile, LoopSignal, Session, StdinReader};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload};

#[derive(Parser)]
#[command(name = "agros", version, about = "The restricted AGROS shell")]
struct Cli {
    /// Path to the config file
    #[arg(long, value_name = "FILE", default_value = "/etc/agros.toml")]
    config: PathBuf,
}

/// Map the config `loglevel` onto the audit sink's verbosity.
fn level_for(loglevel: u8) -> LevelFilter {
    match loglevel {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Resolve the session user from the passwd database, falling back to the
/// environment when there is no entry for our uid.
fn current_user() -> (String, PathBuf) {
    use nix::unistd::{getuid, User};

    if let Ok(Some(user)) = User::from_uid(getuid()) {
        return (user.name, user.dir);
    }

    let name = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    let home = std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"));
    (name, home)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Start at ERROR so fatal startup problems reach the sink; raised to the
    // configured level once the policy is loaded.
    let (level, level_handle) = reload::Layer::new(LevelFilter::ERROR);
    tracing_subscriber::registry()
        .with(level)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let (user, home) = current_user();

    let config = match ConfigFile::load(&cli.config) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "could not load config");
            eprintln!(
                "Could not read config file {}\nTry using another shell or contact an administrator.",
                cli.config.display()
            );
            std::process::exit(1);
        }
    };

    let policy = match config.resolve(&user) {
        Ok(policy) => policy,
        Err(error) => {
            tracing::error!(%error, user = %user, "invalid config");
            eprintln!("Cannot launch AGROS: {error}");
            std::process::exit(1);
        }
    };

    let _ = level_handle.modify(|filter| *filter = level_for(policy.log_level()));
    tracing::info!(user = %user, "session started");

    if let Some(welcome) = policy.welcome() {
        println!("{welcome}");
    }

    let mut session = Session::new(user, home, policy);
    let mut reader = StdinReader::new();

    if session.run(&mut reader).await == LoopSignal::Lockout {
        // Hard lockout: signal the parent, exit non-zero. Never a clean exit.
        agros::hard_lockout();
    }
}
