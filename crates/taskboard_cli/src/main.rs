//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a taskboard store and report schema version and row counts.
//! - Keep output deterministic (`key=value` lines) for quick sanity checks.
//!
//! Usage: `taskboard [DB_PATH]`. Without a path, `TASKBOARD_*` environment
//! variables decide the store; the default is an empty in-memory database.

use std::process::ExitCode;
use taskboard_core::db::migrations::current_user_version;
use taskboard_core::{
    core_version, init_logging_from_config, CrudRepository, RepoResult, SqliteConnector,
    StoreConfig,
};

fn main() -> ExitCode {
    let config = match std::env::args_os().nth(1) {
        Some(path) => StoreConfig::file(path),
        None => match StoreConfig::from_env() {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error={err}");
                return ExitCode::from(2);
            }
        },
    };

    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning=logging_disabled reason={err}");
    }

    println!("taskboard_core version={}", core_version());
    match report(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_report module=cli status=error error={err}");
            eprintln!("error={err}");
            ExitCode::FAILURE
        }
    }
}

fn report(config: &StoreConfig) -> RepoResult<()> {
    let connector = SqliteConnector::open(config)?;
    println!(
        "schema_version={}",
        current_user_version(connector.connection())?
    );

    let counts = [
        ("customers", connector.customers().count()?),
        ("employees", connector.employees().count()?),
        ("projects", connector.projects().count()?),
        ("sprints", connector.sprints().count()?),
        ("tasks", connector.tasks().count()?),
        ("task_confirmations", connector.task_confirmations().count()?),
    ];
    for (table, rows) in counts {
        println!("table={table} rows={rows}");
    }
    Ok(())
}
