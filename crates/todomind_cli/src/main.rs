//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todomind_core` linkage and schema bootstrap without a host UI.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;
use todomind_core::db::migrations::{current_version, latest_version};

fn main() -> ExitCode {
    println!("todomind_core ping={}", todomind_core::ping());
    println!("todomind_core version={}", todomind_core::core_version());

    let conn = match todomind_core::open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("todomind_core db_open=error error={err}");
            return ExitCode::FAILURE;
        }
    };
    match current_version(&conn) {
        Ok(version) => {
            println!(
                "todomind_core schema_version={version} latest={}",
                latest_version()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("todomind_core schema_version=error error={err}");
            ExitCode::FAILURE
        }
    }
}
