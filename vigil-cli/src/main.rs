//! ## vigil-cli
//! **Login alert entrypoint**
//!
//! Invoked from the OS login hooks as `vigil <username> <event_kind>`.
//! Exits `0` when the alert was delivered and `1` on bad arguments or any
//! delivery failure.

use std::process::ExitCode;

mod commands;

use commands::Cli;

fn main() -> ExitCode {
    let cli = match Cli::parse_invocation(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(commands::usage_exit_code(&e));
        }
    };

    ExitCode::from(commands::run_command(cli))
}
