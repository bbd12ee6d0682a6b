use std::process::ExitCode;

use azclean_core::{events, init_logging};

mod app;
mod commands;
mod report;

use commands::RunStatus;

fn main() -> ExitCode {
    let app = app::build_cli();
    let matches = app.get_matches();

    // Logs stay quiet unless -v is given; stdout carries the run narrative
    let verbose = matches.get_flag("verbose");
    init_logging(!verbose);

    let exit_code = match commands::run_command(&matches) {
        Ok(RunStatus::Clean) => 0,
        Ok(RunStatus::PartialFailure) => 1,
        Err(e) => {
            eprintln!("❌ {}", e);
            1
        }
    };

    events::log_app_shutdown(exit_code);
    ExitCode::from(exit_code)
}
