//=========================================================================
// Multiwin Binary Entry Point
//=========================================================================
//
// Installs the logger, builds the default app and runs it.
// Exit code 0 on a clean shutdown, 1 when startup fails.
//
// Log level defaults to `info`; override with `RUST_LOG`, e.g.
//   RUST_LOG=window=debug,app=debug multiwin
//
//=========================================================================

use std::process::ExitCode;

use env_logger::Env;
use log::error;

use multiwin::AppBuilder;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut app = AppBuilder::new().build();
    match app.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: "app", "Exiting: {}", e);
            ExitCode::FAILURE
        }
    }
}
