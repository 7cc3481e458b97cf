#[path = "notix/app.rs"]
mod app;
#[path = "notix/cli.rs"]
mod cli;
#[path = "notix/renderer.rs"]
mod renderer;
#[path = "notix/scenarios.rs"]
mod scenarios;

use std::error::Error as StdError;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = cli::Cli::parse_args();
    match app::run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            std::process::ExitCode::from(if err.is_user_error() { 2 } else { 1 })
        }
    }
}

fn report_error(err: &notix::error::Error) {
    eprintln!("Error: {err}");
    let mut source: Option<&dyn StdError> = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
