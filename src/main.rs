use clap::Parser;
use colored::Colorize;
use std::fmt::Display;
use std::process::ExitCode;
use subnet_calc::config::Config;
use subnet_calc::output::print_summary;
use subnet_calc::signals::ShutdownSignals;

fn fail(e: impl Display) -> ExitCode {
    log::error!("{e}");
    println!("{} {e}", "Error:".red());
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::parse();

    if let Err(e) = subnet_calc::logging::init(&config.log_config) {
        println!("{} {e}", "Error:".red());
        return ExitCode::FAILURE;
    }
    log::info!("#Start main() {:?}", config);

    let mut signals = match ShutdownSignals::listen() {
        Ok(signals) => signals,
        Err(e) => return fail(e),
    };

    let run_config = config.clone();
    let computation = tokio::task::spawn_blocking(move || subnet_calc::run(&run_config));

    tokio::select! {
        joined = computation => match joined {
            Ok(Ok(report)) => {
                print_summary(&report, &config.output);
                ExitCode::SUCCESS
            }
            Ok(Err(e)) => fail(e),
            Err(e) => fail(e),
        },
        e = signals.recv() => {
            fail(e);
            // The blocking computation can't be cancelled; the runtime would
            // wait for it on drop.
            std::process::exit(1)
        }
    }
}
