//! Logger setup.
//!
//! Uses the log4rs YAML file when it exists, otherwise a console logger at
//! `info`.

use crate::error::{Error, Result};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

const CONSOLE_PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:5})} {T} {m}{n}";

pub fn init(log_config: &Path) -> Result<()> {
    if log_config.exists() {
        log4rs::init_file(log_config, Default::default())
            .map_err(|e| Error::Logging(format!("{}: {e}", log_config.display())))?;
        log::debug!("logging configured from {}", log_config.display());
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))
        .map_err(|e| Error::Logging(e.to_string()))?;
    log4rs::init_config(config).map_err(|e| Error::Logging(e.to_string()))?;
    log::debug!("{} not found, logging to stderr", log_config.display());
    Ok(())
}
