//! File logging. The terminal belongs to the renderer, so log lines go to
//! a file configured through log4rs.

use crate::error::{Error, Result};
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use std::path::Path;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {t} {m}{n}";

pub fn init_log(level: LevelFilter, path: &Path) -> Result<()> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(path)
        .map_err(|e| Error::Logging(format!("{}: {e}", path.display())))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .map_err(|e| Error::Logging(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| Error::Logging(e.to_string()))?;
    Ok(())
}
