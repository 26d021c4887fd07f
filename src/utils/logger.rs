//! log4rs wiring for the `log` facade used throughout the crate.
//!
//! Two rolling files are written under the chosen directory: `app.log` for
//! everything on the root logger and `audit.log` for the mutation audit trail
//! (target [`AUDIT_TARGET`]). Developer bench lines (`dev6!`) stay off disk.

use crate::config::LogConfig;
use crate::errors::{Result, StoreError};
use log::LevelFilter;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

/// Log target of the mutation audit trail.
pub const AUDIT_TARGET: &str = "entity_memstore::audit";

const ENC_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_RETENTION: usize = 7;

/// Map a level name to a filter; unknown names fall back to `info`.
#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling_appender(base: &Path, stem: &str, keep: u32) -> Result<RollingFileAppender> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{stem}.{{}}.log")).display()), keep)
        .map_err(|e| StoreError::Config(format!("log roller for {stem}: {e}")))?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENC_PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))
        .map_err(|e| StoreError::Io(format!("log file {stem}.log: {e}")))
}

/// Configure logging globally for the process.
/// - dir: base directory for logs; if None, current directory.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
///
/// If a logger is already installed the new configuration is dropped.
///
/// # Errors
/// Returns an error if the directory or the log files cannot be created.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
) -> Result<()> {
    let base = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    std::fs::create_dir_all(&base)
        .map_err(|e| StoreError::Io(format!("log dir {}: {e}", base.display())))?;
    let keep = u32::try_from(retention.unwrap_or(DEFAULT_RETENTION)).unwrap_or(u32::MAX);
    let lvl = parse_level(level.unwrap_or("info"));

    let app = rolling_appender(&base, "app", keep)?;
    let audit = rolling_appender(&base, "audit", keep)?;
    let config = Config::builder()
        .appender(Appender::builder().build("app", Box::new(app)))
        .appender(Appender::builder().build("audit", Box::new(audit)))
        .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, lvl))
        .logger(
            Logger::builder()
                .additive(false)
                .build(crate::utils::devlog::DEV_TARGET, LevelFilter::Trace),
        )
        .build(Root::builder().appender("app").build(lvl))
        .map_err(|e| StoreError::Config(format!("log config: {e}")))?;
    if let Err(e) = log4rs::init_config(config) {
        log::debug!("logger already installed: {e}");
    }
    Ok(())
}

/// Configure logging from a [`LogConfig`] section.
///
/// # Errors
/// See [`configure_logging`].
pub fn configure_from(cfg: &LogConfig) -> Result<()> {
    configure_logging(cfg.dir.as_deref(), cfg.level.as_deref(), cfg.retention)
}

/// Configure logging from environment variables if present:
/// - MEMSTORE_LOG_DIR
/// - MEMSTORE_LOG_LEVEL
/// - MEMSTORE_LOG_RETENTION
///
/// # Errors
/// See [`configure_logging`].
pub fn configure_from_env() -> Result<()> {
    configure_from(&LogConfig::from_env())
}
