use log::{LevelFilter, Log, Metadata, Record};
use std::{
    fmt,
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

/// Environment variable read by `LogFilter::from_env`.
pub const LOG_ENV: &str = "OVERLAY_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilterError(String);

impl fmt::Display for LogFilterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid log directive: {}", self.0)
    }
}

impl std::error::Error for LogFilterError {}

/// Level per log target.
///
/// Written as comma separated directives, `info,overlay=debug,video::v4l2=warn`.
/// A bare level sets the default; `target=level` applies to that module and
/// everything below it, the longest matching target wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    default: LevelFilter,
    targets: Vec<(String, LevelFilter)>,
}

impl LogFilter {
    pub fn new(default: LevelFilter) -> Self {
        Self {
            default,
            targets: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>, level: LevelFilter) -> Self {
        let target = target.into();
        self.targets.retain(|(t, _)| *t != target);
        self.targets.push((target, level));
        self
    }

    pub fn parse(directives: &str) -> Result<Self, LogFilterError> {
        let mut filter = Self::new(default_level());
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            let bad = || LogFilterError(directive.to_string());
            match directive.split_once('=') {
                Some((target, level)) => {
                    let target = target.trim();
                    if target.is_empty() {
                        return Err(bad());
                    }
                    let level = LevelFilter::from_str(level.trim()).map_err(|_| bad())?;
                    filter = filter.with_target(target, level);
                }
                None => filter.default = LevelFilter::from_str(directive).map_err(|_| bad())?,
            }
        }
        Ok(filter)
    }

    /// From `OVERLAY_LOG`, or the build's default level when unset or invalid.
    pub fn from_env() -> Self {
        match std::env::var(LOG_ENV) {
            Ok(directives) => Self::parse(&directives).unwrap_or_else(|error| {
                eprintln!("ignoring {LOG_ENV}: {error}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn level_for(&self, target: &str) -> LevelFilter {
        self.targets
            .iter()
            .filter(|(t, _)| {
                target == t.as_str()
                    || target
                        .strip_prefix(t.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
            .max_by_key(|(t, _)| t.len())
            .map_or(self.default, |&(_, level)| level)
    }

    /// Most verbose level any target can reach.
    pub fn max_level(&self) -> LevelFilter {
        self.targets
            .iter()
            .map(|&(_, level)| level)
            .fold(self.default, Ord::max)
    }

    pub fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level_for(metadata.target())
    }
}

impl Default for LogFilter {
    /// `Debug` and up in debug builds, `Info` and up in release builds.
    fn default() -> Self {
        Self::new(default_level())
    }
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Writes records to stdout.
pub struct StdoutLogger {
    filter: LogFilter,
}

impl StdoutLogger {
    pub fn new(filter: LogFilter) -> Self {
        Self { filter }
    }
}

/// Writes records to `<dir>/<YYYY-MM-DD>.log`, switching files when the date changes.
pub struct FileLogger {
    filter: LogFilter,
    day: Mutex<DayFile>,
}

struct DayFile {
    dir: PathBuf,
    date: String,
    file: File,
}

impl DayFile {
    fn open(dir: &Path, date: String) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("{date}.log")))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            date,
            file,
        })
    }

    fn roll_over(&mut self, today: String) {
        match Self::open(&self.dir, today) {
            Ok(next) => *self = next,
            // keep writing to the old file
            Err(error) => eprintln!("failed to roll log file over: {error}"),
        }
    }
}

fn format_record(record: &Record) -> String {
    format!(
        "{} {:<5} {} [{:?}] {}:{} {}",
        format_timestamp(),
        record.level(),
        record.target(),
        std::thread::current().id(),
        record.file().unwrap_or("?"),
        record.line().unwrap_or(0),
        record.args()
    )
}

impl FileLogger {
    pub fn new(dir: impl Into<PathBuf>, filter: LogFilter) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let day = DayFile::open(&dir, format_today())?;
        Ok(Self {
            filter,
            day: Mutex::new(day),
        })
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", format_record(record));
        }
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut day = self.day.lock().unwrap_or_else(|e| e.into_inner());
        let today = format_today();
        if today != day.date {
            day.roll_over(today);
        }

        let line = format_record(record);
        if let Err(error) = writeln!(day.file, "{line}") {
            eprintln!("failed to write to log file: {error}");
            eprintln!("{line}");
        }
    }

    fn flush(&self) {
        let mut day = self.day.lock().unwrap_or_else(|e| e.into_inner());
        day.file.flush().ok();
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_timestamp() -> String {
    let secs = unix_seconds();
    let (year, month, day) = civil_from_days((secs / 86400) as i64);
    let of_day = secs % 86400;
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}",
        of_day / 3600,
        (of_day % 3600) / 60,
        of_day % 60
    )
}

/// Current UTC date as `YYYY-MM-DD`.
pub fn format_today() -> String {
    let (year, month, day) = civil_from_days((unix_seconds() / 86400) as i64);
    format!("{year:04}-{month:02}-{day:02}")
}

// Days since 1970-01-01 to (year, month, day), Howard Hinnant's civil_from_days.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe as i64 + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

fn install(logger: Box<dyn Log>, max_level: LevelFilter) {
    // set_logger needs a 'static reference
    if log::set_logger(Box::leak(logger)).is_ok() {
        log::set_max_level(max_level);
    }
}

/// Install a `StdoutLogger` filtered by `OVERLAY_LOG`.
///
/// Only the first logger installed per process has any effect.
pub fn init_stdout_logger() {
    init_stdout_logger_with(LogFilter::from_env());
}

pub fn init_stdout_logger_with(filter: LogFilter) {
    let max_level = filter.max_level();
    install(Box::new(StdoutLogger::new(filter)), max_level);
}

/// Install a `FileLogger` writing into `dir`, filtered by `OVERLAY_LOG`.
///
/// Fails if the directory or the day file cannot be created.
pub fn init_file_logger(dir: impl Into<PathBuf>) -> std::io::Result<()> {
    init_file_logger_with(dir, LogFilter::from_env())
}

pub fn init_file_logger_with(dir: impl Into<PathBuf>, filter: LogFilter) -> std::io::Result<()> {
    let max_level = filter.max_level();
    install(Box::new(FileLogger::new(dir, filter)?), max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_from_days_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn test_civil_from_days_leap_day() {
        assert_eq!(civil_from_days(11016), (2000, 2, 29));
    }

    #[test]
    fn test_civil_from_days_new_year() {
        // 2025-01-01
        assert_eq!(civil_from_days(20089), (2025, 1, 1));
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = format_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[13..14], ":");
    }

    #[test]
    fn test_file_logger_rolls_over_on_date_change() {
        let dir = std::env::temp_dir().join(format!("overlay-log-{}-rollover", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let logger = FileLogger::new(&dir, LogFilter::new(LevelFilter::Trace)).unwrap();
        {
            let mut day = logger.day.lock().unwrap();
            *day = DayFile::open(&dir, "1999-12-31".to_string()).unwrap();
        }

        logger.log(
            &log::RecordBuilder::new()
                .level(log::Level::Warn)
                .target("overlay::pipeline")
                .file(Some("test.rs"))
                .line(Some(7))
                .args(format_args!("after midnight"))
                .build(),
        );

        let today = format_today();
        let content = fs::read_to_string(dir.join(format!("{today}.log"))).unwrap();
        assert!(content.contains("after midnight"));
        assert!(content.contains("WARN  overlay::pipeline"));
        assert_eq!(logger.day.lock().unwrap().date, today);
        assert!(fs::read_to_string(dir.join("1999-12-31.log")).unwrap().is_empty());

        fs::remove_dir_all(&dir).ok();
    }
}
