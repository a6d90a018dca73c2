use crate::{
    config::Config,
    log::{log_level::LogLevel, log_msg::LogMsg, logger_handle::LoggerHandle},
};

use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::mpsc::{self, TrySendError},
    thread,
    time::{SystemTime, UNIX_EPOCH},
};

/// Flush every 20 lines when debugging so a crash loses little.
#[cfg(feature = "log-debug")]
const FLUSH_BATCH_SIZE: u32 = 20;

/// Flush every 200 lines otherwise.
#[cfg(not(feature = "log-debug"))]
const FLUSH_BATCH_SIZE: u32 = 200;

const DEFAULT_QUEUE_CAP: usize = 1_024;

/// Bounded, non-blocking logger that writes to a per-process log file.
///
/// Producers enqueue through a [`LoggerHandle`]; a dedicated `logger-worker`
/// thread drains the queue, writes one rendered line per message and flushes
/// in batches. Dropping the last handle (including the one held here) ends
/// the worker after it has flushed.
pub struct Logger {
    handle: LoggerHandle,
    _thread: Option<thread::JoinHandle<()>>,
    file_path: PathBuf,
}

impl Logger {
    /// Starts a logger configured from the `[Logging]` section.
    ///
    /// Recognised keys: `log_path` (directory, `~` expanded), `level`
    /// (`trace`..`error`, default `info`) and `queue_cap`. Without a
    /// `log_path` the file goes to `logs/` next to the executable.
    #[must_use]
    pub fn start(config: &Config, app_name: &str) -> Self {
        let min_level = config
            .get_non_empty("Logging", "level")
            .and_then(parse_level)
            .unwrap_or(LogLevel::Info);
        let cap = config
            .get_parsed("Logging", "queue_cap", DEFAULT_QUEUE_CAP)
            .unwrap_or(DEFAULT_QUEUE_CAP);

        let dir = match config.get_non_empty("Logging", "log_path") {
            Some(dir) => expand_path(dir),
            None => exe_dir_fallback_cwd().join("logs"),
        };
        Self::start_in_dir(dir, app_name, cap, min_level)
    }

    /// Starts the logger in `dir`, creating it if needed.
    ///
    /// The file is named `{app_name}-{unix_secs}-pid{pid}.log`. If it cannot
    /// be opened the worker falls back to a file in the temp directory, then
    /// to a sink; it never panics.
    pub fn start_in_dir<D: AsRef<Path>>(
        dir: D,
        app_name: &str,
        cap: usize,
        min_level: LogLevel,
    ) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let file_path = dir.join(format!("{app_name}-{secs}-pid{}.log", std::process::id()));

        let (tx, rx) = mpsc::sync_channel::<LogMsg>(cap.max(1));
        let handle = LoggerHandle { tx, min_level };

        let worker_path = file_path.clone();
        let _thread = thread::Builder::new()
            .name("logger-worker".into())
            .spawn(move || {
                let writer: Box<dyn Write + Send> = match open_append(&worker_path) {
                    Ok(f) => Box::new(f),
                    Err(_) => {
                        match open_append(&std::env::temp_dir().join("gatelink-fallback.log")) {
                            Ok(f) => Box::new(f),
                            Err(_) => Box::new(io::sink()),
                        }
                    }
                };
                let mut out = BufWriter::new(writer);
                let mut lines: u32 = 0;

                while let Ok(m) = rx.recv() {
                    let _ = writeln!(&mut out, "{}", m.render());
                    lines = lines.wrapping_add(1);
                    if lines.is_multiple_of(FLUSH_BATCH_SIZE) || m.level >= LogLevel::Warn {
                        let _ = out.flush();
                    }
                }
                let _ = out.flush();
            })
            .ok();

        Self {
            handle,
            _thread,
            file_path,
        }
    }

    /// Enqueues one line without blocking; see [`LoggerHandle::try_log`].
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), TrySendError<LogMsg>> {
        self.handle.try_log(level, text, target)
    }

    #[must_use]
    pub fn handle(&self) -> LoggerHandle {
        self.handle.clone()
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Closes the queue and waits for the worker to flush everything that
    /// was accepted.
    pub fn shutdown(self) {
        let Logger {
            handle,
            _thread: worker,
            ..
        } = self;
        drop(handle);
        if let Some(t) = worker {
            let _ = t.join();
        }
    }
}

fn open_append(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn parse_level(raw: &str) -> Option<LogLevel> {
    match raw.to_ascii_lowercase().as_str() {
        "trace" => Some(LogLevel::Trace),
        "debug" => Some(LogLevel::Debug),
        "info" => Some(LogLevel::Info),
        "warn" | "warning" => Some(LogLevel::Warn),
        "error" => Some(LogLevel::Error),
        _ => None,
    }
}

/// Directory of the running executable, or the working directory.
fn exe_dir_fallback_cwd() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Expands a leading `~` to the user's home directory.
fn expand_path(path_str: &str) -> PathBuf {
    if let Some(rest) = path_str.strip_prefix('~') {
        if let Some(mut home) = std::env::var_os("HOME").map(PathBuf::from) {
            let rest = rest.trim_start_matches(['/', '\\']);
            if !rest.is_empty() {
                home.push(rest);
            }
            return home;
        }
    }
    PathBuf::from(path_str)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::LogSink;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "gatelink-log-{tag}-{}-{}",
            std::process::id(),
            crate::clock::unix_millis()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn writes_rendered_lines_and_respects_min_level() {
        let dir = scratch_dir("write");
        let logger = Logger::start_in_dir(&dir, "gate", 16, LogLevel::Info);
        let path = logger.file_path().to_path_buf();

        let h = logger.handle();
        h.log(LogLevel::Debug, "poll", "gatelink::link");
        h.log(LogLevel::Warn, "checksum mismatch", "gatelink::frame");
        drop(h);
        logger.shutdown();

        let text = fs::read_to_string(&path).expect("log file exists");
        assert!(!text.contains("poll"));
        let line = text.lines().next().expect("one line");
        assert!(line.starts_with("[WARN] "));
        assert!(line.ends_with("| gatelink::frame | checksum mismatch"));

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("gate-"));
        assert!(name.ends_with(&format!("-pid{}.log", std::process::id())));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn config_selects_directory_and_level() {
        let dir = scratch_dir("cfg");
        let cfg = Config::parse(&format!(
            "[Logging]\nlog_path = {}\nlevel = error\n",
            dir.display()
        ));
        let logger = Logger::start(&cfg, "keypad");
        assert!(logger.file_path().starts_with(&dir));

        logger
            .try_log(LogLevel::Warn, "filtered", "t")
            .expect("accepted and discarded");
        logger.try_log(LogLevel::Error, "kept", "t").expect("queued");
        let path = logger.file_path().to_path_buf();
        logger.shutdown();

        let text = fs::read_to_string(path).expect("log file exists");
        assert!(text.contains("kept"));
        assert!(!text.contains("filtered"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(parse_level("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(parse_level("warning"), Some(LogLevel::Warn));
        assert_eq!(parse_level("loud"), None);
    }
}
