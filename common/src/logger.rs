use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Process-wide logger. Lines go to the log file when one is configured,
/// otherwise to stderr so they never interleave with the rendered board.
pub struct Logger {
    prefix: Option<String>,
    file: Option<Mutex<File>>,
}

impl Logger {
    fn new(prefix: Option<String>, file: Option<File>) -> Self {
        Self {
            prefix,
            file: file.map(Mutex::new),
        }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        let formatted = format_line(self.prefix.as_deref(), file, line, message);
        match &self.file {
            Some(sink) => {
                if let Ok(mut sink) = sink.lock() {
                    let _ = writeln!(sink, "{}", formatted);
                }
            }
            None => eprintln!("{}", formatted),
        }
    }
}

fn format_line(prefix: Option<&str>, file: &str, line: u32, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
    match prefix {
        Some(prefix) => format!("[{}][{}][{}:{}] {}", timestamp, prefix, file_name, line, message),
        None => format!("[{}][{}:{}] {}", timestamp, file_name, line, message),
    }
}

pub fn init_logger(prefix: Option<String>, log_file: Option<&Path>) -> std::io::Result<()> {
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
        None => None,
    };
    LOGGER.get_or_init(|| Logger::new(prefix, file));
    Ok(())
}

/// Messages logged before `init_logger` are dropped; library code must not
/// depend on the binary having set up logging.
pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}
