//! Destinations for open-port results.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Target;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;

/// Receives every target confirmed open.
pub trait ResultSink {
    fn record(&mut self, target: Target) -> io::Result<()>;
}

/// Collects results in memory.
impl ResultSink for Vec<Target> {
    fn record(&mut self, target: Target) -> io::Result<()> {
        self.push(target);
        Ok(())
    }
}

/// Appends `address:port` lines to a log file and echoes `Open address:port`
/// to the console.
pub struct OpenPortSink<W: Write = io::Stdout> {
    log: Option<LineWriter<File>>,
    console: Option<W>,
}

impl OpenPortSink {
    /// Open the log file (if any) in append mode.
    ///
    /// Results are echoed to stdout when verbose or when no log file is
    /// configured.
    pub fn open(log_path: Option<&Path>, verbose: bool) -> ConfigResult<Self> {
        let log = log_path.map(open_log).transpose()?;
        let console = (verbose || log.is_none()).then(io::stdout);
        Ok(Self::new(log, console))
    }
}

impl<W: Write> OpenPortSink<W> {
    pub fn new(log: Option<File>, console: Option<W>) -> Self {
        Self {
            log: log.map(LineWriter::new),
            console,
        }
    }

    pub fn has_log(&self) -> bool {
        self.log.is_some()
    }

    pub fn echoes(&self) -> bool {
        self.console.is_some()
    }
}

impl<W: Write> ResultSink for OpenPortSink<W> {
    fn record(&mut self, target: Target) -> io::Result<()> {
        if let Some(log) = self.log.as_mut() {
            writeln!(log, "{target}")?;
        }
        if let Some(console) = self.console.as_mut() {
            writeln!(console, "Open {target}")?;
            console.flush()?;
        }
        Ok(())
    }
}

fn open_log(path: &Path) -> ConfigResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ConfigError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn target(last: u8, port: u16) -> Target {
        Target::new(u32::from_be_bytes([10, 0, 0, last]), port)
    }

    #[test]
    fn test_log_lines_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("open.log");
        fs::write(&path, "10.0.0.9:22\n").unwrap();

        let mut sink = OpenPortSink::open(Some(path.as_path()), false).unwrap();
        assert!(sink.has_log());
        assert!(!sink.echoes());
        sink.record(target(1, 80)).unwrap();
        sink.record(target(2, 443)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "10.0.0.9:22\n10.0.0.1:80\n10.0.0.2:443\n");
    }

    #[test]
    fn test_console_echo() {
        let mut sink = OpenPortSink::new(None, Some(Vec::new()));
        sink.record(target(1, 80)).unwrap();

        let printed = String::from_utf8(sink.console.take().unwrap()).unwrap();
        assert_eq!(printed, "Open 10.0.0.1:80\n");
    }

    #[test]
    fn test_echo_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("open.log");

        assert!(OpenPortSink::open(None, false).unwrap().echoes());
        assert!(OpenPortSink::open(Some(path.as_path()), true).unwrap().echoes());
        assert!(!OpenPortSink::open(Some(path.as_path()), false).unwrap().echoes());
    }

    #[test]
    fn test_unopenable_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("open.log");

        let err = OpenPortSink::open(Some(path.as_path()), false).err().unwrap();
        assert!(matches!(err, ConfigError::LogFile { .. }));
    }

    #[test]
    fn test_vec_sink() {
        let mut found: Vec<Target> = Vec::new();
        found.record(target(3, 8080)).unwrap();
        assert_eq!(found, vec![target(3, 8080)]);
    }
}
