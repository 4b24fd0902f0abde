use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use chrono::format::{Item, StrftimeItems};
use serde::Serialize;
use serde_json::Value;

use crate::config::{Mode, WriterConfig};
use crate::error::WriterError;
use crate::format;

/// Where the next line goes. Collapses the mode and the file handle's
/// state into one value so the write path is a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Console,
    FilePending,
    FileReady,
    BothPending,
    BothReady,
}

fn resolve_dispatch(mode: Mode, file_ready: bool) -> Dispatch {
    match (mode, file_ready) {
        (Mode::Console, _) => Dispatch::Console,
        (Mode::File, false) => Dispatch::FilePending,
        (Mode::File, true) => Dispatch::FileReady,
        (Mode::Both, false) => Dispatch::BothPending,
        (Mode::Both, true) => Dispatch::BothReady,
    }
}

fn format_timestamp(pattern: &str) -> Result<String, WriterError> {
    let items: Vec<Item> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(WriterError::TimestampFormat(pattern.to_string()));
    }
    Ok(Local::now().format_with_items(items.into_iter()).to_string())
}

fn build_filename(config: &WriterConfig) -> Result<String, WriterError> {
    let mut name = config.basename.clone();
    if config.timestamp {
        name.push('-');
        name.push_str(&format_timestamp(&config.timestamp_format)?);
    }
    if let Some(extension) = &config.extension {
        name.push('.');
        name.push_str(extension);
    }
    Ok(name)
}

/// Writes lines to the console, to a log file, or to both.
///
/// The target file's name and path are fixed when the writer is built, but
/// nothing touches the filesystem until the first line actually heads for
/// the file. A writer that stays in console mode never creates the file.
pub struct PaperbackWriter {
    mode: Mode,
    inspect: bool,
    directory: Option<PathBuf>,
    filename: String,
    filepath: PathBuf,
    dispatch: Dispatch,
    file: Option<File>,
    console: Box<dyn Write>,
}

impl PaperbackWriter {
    /// Builds a writer from `config`, deriving the log filename up front.
    ///
    /// Fails if the timestamp format contains a directive chrono does not
    /// know. No directories or files are created here.
    pub fn new(config: WriterConfig) -> Result<Self, WriterError> {
        let filename = build_filename(&config)?;
        let filepath = match &config.directory {
            Some(directory) => directory.join(&filename),
            None => PathBuf::from(&filename),
        };
        Ok(Self {
            mode: config.mode,
            inspect: config.inspect,
            directory: config.directory,
            filename,
            filepath,
            dispatch: resolve_dispatch(config.mode, false),
            file: None,
            console: Box::new(io::stdout()),
        })
    }

    /// Replaces the console sink. Lines that would go to stdout go to
    /// `console` instead.
    pub fn with_console(mut self, console: Box<dyn Write>) -> Self {
        self.console = console;
        self
    }

    /// Writes one value as a line, routed by the current mode.
    pub fn write<T>(&mut self, value: &T) -> Result<&mut Self, WriterError>
    where
        T: ?Sized + Serialize,
    {
        let line = self.render(value)?;
        self.route(&line)?;
        Ok(self)
    }

    /// Writes an argument list as a line, routed by the current mode.
    ///
    /// See [`format::format_args`] for the placeholder rules.
    pub fn write_args(&mut self, args: &[Value]) -> Result<&mut Self, WriterError> {
        let line = format::format_args(args, self.inspect);
        self.route(&line)?;
        Ok(self)
    }

    /// Writes one value to the console no matter the mode.
    pub fn write_console<T>(&mut self, value: &T) -> Result<&mut Self, WriterError>
    where
        T: ?Sized + Serialize,
    {
        let line = self.render(value)?;
        self.emit_console(&line)?;
        Ok(self)
    }

    /// Writes an argument list to the console no matter the mode.
    pub fn write_console_args(&mut self, args: &[Value]) -> Result<&mut Self, WriterError> {
        let line = format::format_args(args, self.inspect);
        self.emit_console(&line)?;
        Ok(self)
    }

    /// Writes one value to the log file no matter the mode, opening the
    /// file first if this is the earliest line headed there.
    pub fn write_file<T>(&mut self, value: &T) -> Result<&mut Self, WriterError>
    where
        T: ?Sized + Serialize,
    {
        let line = self.render(value)?;
        self.append_line(&line)?;
        Ok(self)
    }

    /// Writes an argument list to the log file no matter the mode.
    pub fn write_file_args(&mut self, args: &[Value]) -> Result<&mut Self, WriterError> {
        let line = format::format_args(args, self.inspect);
        self.append_line(&line)?;
        Ok(self)
    }

    /// Switches the write target. The log file stays open across mode
    /// changes, so switching away and back appends to the same file.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.dispatch = resolve_dispatch(mode, self.file.is_some());
    }

    pub fn set_inspect(&mut self, inspect: bool) {
        self.inspect = inspect;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn inspect(&self) -> bool {
        self.inspect
    }

    /// The derived log filename, e.g. `paperback-08-23-26-1:04:05-pm.txt`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The full path the log file occupies once created.
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    fn render<T>(&self, value: &T) -> Result<String, WriterError>
    where
        T: ?Sized + Serialize,
    {
        let value = serde_json::to_value(value)?;
        Ok(format::render_value(&value, self.inspect))
    }

    fn route(&mut self, line: &str) -> Result<(), WriterError> {
        match self.dispatch {
            Dispatch::Console => self.emit_console(line),
            Dispatch::FileReady => self.append_line(line),
            Dispatch::FilePending => self.init_file_log(line),
            Dispatch::BothReady => {
                self.emit_console(line)?;
                self.append_line(line)
            }
            Dispatch::BothPending => {
                self.emit_console(line)?;
                self.init_file_log(line)
            }
        }
    }

    fn emit_console(&mut self, line: &str) -> Result<(), WriterError> {
        writeln!(self.console, "{line}")?;
        Ok(())
    }

    fn append_line(&mut self, line: &str) -> Result<(), WriterError> {
        match self.file.as_mut() {
            Some(file) => {
                writeln!(file, "{line}")?;
                Ok(())
            }
            None => self.init_file_log(line),
        }
    }

    /// Creates the configured directory, opens the log file in append
    /// mode, marks the file side ready, then writes the line that was
    /// waiting on it. On failure the writer stays pending and the next
    /// write retries.
    fn init_file_log(&mut self, pending_line: &str) -> Result<(), WriterError> {
        if let Some(directory) = &self.directory {
            fs::create_dir_all(directory)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.filepath)?;
        self.file = Some(file);
        self.dispatch = resolve_dispatch(self.mode, true);
        self.append_line(pending_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_dispatch_covers_every_mode() {
        assert_eq!(resolve_dispatch(Mode::Console, false), Dispatch::Console);
        assert_eq!(resolve_dispatch(Mode::Console, true), Dispatch::Console);
        assert_eq!(resolve_dispatch(Mode::File, false), Dispatch::FilePending);
        assert_eq!(resolve_dispatch(Mode::File, true), Dispatch::FileReady);
        assert_eq!(resolve_dispatch(Mode::Both, false), Dispatch::BothPending);
        assert_eq!(resolve_dispatch(Mode::Both, true), Dispatch::BothReady);
    }

    #[test]
    fn test_filename_derivation_without_timestamp() {
        let config = WriterConfig {
            basename: "writer".to_string(),
            timestamp: false,
            ..Default::default()
        };
        let writer = PaperbackWriter::new(config).unwrap();
        assert_eq!(writer.filename(), "writer.txt");
        assert_eq!(writer.filepath(), Path::new("writer.txt"));
    }

    #[test]
    fn test_filename_without_extension_has_no_dot() {
        let config = WriterConfig {
            basename: "bare".to_string(),
            timestamp: false,
            extension: None,
            ..Default::default()
        };
        let writer = PaperbackWriter::new(config).unwrap();
        assert_eq!(writer.filename(), "bare");
    }

    #[test]
    fn test_default_filename_carries_timestamp() {
        let writer = PaperbackWriter::new(WriterConfig::default()).unwrap();
        assert!(writer.filename().starts_with("paperback-"));
        assert!(writer.filename().ends_with(".txt"));
    }

    #[test]
    fn test_construction_touches_no_filesystem() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("logs").join("deep");
        let config = WriterConfig {
            directory: Some(nested.clone()),
            mode: Mode::File,
            ..Default::default()
        };
        let writer = PaperbackWriter::new(config).unwrap();
        assert!(writer.filepath().starts_with(&nested));
        assert!(!nested.exists());
    }

    #[test]
    fn test_invalid_timestamp_pattern_rejected_at_construction() {
        let config = WriterConfig {
            timestamp_format: "%q".to_string(),
            ..Default::default()
        };
        match PaperbackWriter::new(config) {
            Err(WriterError::TimestampFormat(pattern)) => assert_eq!(pattern, "%q"),
            other => panic!("expected a timestamp format error, got {:?}", other.map(|_| ())),
        }

        let config = WriterConfig {
            timestamp_format: "trailing %".to_string(),
            ..Default::default()
        };
        assert!(PaperbackWriter::new(config).is_err());
    }

    #[test]
    fn test_set_mode_retargets_dispatch() {
        let mut writer = PaperbackWriter::new(WriterConfig::default()).unwrap();
        assert_eq!(writer.dispatch, Dispatch::Console);
        writer.set_mode(Mode::File);
        assert_eq!(writer.dispatch, Dispatch::FilePending);
        writer.set_mode(Mode::Both);
        assert_eq!(writer.dispatch, Dispatch::BothPending);
        writer.set_mode(Mode::Console);
        assert_eq!(writer.dispatch, Dispatch::Console);
    }

    #[test]
    fn test_set_mode_same_value_is_a_noop() {
        let mut writer = PaperbackWriter::new(WriterConfig::default()).unwrap();
        writer.set_mode(Mode::Console);
        assert_eq!(writer.mode(), Mode::Console);
        assert_eq!(writer.dispatch, Dispatch::Console);
    }

    #[test]
    fn test_set_inspect_toggles() {
        let mut writer = PaperbackWriter::new(WriterConfig::default()).unwrap();
        assert!(writer.inspect());
        writer.set_inspect(false);
        assert!(!writer.inspect());
    }
}
