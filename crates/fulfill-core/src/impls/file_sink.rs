//! FileEventSink - ファイル + stdout への出力
//!
//! 各行を stdout と出力ファイルの両方に書きます。ファイルは行単位で flush します。

use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{FulfillError, Result};
use crate::ports::EventSink;

/// Writes synchronously: one stdout line and one buffered file line per event,
/// inside the coordinator's critical section.
pub struct FileEventSink {
    path: PathBuf,
    writer: Mutex<Option<LineWriter<File>>>,
    echo_stdout: bool,
}

impl FileEventSink {
    /// Create (or truncate) the output file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| FulfillError::SinkUnavailable {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            writer: Mutex::new(Some(LineWriter::new(file))),
            echo_stdout: true,
        })
    }

    /// Write to the file only.
    pub fn quiet(mut self) -> Self {
        self.echo_stdout = false;
        self
    }
}

impl EventSink for FileEventSink {
    fn emit(&self, line: &str) -> Result<()> {
        if self.echo_stdout {
            println!("{line}");
        }
        let mut guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(writer) = guard.as_mut() else {
            tracing::debug!(path = %self.path.display(), "sink closed, dropping line");
            return Ok(());
        };
        writeln!(writer, "{line}")?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut writer) = guard.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
