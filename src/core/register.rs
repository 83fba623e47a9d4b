//! Inspection register - a CSV file with one row per saved submission

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::inspection::InspectionRecord;

/// Errors that can occur while reading or writing the register
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("register {path:?} has an unexpected header row; expected: {expected}")]
    HeaderMismatch { path: PathBuf, expected: String },
}

/// Handle to an inspection register file
#[derive(Debug, Clone)]
pub struct Register {
    path: PathBuf,
}

impl Register {
    /// File name used when no register path is configured
    pub const DEFAULT_FILE: &'static str = "register.csv";

    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> RegisterError {
        RegisterError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_err(&self, source: csv::Error) -> RegisterError {
        RegisterError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    /// Make sure the file exists and starts with the expected header row
    pub fn ensure(&self) -> Result<(), RegisterError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let is_empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(self.io_err(e)),
        };

        if is_empty {
            tracing::info!(path = %self.path.display(), "creating inspection register");
            let mut writer = csv::Writer::from_path(&self.path).map_err(|e| self.csv_err(e))?;
            writer
                .write_record(InspectionRecord::HEADERS)
                .map_err(|e| self.csv_err(e))?;
            writer.flush().map_err(|e| self.io_err(e))?;
            return Ok(());
        }

        self.check_header()
    }

    /// Fail unless the first row is the expected header. Never writes.
    fn check_header(&self) -> Result<(), RegisterError> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| self.csv_err(e))?;
        let headers = reader.headers().map_err(|e| self.csv_err(e))?;
        if !headers.iter().eq(InspectionRecord::HEADERS.iter().copied()) {
            return Err(RegisterError::HeaderMismatch {
                path: self.path.clone(),
                expected: InspectionRecord::HEADERS.join(","),
            });
        }
        Ok(())
    }

    /// Terminate a last line left without a newline (e.g. after a manual edit)
    fn terminate_last_line(&self, file: &mut File) -> Result<(), RegisterError> {
        let len = file.metadata().map_err(|e| self.io_err(e))?.len();
        if len == 0 {
            return Ok(());
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).map_err(|e| self.io_err(e))?;
        file.read_exact(&mut last).map_err(|e| self.io_err(e))?;
        if last[0] != b'\n' {
            tracing::debug!(path = %self.path.display(), "adding missing final newline");
            file.write_all(b"\n").map_err(|e| self.io_err(e))?;
        }
        Ok(())
    }

    /// Append one record, creating the file and header first if needed
    pub fn append(&self, record: &InspectionRecord) -> Result<(), RegisterError> {
        self.ensure()?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        self.terminate_last_line(&mut file)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record).map_err(|e| self.csv_err(e))?;
        writer.flush().map_err(|e| self.io_err(e))?;

        tracing::debug!(path = %self.path.display(), "appended inspection record");
        Ok(())
    }

    /// All saved records, oldest first. A missing or empty file reads as
    /// empty and is left untouched.
    pub fn records(&self) -> Result<Vec<InspectionRecord>, RegisterError> {
        let is_empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(self.io_err(e)),
        };
        if is_empty {
            return Ok(Vec::new());
        }
        self.check_header()?;

        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| self.csv_err(e))?;
        reader
            .deserialize()
            .collect::<Result<Vec<InspectionRecord>, _>>()
            .map_err(|e| self.csv_err(e))
    }
}
