//! Output formatting and display utilities

use crate::error::Result;
use crate::http::{ApiResponse, ResponseFormatter};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Output configuration
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
    pub silent: bool,
    pub format_json: bool,
}

/// Output writer that handles file vs stdout
pub struct OutputWriter {
    config: OutputConfig,
}

impl OutputWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Write a response body, pretty-printing JSON when configured
    pub fn write_response(&self, response: &ApiResponse) -> Result<()> {
        let formatter = ResponseFormatter::new(self.config.format_json);
        let mut body = formatter.format(&response.body, response.header("content-type"))?;
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        self.write(&body)
    }

    /// Write content to configured output
    pub fn write(&self, content: &str) -> Result<()> {
        if let Some(file_path) = &self.config.file {
            self.write_to_file(content, file_path)
        } else {
            self.write_to_stdout(content)
        }
    }

    /// Write a status line to stdout unless silenced
    pub fn write_status(&self, message: &str) -> Result<()> {
        if !self.config.silent {
            self.write_to_stdout(&format!("{}\n", message))?;
        }
        Ok(())
    }

    fn write_to_file(&self, content: &str, file_path: &Path) -> Result<()> {
        let mut file = File::create(file_path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_to_stdout(&self, content: &str) -> Result<()> {
        io::stdout().write_all(content.as_bytes())?;
        Ok(())
    }
}
