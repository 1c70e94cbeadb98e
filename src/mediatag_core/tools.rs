use crate::mediatag_core::error::{Result, TaggerError};
use crate::mediatag_core::runner::{OutputMode, ToolRunner, join_command_line};
use std::path::Path;

/// Metadata field holding the tag.
pub const TAG_FIELD: &str = "Subject";

/// Suffix exiftool appends to the backup copy it leaves next to an edited file.
pub const BACKUP_SUFFIX: &str = "_original";

/// The external tools the tagging workflow depends on.
pub trait MediaTools {
    /// Open the file in the default viewer and wait for the opener to exit.
    fn open(&mut self, path: &Path) -> Result<()>;

    /// Read the tag field, trimmed. Empty when the file has no tag.
    fn read_tag(&mut self, path: &Path) -> Result<String>;

    /// Write the tag field, preserving the file's modification time.
    fn write_tag(&mut self, path: &Path, tag: &str) -> Result<()>;
}

/// `exiftool` for metadata and an opener program (`xdg-open`) for viewing.
#[derive(Debug, Clone)]
pub struct ExifTool {
    runner: ToolRunner,
    program: String,
    opener: String,
}

impl ExifTool {
    pub fn new(program: impl Into<String>, opener: impl Into<String>) -> Self {
        ExifTool {
            runner: ToolRunner::new(),
            program: program.into(),
            opener: opener.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check if the metadata tool is installed.
    pub fn available(&self) -> bool {
        self.runner.available(&self.program, "-ver")
    }
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        TaggerError::InvalidCommandLine(format!("non UTF-8 path: {}", path.display()))
    })
}

impl MediaTools for ExifTool {
    fn open(&mut self, path: &Path) -> Result<()> {
        let line = join_command_line([self.opener.as_str(), path_arg(path)?])?;
        let mut handle = self.runner.spawn(&line, OutputMode::Suppress)?;
        self.runner.wait(&mut handle)?;
        self.runner.check(&mut handle)?;
        Ok(())
    }

    fn read_tag(&mut self, path: &Path) -> Result<String> {
        let field = format!("-{TAG_FIELD}");
        let line = join_command_line([
            self.program.as_str(),
            "-s3",
            field.as_str(),
            path_arg(path)?,
        ])?;
        let result = self.runner.run(&line, OutputMode::Capture)?;
        Ok(result.stdout.trim().to_string())
    }

    fn write_tag(&mut self, path: &Path, tag: &str) -> Result<()> {
        let assignment = format!("-{TAG_FIELD}={tag}");
        // -P keeps the file modification date
        let line = join_command_line([
            self.program.as_str(),
            "-P",
            assignment.as_str(),
            path_arg(path)?,
        ])?;
        self.runner.run(&line, OutputMode::Inherit)?;
        Ok(())
    }
}
