pub mod cli;
pub mod error;
pub mod index;
pub mod media;
pub mod mover;
pub mod prompt;
pub mod run;
pub mod runner;
pub mod select;
pub mod staging;
pub mod tools;
pub mod workflow;

pub use cli::Cli;
pub use error::{Result, TaggerError};
pub use index::TagIndex;
pub use media::{MediaFile, MediaType, detect_media_type};
pub use mover::{MoveExecutor, MoveReport, TagMove, expand_home};
pub use prompt::{Console, Operator};
pub use run::{RunContext, RunSummary, run};
pub use runner::{OutputMode, ProcessHandle, ProcessResult, ToolRunner};
pub use select::{DATE_FORMAT, parse_date, select};
pub use staging::StagingArea;
pub use tools::{BACKUP_SUFFIX, ExifTool, MediaTools, TAG_FIELD};
pub use workflow::{Event, Outcome, TagState, TagWorkflow, is_valid_tag};
