use crate::mediatag_core::error::Result;
use crate::mediatag_core::index::TagIndex;
use crate::mediatag_core::media::MediaFile;
use crate::mediatag_core::mover::MoveExecutor;
use crate::mediatag_core::prompt::Operator;
use crate::mediatag_core::select::{format_date, select};
use crate::mediatag_core::staging::StagingArea;
use crate::mediatag_core::tools::MediaTools;
use crate::mediatag_core::workflow::{Outcome, TagWorkflow};
use std::path::PathBuf;
use time::Date;

/// Inputs of one tagging run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub source_dir: PathBuf,
    pub date: Date,
    /// Where to create the staging area. System temp dir when `None`.
    pub staging_parent: Option<PathBuf>,
}

/// What happened to the selected files.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: Vec<MediaFile>,
    pub skipped: usize,
    pub removed: usize,
    pub tagged: usize,
    pub moved: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} selected, {} tagged, {} skipped, {} removed, {} moved",
            self.files.len(),
            self.tagged,
            self.skipped,
            self.removed,
            self.moved
        )
    }
}

/// Select, tag and move the files of `ctx`.
///
/// Any failure aborts the run. The staging area is removed on every path.
pub fn run<T, O>(ctx: &RunContext, tools: &mut T, operator: &mut O) -> Result<RunSummary>
where
    T: MediaTools + ?Sized,
    O: Operator + ?Sized,
{
    let mut summary = RunSummary {
        files: select(&ctx.source_dir, ctx.date)?,
        ..Default::default()
    };

    if summary.files.is_empty() {
        operator.say(&format!(
            "There are no files with date {} at path {}",
            format_date(ctx.date),
            ctx.source_dir.display()
        ))?;
        return Ok(summary);
    }

    let staging = match &ctx.staging_parent {
        Some(parent) => StagingArea::create_in(parent)?,
        None => StagingArea::create()?,
    };

    let mut index = TagIndex::new();
    let total = summary.files.len();
    for (i, file) in summary.files.iter_mut().enumerate() {
        operator.say(&format!(
            "\n[{}/{}] {} {}",
            i + 1,
            total,
            file.media_type,
            file.path.display()
        ))?;
        let staged = staging.stage_copy(&file.path)?;
        match TagWorkflow::new(&staged).run(tools, operator, &mut index)? {
            Outcome::Skipped => summary.skipped += 1,
            Outcome::Removed => summary.removed += 1,
            Outcome::Tagged { tag, .. } => {
                summary.tagged += 1;
                file.tag = Some(tag);
            }
        }
        file.staged = Some(staged);
    }

    staging.sweep_backups()?;

    let report = MoveExecutor::new(&ctx.source_dir).execute(&index, staging, operator)?;
    summary.moved = report.total_moved();
    log::info!("Run finished: {}", summary);
    Ok(summary)
}
