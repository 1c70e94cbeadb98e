use crate::mediatag_core::error::{Result, TaggerError, ignore_not_found};
use crate::mediatag_core::index::TagIndex;
use crate::mediatag_core::prompt::Operator;
use crate::mediatag_core::tools::MediaTools;
use std::fs;
use std::path::Path;

/// Where a file is in its tagging conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagState {
    /// Shown in the viewer, waiting for the viewer to exit.
    Opened,
    SkipQuery,
    RemoveQuery,
    /// Reading the tag already stored in the file.
    TagQuery,
    ChangeQuery { existing: String },
    /// Asking for a new tag and writing it.
    TagEntry,
    Skipped,
    Removed,
    TagConfirmed { tag: String, written: bool },
}

/// Input that moves a [`TagState`] forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Viewed,
    Answer(bool),
    ExistingTag(String),
    TagWritten(String),
}

impl TagState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TagState::Skipped | TagState::Removed | TagState::TagConfirmed { .. }
        )
    }

    /// Transition function. Events that do not apply to the state are errors.
    pub fn on(self, event: Event) -> Result<TagState> {
        use TagState::*;

        let next = match (self, event) {
            (Opened, Event::Viewed) => SkipQuery,
            (SkipQuery, Event::Answer(true)) => Skipped,
            (SkipQuery, Event::Answer(false)) => RemoveQuery,
            (RemoveQuery, Event::Answer(true)) => Removed,
            (RemoveQuery, Event::Answer(false)) => TagQuery,
            (TagQuery, Event::ExistingTag(tag)) if !is_valid_tag(&tag) => TagEntry,
            (TagQuery, Event::ExistingTag(existing)) => ChangeQuery { existing },
            (ChangeQuery { .. }, Event::Answer(true)) => TagEntry,
            (ChangeQuery { existing }, Event::Answer(false)) => TagConfirmed {
                tag: existing,
                written: false,
            },
            (TagEntry, Event::TagWritten(tag)) => TagConfirmed { tag, written: true },
            (state, event) => {
                return Err(TaggerError::Workflow(format!("{event:?} in state {state:?}")));
            }
        };
        Ok(next)
    }
}

/// How a file left the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    Removed,
    Tagged { tag: String, written: bool },
}

/// A tag must be usable as a single folder name.
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag != "."
        && tag != ".."
        && !tag.contains('/')
        && !tag.chars().any(char::is_whitespace)
}

/// Interactive tagging of one staged file.
#[derive(Debug)]
pub struct TagWorkflow<'a> {
    staged: &'a Path,
    state: TagState,
}

impl<'a> TagWorkflow<'a> {
    pub fn new(staged: &'a Path) -> Self {
        TagWorkflow {
            staged,
            state: TagState::Opened,
        }
    }

    pub fn state(&self) -> &TagState {
        &self.state
    }

    /// Perform the action of the current state and move to the next one.
    pub fn step<T, O>(&mut self, tools: &mut T, operator: &mut O) -> Result<()>
    where
        T: MediaTools + ?Sized,
        O: Operator + ?Sized,
    {
        let event = match &self.state {
            TagState::Opened => {
                tools.open(self.staged)?;
                Event::Viewed
            }
            TagState::SkipQuery => Event::Answer(operator.confirm("Skip file?")?),
            TagState::RemoveQuery => Event::Answer(operator.confirm("Remove file?")?),
            TagState::TagQuery => {
                let existing = tools.read_tag(self.staged)?.trim().to_string();
                if !existing.is_empty() && !is_valid_tag(&existing) {
                    operator.say(&format!("Ignoring unusable tag in file: {existing}"))?;
                }
                Event::ExistingTag(existing)
            }
            TagState::ChangeQuery { existing } => Event::Answer(
                operator.confirm(&format!("File already has a tag: {existing}, change it?"))?,
            ),
            TagState::TagEntry => {
                let tag = ask_tag(operator)?;
                tools.write_tag(self.staged, &tag)?;
                Event::TagWritten(tag)
            }
            finished => {
                return Err(TaggerError::Workflow(format!("already finished: {finished:?}")));
            }
        };

        self.state = self.state.clone().on(event)?;

        match &self.state {
            TagState::Skipped => operator.say("Skipping file...")?,
            TagState::Removed => {
                operator.say(&format!("Removing {} ...", self.staged.display()))?;
                ignore_not_found(fs::remove_file(self.staged))?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Drive the file to a terminal state. A confirmed tag is recorded in `index`.
    pub fn run<T, O>(
        mut self,
        tools: &mut T,
        operator: &mut O,
        index: &mut TagIndex,
    ) -> Result<Outcome>
    where
        T: MediaTools + ?Sized,
        O: Operator + ?Sized,
    {
        operator.say(&format!("Opening {}", self.staged.display()))?;
        while !self.state.is_terminal() {
            self.step(tools, operator)?;
        }

        let outcome = match self.state {
            TagState::Skipped => Outcome::Skipped,
            TagState::Removed => Outcome::Removed,
            TagState::TagConfirmed { tag, written } => {
                index.record(&tag, self.staged.to_path_buf())?;
                log::info!("Tagged {} as {}", self.staged.display(), tag);
                Outcome::Tagged { tag, written }
            }
            other => return Err(TaggerError::Workflow(format!("stopped in state {other:?}"))),
        };
        Ok(outcome)
    }
}

fn ask_tag<O: Operator + ?Sized>(operator: &mut O) -> Result<String> {
    loop {
        let tag = operator.ask("Enter the tag for the file without spaces")?;
        if is_valid_tag(&tag) {
            return Ok(tag);
        }
        operator.say("A tag must be a single word without spaces or slashes")?;
    }
}
