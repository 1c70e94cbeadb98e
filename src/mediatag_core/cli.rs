use crate::mediatag_core::mover::expand_home;
use crate::mediatag_core::run::RunContext;
use crate::mediatag_core::select::parse_date;
use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;
use time::Date;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Tag photos and videos with exiftool and file them into one folder per tag"
)]
pub struct Cli {
    /// Absolute folder path that contains media files to tag
    #[arg(value_parser = parse_folder)]
    pub folder: PathBuf,

    /// Modification date of the files to tag, in format YYYY-MM-DD
    #[arg(value_parser = parse_date_arg)]
    pub date: Date,

    /// Metadata tool used to read and write tags
    #[arg(long, default_value = "exiftool")]
    pub exiftool: String,

    /// Program that opens a file with its default application
    #[arg(long, default_value = "xdg-open")]
    pub opener: String,

    /// Directory in which the temporary staging area is created
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,

    /// Enable file logging to mediatag.log
    #[arg(long = "log")]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,
}

impl Cli {
    pub fn context(&self) -> RunContext {
        RunContext {
            source_dir: self.folder.clone(),
            date: self.date,
            staging_parent: self.staging_dir.clone(),
        }
    }
}

fn parse_folder(s: &str) -> Result<PathBuf, String> {
    let path = expand_home(s);
    if !path.is_absolute() {
        return Err(format!("Path {s} is not absolute"));
    }
    if !path.exists() {
        return Err(format!("Path {s} does not exist"));
    }
    if !path.is_dir() {
        return Err(format!("Path {s} is not a directory"));
    }
    Ok(path)
}

fn parse_date_arg(s: &str) -> Result<Date, String> {
    parse_date(s).map_err(|e| e.to_string())
}
