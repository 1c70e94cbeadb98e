use anyhow::Result;
use clap::Parser;
use mediatag::mediatag_core::{Cli, Console, ExifTool, TaggerError, run};
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("mediatag.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    let mut tools = ExifTool::new(cli.exiftool.as_str(), cli.opener.as_str());
    if !tools.available() {
        return Err(TaggerError::ToolNotFound(tools.program().to_string()).into());
    }

    let mut operator = Console::stdio();
    let summary = run(&cli.context(), &mut tools, &mut operator)?;

    if !summary.files.is_empty() {
        println!("\nDone: {summary}");
    }

    Ok(())
}
