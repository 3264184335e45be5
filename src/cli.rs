//! Argument parsing and logging setup (spec §6, §6c, §6d). The binary's
//! entire configuration surface is this struct; there is no separate
//! configuration file.

use std::path::PathBuf;

use clap::Parser;

/// Translate a binary's embedded debug information into typed bindings.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Path to the input binary.
    pub input: PathBuf,

    /// Output directory for generated source files.
    #[arg(long, default_value = "./output")]
    pub dst: PathBuf,

    /// Write log output to this file instead of stderr.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Raise log verbosity by one step (repeatable): ERROR, WARN, INFO, DEBUG, TRACE.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write emitted source to standard output instead of files.
    #[arg(long)]
    pub print: bool,

    /// Also emit the runtime backend source alongside generated units.
    #[arg(long)]
    pub withbackend: bool,

    /// Emit only the runtime backend source and exit.
    #[arg(long)]
    pub onlybackend: bool,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    pub fn init_logging(&self) -> anyhow::Result<()> {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(self.log_level());
        if let Some(path) = &self.log {
            let file = std::fs::File::create(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        builder.init();
        Ok(())
    }
}
