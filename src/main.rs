use std::process::ExitCode;

use clap::Parser;
use dwarfbind::cli::Cli;
use dwarfbind::entry::UnnamedCounter;
use dwarfbind::error::TranslateError;
use dwarfbind::{backend, decoder, emit, unit};

const EX_USAGE: u8 = 64;
const EX_SOFTWARE: u8 = 70;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(EX_USAGE);
        }
    };

    if let Err(err) = cli.init_logging() {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::from(EX_SOFTWARE);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(classify(&err))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.onlybackend {
        std::fs::create_dir_all(&cli.dst)?;
        backend::write_to(&cli.dst)?;
        return Ok(());
    }

    let decoded = decoder::load(&cli.input)?;
    let mut counter = UnnamedCounter::new();

    let mut files = Vec::with_capacity(decoded.units.len());
    for root in &decoded.units {
        let file = unit::assemble_unit(root, &mut counter, decoded.endianness)?;
        files.push(file);
    }

    unit::correlate_symbols(&files, decoded.symbol_names.iter().map(String::as_str));

    if !cli.print {
        std::fs::create_dir_all(&cli.dst)?;
    }

    for file in &files {
        let text = emit::emit_file(file)?;
        if cli.print {
            println!("{text}");
        } else {
            let path = cli.dst.join(emit::output_filename(&file.source_name));
            write_file(&path, &text)?;
        }
    }

    if cli.withbackend {
        if cli.print {
            println!("{}", backend::SOURCE);
        } else {
            backend::write_to(&cli.dst)?;
        }
    }

    Ok(())
}

fn write_file(path: &std::path::Path, contents: &str) -> Result<(), TranslateError> {
    std::fs::write(path, contents).map_err(|err| TranslateError::FileWrite {
        path: path.display().to_string(),
        message: err.to_string(),
        raw_os_error: err.raw_os_error(),
    })?;
    Ok(())
}

/// Classifies a failure's root cause into the matching process exit code
/// (spec §6: "file-system error = the underlying error's errno; other
/// failures = standard SOFTWARE").
fn classify(err: &anyhow::Error) -> u8 {
    if let Some(TranslateError::FileWrite { raw_os_error, .. }) = err.downcast_ref::<TranslateError>() {
        return raw_os_error.map(|code| code as u8).unwrap_or(EX_SOFTWARE);
    }
    if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
        return io_err.raw_os_error().map(|code| code as u8).unwrap_or(EX_SOFTWARE);
    }
    EX_SOFTWARE
}
