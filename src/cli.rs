use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use clap::{error::ErrorKind, CommandFactory, Parser};

use crate::{
    backup::{backup_path, replace, write_backup, DEFAULT_SUFFIX},
    error::StripError,
    source::file::SourceFile,
};

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Strip `//` line comments from a C-like source file in place, keeping a backup
/// of the original next to it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Source file to clean
    pub path: Option<PathBuf>,

    /// Appended to the file name to form the backup path
    #[arg(short, long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// Print the cleaned source to stdout, leaving the file and backup alone
    #[arg(short = 'n', long, default_value_t = false)]
    pub dry_run: bool,

    /// Level of log output on stderr, RUST_LOG takes precedence
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

pub fn usage() -> String {
    Args::command().render_usage().to_string()
}

/// Parses the command line. Help and version requests print and exit right away,
/// every other clap error becomes a usage error.
pub fn parse_args<I, T>(argv: I) -> Result<Args, StripError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(argv).or_else(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => Err(StripError::Usage(err.to_string().trim_end().to_owned())),
    })
}

pub fn init_logger(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn strip(path: &Path, original: &[u8]) -> Result<SourceFile, StripError> {
    let cleaned = SourceFile::from_bytes(&path.display().to_string(), original)?;
    log::debug!(
        "{}: {} line comment(s) found",
        cleaned.path(),
        cleaned.stripped()
    );
    Ok(cleaned)
}

/// Backs up, strips and rewrites the file named by `args`. Once the backup exists
/// the only outcomes are a fully rewritten file or an error with the original in
/// place.
pub fn run(args: &Args) -> Result<(), StripError> {
    let path = args
        .path
        .as_deref()
        .ok_or_else(|| StripError::Usage(usage()))?;
    if !path.is_file() {
        return Err(StripError::NotFound(path.to_path_buf()));
    }
    let original = fs::read(path)?;

    if args.dry_run {
        let cleaned = strip(path, &original)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(cleaned.to_string().as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    log::info!(
        "Creating backup: {}",
        backup_path(path, &args.suffix).display()
    );
    write_backup(path, &original, &args.suffix)?;

    let cleaned = strip(path, &original)?;
    log::info!("Writing cleaned file: {}", path.display());
    replace(path, cleaned.to_string().as_bytes())?;
    log::info!("Done. Removed {} line comment(s).", cleaned.stripped());
    Ok(())
}

pub fn report(err: &StripError) {
    match err {
        StripError::Usage(usage) => eprintln!("{}", usage),
        _ => log::error!("{}", err),
    }
}
