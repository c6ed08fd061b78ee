use std::{fmt::Display, io::Error, path::PathBuf};

#[derive(Debug)]
pub enum StripError {
    /// no path given on the command line; carries the usage text
    Usage(String),
    NotFound(PathBuf),
    /// reading, decoding, backing up or writing the target failed
    IOError(Error),
}

impl StripError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 1,
            Self::NotFound(_) => 2,
            Self::IOError(_) => 3,
        }
    }
}

impl Display for StripError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(usage) => write!(f, "{}", usage),
            Self::NotFound(path) => write!(f, "File not found: {}", path.display()),
            Self::IOError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StripError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IOError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Error> for StripError {
    fn from(err: Error) -> Self {
        Self::IOError(err)
    }
}
