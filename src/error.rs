use std::error::Error;

use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ChartError {
    NoMeasurements(PathBuf),
    ZeroWindow(&'static str),
    InvalidConfig(String),
    ReadFile(PathBuf, std::io::Error),
    ParseMeasurements(PathBuf, serde_json::Error),
    Draw(PathBuf, String),
    TaskFailed(tokio::task::JoinError),
}

impl Display for ChartError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ChartError::NoMeasurements(ref path) => {
                write!(f, "{} contains no measurements", path.display())
            }
            ChartError::ZeroWindow(column) => {
                write!(f, "rolling window for {} must be at least 1", column)
            }
            ChartError::InvalidConfig(ref reason) => write!(f, "invalid configuration: {}", reason),
            ChartError::ReadFile(ref path, ref error) => {
                write!(f, "failed to read {}: {}", path.display(), error)
            }
            ChartError::ParseMeasurements(ref path, ref error) => {
                write!(f, "failed to parse {}: {}", path.display(), error)
            }
            ChartError::Draw(ref path, ref reason) => {
                write!(f, "failed to draw {}: {}", path.display(), reason)
            }
            ChartError::TaskFailed(ref error) => std::fmt::Display::fmt(error, f),
        }
    }
}

impl Error for ChartError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ChartError::ReadFile(_, ref error) => Some(error),
            ChartError::ParseMeasurements(_, ref error) => Some(error),
            ChartError::TaskFailed(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for ChartError {
    fn from(e: tokio::task::JoinError) -> ChartError {
        ChartError::TaskFailed(e)
    }
}
