use crate::core::ini::EntryError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SbieError>;

#[derive(Error, Debug)]
pub enum SbieError {
    #[error("Could not find Sandboxie.ini config (searched: {}). Is Sandboxie installed?", display_paths(.searched))]
    ConfigNotFound { searched: Vec<PathBuf> },

    #[error("Failed to access config file {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {}{}: {message}", .path.display(), display_line(.line))]
    ConfigParse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("Unexpected launcher output: token {index} ({token:?}) is not a process id")]
    OutputParse { token: String, index: usize },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Failure of a single launcher invocation.
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("Failed to execute {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {}: {}", .program.display(), display_code(.code), .stderr.trim())]
    ExitStatus {
        program: PathBuf,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl From<EntryError> for SbieError {
    fn from(e: EntryError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl SbieError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::Invocation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ConfigNotFound { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidate directories".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_line(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" (line {n})"),
        None => String::new(),
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_string(),
    }
}
