use std::path::PathBuf;
use thiserror::Error;

pub trait DataReader<T> {
    fn read_data(&self) -> Result<Vec<T>, ReadError>;
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to list files: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("No file matches {0}")]
    NoMatch(String),
    #[error("Unsupported file type: {0}")]
    UnknownFileType(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Csv,
    Tsv,
}

impl FileType {
    pub fn delimiter(&self) -> u8 {
        match self {
            FileType::Csv => b',',
            FileType::Tsv => b'\t',
        }
    }
}
