use std::path::PathBuf;

use thiserror::Error;

pub type Result<A> = std::result::Result<A, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Encountered io error: `{0}`")]
    IOError(std::io::Error),
    #[error("Unable to access `{path:?}`: `{source}`")]
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Missing {kind} directory: `{path:?}`")]
    DirError { kind: &'static str, path: PathBuf },
    #[error("Page path escapes the output directory: `{0:?}`")]
    PathError(PathBuf),
    #[error("Error with templating: `{0}`")]
    JinjaError(minijinja::Error),
    #[error("Page `{page}` uses layout `{layout}` which was never compiled")]
    LayoutError { page: String, layout: String },
    #[error("Failed to convert content: `{0}`")]
    ConvertError(String),
    #[error("Failed to copy `{from:?}` to `{to:?}`: `{error}`")]
    CopyError {
        from: PathBuf,
        to: PathBuf,
        error: std::io::Error,
    },
    #[error("Error building search index: `{0}`")]
    IndexError(tantivy::TantivyError),
    #[error("Error parsing search query: `{0}`")]
    QueryError(tantivy::query::QueryParserError),
}

impl Error {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileError {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

impl From<minijinja::Error> for Error {
    fn from(value: minijinja::Error) -> Self {
        Self::JinjaError(value)
    }
}

impl From<tantivy::TantivyError> for Error {
    fn from(value: tantivy::TantivyError) -> Self {
        Self::IndexError(value)
    }
}

impl From<tantivy::query::QueryParserError> for Error {
    fn from(value: tantivy::query::QueryParserError) -> Self {
        Self::QueryError(value)
    }
}
