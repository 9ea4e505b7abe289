use derive_more::From;

use crate::color_ops::QueryParseError;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
    // -- Palettes
    InvalidReferenceColor { id: String, value: String },
    DuplicateEntryId { id: String },

    // -- Query
    #[from]
    Query(QueryParseError),

    // -- Externals
    #[from]
    Io(std::io::Error),
    #[from]
    Json(serde_json::Error),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidReferenceColor { id, value } => {
                write!(f, "entry {id}: invalid reference color {value:?}")
            }
            Error::DuplicateEntryId { id } => write!(f, "entry {id}: duplicate id in palette"),
            Error::Query(e) => write!(f, "invalid color: {e}"),
            Error::Io(e) => write!(f, "{e}"),
            Error::Json(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}
