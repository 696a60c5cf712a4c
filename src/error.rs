use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    /// Writing the document stream failed. The build is aborted and no bytes are returned
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse a font program
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error("font `{key}` is unavailable: {reason}")]
    /// A font program could not be loaded from its source. Only fatal for the
    /// fallback font; other registry entries are skipped instead
    FontUnavailable { key: String, reason: String },

    #[error("invalid canvas: {0}")]
    /// Canvas dimensions must be finite and strictly positive
    InvalidCanvas(String),

    #[error("invalid text fragment: {0}")]
    /// Fragment geometry must be finite and non-negative
    InvalidFragment(String),

    #[error("invalid build options: {0}")]
    /// Rejected [BuildOptions](crate::BuildOptions) combination
    InvalidOptions(String),

    #[error("no object reference was generated for {0}")]
    /// Object bookkeeping went out of sync while writing the document
    MissingReference(String),
}

impl BuildError {
    pub(crate) fn font_unavailable<K: ToString, R: ToString>(key: K, reason: R) -> BuildError {
        BuildError::FontUnavailable {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}
