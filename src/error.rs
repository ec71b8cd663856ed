pub type BoxedIncludeProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum PrepperError {
    /// Any error reported by the `IncludeProvider` while resolving or reading a file
    #[error("include provider error: \"{cause}\" when trying to include {file:?}")]
    IncludeProviderError {
        file: String,
        cause: BoxedIncludeProviderError,
    },

    /// The file was read, but contains no sections at all
    #[error("failed to parse include file {file:?}: no sections found")]
    EmptyInclude { file: String },

    /// The file exists, but has no section with the requested name
    #[error("section [{section}] not found in {file:?}")]
    MissingSection { file: String, section: String },

    /// Include nesting went past the configured ceiling; usually a circular include
    #[error("include depth {depth} exceeded while expanding [{section}] of {file:?}; circular include?")]
    DepthExceeded {
        file: String,
        section: String,
        depth: usize,
    },

    /// Error parsing an include directive
    #[error("parse error: {file:?} ({line:?})")]
    ParseError { file: String, line: usize },

    /// The boilerplate header could not be loaded
    #[error("failed to load header {file:?}: \"{cause}\"")]
    HeaderError {
        file: String,
        cause: BoxedIncludeProviderError,
    },
}
