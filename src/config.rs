use std::path::PathBuf;

use crate::HeaderSource;

/// Settings for one composition run.
///
/// The defaults match the dialect understood by the stock engine headers;
/// builder methods override single fields.
#[derive(Clone, Debug)]
pub struct ComposerConfig {
    /// Directories probed in order for relative include paths
    pub search_paths: Vec<PathBuf>,

    /// Base directory for raw fragments and the header file
    pub engine_dir: PathBuf,

    /// Boilerplate prepended to the composed text, if any
    pub header: Option<HeaderSource>,

    /// Include paths ending in this suffix are pasted in raw, without section parsing
    pub fragment_suffix: String,

    /// Include path that refers to the file currently being expanded
    pub self_token: String,

    /// Include path that expands to a single blank line
    pub noop_token: String,

    /// Identifier replaced with sequential binding indices
    pub placeholder_token: String,

    /// Deepest include nesting allowed before giving up
    pub max_depth: usize,

    pub engine_marker_prefixes: Vec<String>,
    pub opaque_block_marker: String,
    pub opaque_block_len: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            engine_dir: PathBuf::new(),
            header: None,
            fragment_suffix: ".h".to_string(),
            self_token: "self".to_string(),
            noop_token: "noop".to_string(),
            placeholder_token: "auto_bind".to_string(),
            max_depth: 100,
            engine_marker_prefixes: vec!["#pragma engine".to_string()],
            opaque_block_marker: "#pragma engine_uniform_block".to_string(),
            opaque_block_len: 3,
        }
    }
}

impl ComposerConfig {
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_engine_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.engine_dir = dir.into();
        self
    }

    pub fn with_header(mut self, header: HeaderSource) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_placeholder_token(mut self, token: impl Into<String>) -> Self {
        self.placeholder_token = token.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Settings for rewriting compiler output.
#[derive(Clone, Debug)]
pub struct RemapOptions {
    /// Name under which the composed text was handed to the compiler
    pub synthetic_name: String,

    /// Subtracted from every reported line number before lookup.
    /// Depends on the compiler in use; 4 matches `glslangValidator` as invoked by the editor.
    pub line_correction: i64,
}

impl RemapOptions {
    pub fn new(synthetic_name: impl Into<String>) -> Self {
        Self {
            synthetic_name: synthetic_name.into(),
            line_correction: 4,
        }
    }

    pub fn with_line_correction(mut self, line_correction: i64) -> Self {
        self.line_correction = line_correction;
        self
    }
}
