//! **section-prepper** composes sectioned shader sources into a single buffer for
//! third-party shader compilers, and maps the compilers' diagnostics back to the
//! authored files.
//!
//! Sources are split into named sections by `[Name]` header lines. A section can pull in
//! another section with `#include "path" [Name]`; the `self` path refers to the file being
//! expanded. Lines starting with `@` are annotations for other tooling and are dropped.
//! This crate does not implement a C preprocessor: everything else is copied through
//! untouched for the compiler to handle.
//!
//! After expansion every `auto_bind` placeholder outside of multi-line macros is replaced
//! with a sequential binding index, and an optional boilerplate header is prepended.
//!
//! Every composed line is covered by a [`CompositionRecord`], which the
//! [`ComposedResult`] uses to turn compiler error lines back into authored locations.
//!
//! # Example
//!
//! ```no_run
//! use section_prepper::{ComposerConfig, HeaderSource, RemapOptions};
//!
//! let config = ComposerConfig::default()
//!     .with_search_paths(["shaders/include"])
//!     .with_header(HeaderSource::glsl_450());
//!
//! let source = std::fs::read_to_string("shaders/lit.glsl").unwrap();
//! let composed = section_prepper::parse(&source, "Fragment", &config);
//!
//! if !composed.is_ok() {
//!     eprintln!("{}", composed.error_log);
//!     return;
//! }
//!
//! // ... hand `composed.text` to the compiler as `temp_shader.tempcode` ...
//! let compiler_output = String::new();
//!
//! let options = RemapOptions::new("temp_shader.tempcode");
//! println!("{}", composed.remap_diagnostics(&compiler_output, &options));
//! ```

mod bindings;
mod composition;
mod config;
mod diagnostics;
mod directive;
mod error;
mod expander;
mod header;
mod include_provider;
mod resolver;
mod section;

pub use bindings::*;
pub use composition::{ComposedResult, CompositionRecord, RecordKind, ResolvedLocation};
pub use config::*;
pub use diagnostics::{locate, remap};
pub use error::*;
pub use header::{HeaderSource, GLSL_450_HEADER};
pub use include_provider::*;
pub use resolver::IncludeResolver;
pub use section::{parse_sections, Section, SourceFile};

use std::sync::Arc;

use tracing::warn;

use expander::Expander;

/// Compose `source` starting at section `entry_point`, reading includes from disk.
///
/// Failures never panic or return early; they leave `text` empty and describe the
/// problem in `error_log`.
pub fn parse(source: &str, entry_point: &str, config: &ComposerConfig) -> ComposedResult {
    let mut provider =
        FileSystemIncludeProvider::new(config.search_paths.clone(), config.engine_dir.clone());
    parse_with_provider(source, entry_point, config, &mut provider)
}

/// Like [`parse`], with a custom `IncludeProvider`.
pub fn parse_with_provider(
    source: &str,
    entry_point: &str,
    config: &ComposerConfig,
    include_provider: &mut dyn IncludeProvider,
) -> ComposedResult {
    try_parse(source, entry_point, config, include_provider).unwrap_or_else(|err| {
        warn!(%err, "shader composition failed");
        ComposedResult::failed(format!("{}\n", err))
    })
}

/// Like [`parse_with_provider`], but failures are returned as a typed error.
#[tracing::instrument(skip_all, fields(entry_point = entry_point))]
pub fn try_parse(
    source: &str,
    entry_point: &str,
    config: &ComposerConfig,
    include_provider: &mut dyn IncludeProvider,
) -> Result<ComposedResult, PrepperError> {
    let main_file = Arc::new(SourceFile::parse("", source));
    let mut resolver = IncludeResolver::new(include_provider);

    let mut composition = {
        let mut expander = Expander::new(&mut resolver, config);
        expander.expand(&main_file, entry_point, 0)?;
        expander.into_composition()
    };

    allocate_bindings(&mut composition.lines, &config.placeholder_token);

    match &config.header {
        Some(HeaderSource::File(path)) => {
            let (resolved, text) = resolver.load_header(path)?;
            header::inject_header(&mut composition, &resolved, &text);
        }
        Some(HeaderSource::Inline { name, text }) => {
            header::inject_header(&mut composition, name, text);
        }
        None => {}
    }

    Ok(ComposedResult::new(
        composition,
        main_file,
        resolver.into_files(),
    ))
}
