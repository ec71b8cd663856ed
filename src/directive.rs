use crate::section::is_annotation;
use crate::ComposerConfig;

/// What a single section line means to the expander.
#[derive(PartialEq, Eq, Debug)]
pub enum Directive<'a> {
    /// `@` / `@@` lines; meaningful to external tooling only
    Annotation,

    /// Engine marker line, dropped from the output
    EngineMarker,

    /// Marker for an engine-declared uniform block; it and the next `skip` lines are dropped
    OpaqueBlock { skip: usize },

    /// `#include "path" [Section]`
    Include(IncludeDirective<'a>),

    /// `#include` line without a quoted path
    MalformedInclude,

    /// Anything else, copied to the output as-is
    Verbatim,
}

#[derive(PartialEq, Eq, Debug)]
pub struct IncludeDirective<'a> {
    pub target: IncludeTarget<'a>,
    pub section: &'a str,
}

#[derive(PartialEq, Eq, Debug)]
pub enum IncludeTarget<'a> {
    /// Another section of the file being expanded
    CurrentFile,

    /// Declaration the compiler injects itself; expands to a blank line
    Noop,

    /// Raw fragment from the engine directory, pasted in whole
    Fragment(&'a str),

    /// Sectioned file looked up on the search paths
    File(&'a str),
}

const INCLUDE_KEYWORD: &str = "#include";

impl<'a> Directive<'a> {
    pub fn classify(line: &'a str, config: &ComposerConfig) -> Self {
        if is_annotation(line) {
            Directive::Annotation
        } else if line.starts_with(config.opaque_block_marker.as_str()) {
            Directive::OpaqueBlock {
                skip: config.opaque_block_len,
            }
        } else if config
            .engine_marker_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
        {
            Directive::EngineMarker
        } else if let Some(rest) = include_arguments(line) {
            match parse_include(rest, config) {
                Some(include) => Directive::Include(include),
                None => Directive::MalformedInclude,
            }
        } else {
            Directive::Verbatim
        }
    }
}

/// Text after the `#include` keyword, if the line is an include directive at all.
/// `#include_next` and other identifiers merely starting with the keyword are not.
fn include_arguments(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(INCLUDE_KEYWORD)?;
    match rest.chars().next() {
        None | Some('"') => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

fn parse_include<'a>(rest: &'a str, config: &ComposerConfig) -> Option<IncludeDirective<'a>> {
    let open = rest.find('"')?;
    let after_open = &rest[open + 1..];
    let close = after_open.find('"')?;
    let path = after_open[..close].trim();
    let tail = &after_open[close + 1..];

    let section = match (tail.find('['), tail.rfind(']')) {
        (Some(start), Some(end)) if start < end => tail[start + 1..end].trim(),
        _ => "",
    };

    if path.is_empty() {
        return None;
    }

    let target = if path.eq_ignore_ascii_case(&config.self_token) {
        IncludeTarget::CurrentFile
    } else if path == config.noop_token {
        IncludeTarget::Noop
    } else if path.ends_with(config.fragment_suffix.as_str()) {
        IncludeTarget::Fragment(path)
    } else {
        IncludeTarget::File(path)
    };

    Some(IncludeDirective { target, section })
}
