use tracing::debug;

use crate::composition::Composition;
use crate::directive::{Directive, IncludeDirective, IncludeTarget};
use crate::resolver::IncludeResolver;
use crate::{ComposerConfig, PrepperError, RecordKind, Section, SourceFile};

/// Recursively flattens sections into a [`Composition`], recording where every line came from.
pub(crate) struct Expander<'r, 'p> {
    resolver: &'r mut IncludeResolver<'p>,
    config: &'r ComposerConfig,
    composition: Composition,
}

impl<'r, 'p> Expander<'r, 'p> {
    pub fn new(resolver: &'r mut IncludeResolver<'p>, config: &'r ComposerConfig) -> Self {
        Self {
            resolver,
            config,
            composition: Composition::default(),
        }
    }

    pub fn into_composition(self) -> Composition {
        self.composition
    }

    /// Append the expansion of `section_name` from `file`.
    pub fn expand(
        &mut self,
        file: &SourceFile,
        section_name: &str,
        depth: usize,
    ) -> Result<(), PrepperError> {
        if depth > self.config.max_depth {
            return Err(PrepperError::DepthExceeded {
                file: file.path.clone(),
                section: section_name.to_string(),
                depth,
            });
        }

        let section = file
            .section(section_name)
            .ok_or_else(|| PrepperError::MissingSection {
                file: file.path.clone(),
                section: section_name.to_string(),
            })?;

        debug!(file = %file.path, section = section_name, depth, "expanding section");

        let mut skip = 0;
        for (line_no, line) in section.lines() {
            if skip > 0 {
                skip -= 1;
                continue;
            }

            let local_offset = line_no - section.line_start;

            match Directive::classify(line, self.config) {
                Directive::Annotation | Directive::EngineMarker => {}
                Directive::OpaqueBlock { skip: block_len } => skip = block_len,
                Directive::MalformedInclude => {
                    return Err(PrepperError::ParseError {
                        file: file.path.clone(),
                        line: line_no,
                    });
                }
                Directive::Include(include) => {
                    self.include(file, section, local_offset, include, depth)?
                }
                Directive::Verbatim => self.composition.push_line(
                    line,
                    &file.path,
                    &section.name,
                    local_offset,
                    RecordKind::Section,
                ),
            }
        }

        Ok(())
    }

    fn include(
        &mut self,
        file: &SourceFile,
        section: &Section,
        local_offset: usize,
        include: IncludeDirective<'_>,
        depth: usize,
    ) -> Result<(), PrepperError> {
        match include.target {
            IncludeTarget::CurrentFile => self.expand(file, include.section, depth + 1),
            IncludeTarget::File(path) => {
                let child = self.resolver.resolve(path)?;
                self.expand(&child, include.section, depth + 1)
            }
            IncludeTarget::Fragment(path) => {
                let (resolved, text) = self.resolver.resolve_fragment(path)?;
                for (idx, line) in text.lines().enumerate() {
                    self.composition
                        .push_line(line, &resolved, "", idx + 1, RecordKind::Raw);
                }
                Ok(())
            }
            IncludeTarget::Noop => {
                self.composition.push_line(
                    "",
                    &file.path,
                    &section.name,
                    local_offset,
                    RecordKind::Section,
                );
                Ok(())
            }
        }
    }
}
