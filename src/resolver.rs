use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::{IncludeKind, IncludeProvider, PrepperError, SourceFile};

/// Cache key for a requested include path. Lookups are case-insensitive.
fn normalize(path: &str) -> String {
    path.to_lowercase()
}

/// Run-scoped loader; every distinct path is read and parsed at most once.
pub struct IncludeResolver<'p> {
    provider: &'p mut dyn IncludeProvider,
    files: HashMap<String, Arc<SourceFile>>,
    fragments: HashMap<String, (String, Arc<str>)>,
}

impl<'p> IncludeResolver<'p> {
    pub fn new(provider: &'p mut dyn IncludeProvider) -> Self {
        Self {
            provider,
            files: HashMap::new(),
            fragments: HashMap::new(),
        }
    }

    fn load(&mut self, path: &str, kind: IncludeKind) -> Result<(String, String), PrepperError> {
        let provider_error = |cause| PrepperError::IncludeProviderError {
            file: path.to_string(),
            cause,
        };

        let resolved = self
            .provider
            .resolve_path(path, kind)
            .map_err(provider_error)?;
        let text = self
            .provider
            .get_include(&resolved)
            .map_err(provider_error)?;

        Ok((resolved.0, text))
    }

    /// Get a sectioned file, loading and parsing it on first use.
    pub fn resolve(&mut self, path: &str) -> Result<Arc<SourceFile>, PrepperError> {
        let key = normalize(path);
        if let Some(file) = self.files.get(&key) {
            debug!(path, "include cache hit");
            return Ok(file.clone());
        }

        let (resolved, text) = self.load(path, IncludeKind::Sectioned)?;
        let file = SourceFile::parse(resolved, &text);
        if file.is_empty() {
            return Err(PrepperError::EmptyInclude { file: file.path });
        }

        debug!(path, resolved = %file.path, sections = file.sections.len(), "loaded include");
        let file = Arc::new(file);
        self.files.insert(key, file.clone());
        Ok(file)
    }

    /// Get a raw fragment's resolved path and text.
    pub fn resolve_fragment(&mut self, path: &str) -> Result<(String, Arc<str>), PrepperError> {
        let key = normalize(path);
        if let Some(fragment) = self.fragments.get(&key) {
            return Ok(fragment.clone());
        }

        let (resolved, text) = self.load(path, IncludeKind::Fragment)?;
        debug!(path, resolved = %resolved, "loaded raw fragment");
        let fragment = (resolved, Arc::<str>::from(text));
        self.fragments.insert(key, fragment.clone());
        Ok(fragment)
    }

    /// Load the boilerplate header; not cached, it is read once per run.
    pub fn load_header(&mut self, path: &str) -> Result<(String, String), PrepperError> {
        self.load(path, IncludeKind::Header)
            .map_err(|err| match err {
                PrepperError::IncludeProviderError { file, cause } => {
                    PrepperError::HeaderError { file, cause }
                }
                other => other,
            })
    }

    /// Consume the resolver, keeping the parsed files keyed by their resolved path.
    pub fn into_files(self) -> HashMap<String, Arc<SourceFile>> {
        self.files
            .into_values()
            .map(|file| (file.path.clone(), file))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::HashMapIncludeProvider;

    #[test]
    fn case_insensitive_cache() {
        let mut provider = HashMapIncludeProvider::new(&[("Common.glsl", "[A]\nint a;\n")]);
        let mut resolver = IncludeResolver::new(&mut provider);

        let first = resolver.resolve("Common.glsl").unwrap();
        let second = resolver.resolve("COMMON.GLSL").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        drop(resolver);
        assert_eq!(provider.reads, 1);
    }

    #[test]
    fn missing_file() {
        let mut provider = HashMapIncludeProvider::new(&[]);
        let mut resolver = IncludeResolver::new(&mut provider);

        match resolver.resolve("nope.glsl") {
            Err(PrepperError::IncludeProviderError { file, .. }) => assert_eq!(file, "nope.glsl"),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn file_without_sections() {
        let mut provider = HashMapIncludeProvider::new(&[("blank.glsl", "")]);
        let mut resolver = IncludeResolver::new(&mut provider);

        assert!(matches!(
            resolver.resolve("blank.glsl"),
            Err(PrepperError::EmptyInclude { .. })
        ));
    }
}
