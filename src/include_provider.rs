use std::path::{Path, PathBuf};

use crate::BoxedIncludeProviderError;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ResolvedIncludePath(pub String);

/// How a path is meant to be loaded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IncludeKind {
    /// Regular include; parsed into sections, looked up on the search paths
    Sectioned,

    /// Raw fragment, pasted in as a whole; looked up in the engine directory
    Fragment,

    /// Boilerplate prepended to the composed text; looked up in the engine directory
    Header,
}

/// Include reader used by the composer
pub trait IncludeProvider {
    fn resolve_path(
        &self,
        path: &str,
        kind: IncludeKind,
    ) -> Result<ResolvedIncludePath, BoxedIncludeProviderError>;

    fn get_include(
        &mut self,
        path: &ResolvedIncludePath,
    ) -> Result<String, BoxedIncludeProviderError>;
}

/// Reads includes from disk.
///
/// Absolute paths are opened directly. Relative sectioned includes are probed in each
/// search path in order, the first existing file winning. Fragments and headers are
/// always taken relative to `engine_dir`.
pub struct FileSystemIncludeProvider {
    search_paths: Vec<PathBuf>,
    engine_dir: PathBuf,
}

impl FileSystemIncludeProvider {
    pub fn new(search_paths: Vec<PathBuf>, engine_dir: PathBuf) -> Self {
        Self {
            search_paths,
            engine_dir,
        }
    }

    fn probe_search_paths(&self, path: &str) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
    }
}

impl IncludeProvider for FileSystemIncludeProvider {
    fn resolve_path(
        &self,
        path: &str,
        kind: IncludeKind,
    ) -> Result<ResolvedIncludePath, BoxedIncludeProviderError> {
        let resolved = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            match kind {
                IncludeKind::Sectioned => self
                    .probe_search_paths(path)
                    .ok_or_else(|| format!("{:?} not found in any include path", path))?,
                IncludeKind::Fragment | IncludeKind::Header => self.engine_dir.join(path),
            }
        };

        Ok(ResolvedIncludePath(resolved.to_string_lossy().into_owned()))
    }

    fn get_include(
        &mut self,
        path: &ResolvedIncludePath,
    ) -> Result<String, BoxedIncludeProviderError> {
        Ok(std::fs::read_to_string(&path.0)?)
    }
}
