use crate::registry::{ExtractorRegistry, LoaderRegistry};
use crate::traits::{Extractor, Loader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn default_output_directory() -> PathBuf {
    PathBuf::from("out")
}

/// Everything a resolution needs, composed once at startup and read-only afterwards.
pub struct Session {
    pub(crate) extractors: ExtractorRegistry,
    pub(crate) loaders: LoaderRegistry,
    pub(crate) output_directory: PathBuf,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    pub fn loaders(&self) -> &LoaderRegistry {
        &self.loaders
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }
}

pub struct SessionBuilder {
    extractors: ExtractorRegistry,
    loaders: LoaderRegistry,
    output_directory: PathBuf,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            extractors: ExtractorRegistry::new(),
            loaders: LoaderRegistry::new(),
            output_directory: default_output_directory(),
        }
    }
}

impl SessionBuilder {
    /// Appends an extractor. Earlier registrations take priority.
    pub fn extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractors.register(extractor);
        self
    }

    /// Appends a loader. Earlier registrations take priority.
    pub fn loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loaders.register(loader);
        self
    }

    pub fn output_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_directory = path.into();
        self
    }

    pub fn build(self) -> Session {
        Session {
            extractors: self.extractors,
            loaders: self.loaders,
            output_directory: self.output_directory,
        }
    }
}
