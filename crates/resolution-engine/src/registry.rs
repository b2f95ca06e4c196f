use crate::traits::{Extractor, Loader};
use std::sync::Arc;

/// Ordered plugin list. Registration order is the only priority: lookups scan
/// front to back and the first compatible plugin wins.
pub struct Registry<P: ?Sized> {
    plugins: Vec<Arc<P>>,
}

pub type ExtractorRegistry = Registry<dyn Extractor>;
pub type LoaderRegistry = Registry<dyn Loader>;

impl<P: ?Sized> Registry<P> {
    pub fn new() -> Self {
        Self { plugins: vec![] }
    }

    pub(crate) fn register(&mut self, plugin: Arc<P>) {
        self.plugins.push(plugin);
    }

    pub fn find_compatible(&self, is_compatible: impl Fn(&P) -> bool) -> Option<&Arc<P>> {
        self.plugins.iter().find(|plugin| is_compatible(plugin))
    }

    pub fn iter_compatible<'a>(
        &'a self,
        is_compatible: impl Fn(&P) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Arc<P>> + 'a {
        self.plugins.iter().filter(move |plugin| is_compatible(plugin))
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl<P: ?Sized> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorRegistry {
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }
}

impl LoaderRegistry {
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }
}
