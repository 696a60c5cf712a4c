use crate::BuildError;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Provides raw font program bytes by key. Sources are only ever read from; each build
/// loads what it needs and keeps its own copy for the lifetime of that build.
pub trait FontSource {
    fn load(&self, key: &str) -> Result<Vec<u8>, BuildError>;
}

/// Font programs held in memory, keyed by name
#[derive(Default, Clone)]
pub struct MemoryFontSource {
    fonts: HashMap<String, Vec<u8>>,
}

impl MemoryFontSource {
    pub fn new() -> MemoryFontSource {
        MemoryFontSource::default()
    }

    /// Add (or replace) the font program stored under `key`
    pub fn insert<K: ToString>(&mut self, key: K, bytes: Vec<u8>) {
        self.fonts.insert(key.to_string(), bytes);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fonts.contains_key(key)
    }
}

impl FontSource for MemoryFontSource {
    fn load(&self, key: &str) -> Result<Vec<u8>, BuildError> {
        self.fonts
            .get(key)
            .cloned()
            .ok_or_else(|| BuildError::font_unavailable(key, "no font stored under this key"))
    }
}

/// Font programs stored as files in a directory; keys are file names relative to it
#[derive(Debug, Clone)]
pub struct DirectoryFontSource {
    root: PathBuf,
}

impl DirectoryFontSource {
    pub fn new<P: AsRef<Path>>(root: P) -> DirectoryFontSource {
        DirectoryFontSource {
            root: root.as_ref().to_owned(),
        }
    }
}

impl FontSource for DirectoryFontSource {
    fn load(&self, key: &str) -> Result<Vec<u8>, BuildError> {
        let path = self.root.join(key);
        debug!(path = %path.display(), "reading font program");
        std::fs::read(&path).map_err(|err| BuildError::font_unavailable(key, err))
    }
}

impl<S: FontSource + ?Sized> FontSource for &S {
    fn load(&self, key: &str) -> Result<Vec<u8>, BuildError> {
        (**self).load(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_returns_copies() {
        let mut source = MemoryFontSource::new();
        source.insert("a.ttf", vec![1, 2, 3]);
        assert!(source.contains("a.ttf"));
        assert_eq!(source.load("a.ttf").expect("stored"), vec![1, 2, 3]);
        assert!(matches!(
            source.load("b.ttf"),
            Err(BuildError::FontUnavailable { .. })
        ));
    }

    #[test]
    fn directory_source_reads_files() {
        let source = DirectoryFontSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
        let bytes = source.load("DejaVuSans.ttf").expect("fixture exists");
        assert!(!bytes.is_empty());

        match source.load("missing.ttf") {
            Err(BuildError::FontUnavailable { key, .. }) => assert_eq!(key, "missing.ttf"),
            other => panic!("expected FontUnavailable, got {:?}", other.map(|b| b.len())),
        }
    }
}
