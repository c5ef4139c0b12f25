//! Artifact store contract and the unpacked-directory implementation.

use crate::config::LoaderConfig;
use std::io;
use std::path::{Path, PathBuf};

/// Supplies raw descriptor bytes for a module package location.
pub trait ArtifactStore {
    fn descriptor_bytes(&self, location: &Path) -> io::Result<Vec<u8>>;
}

/// Reads `<location>/<descriptor_file_name>` from an unpacked module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryArtifactStore {
    descriptor_file_name: String,
}

impl DirectoryArtifactStore {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            descriptor_file_name: config.descriptor_file_name().to_string(),
        }
    }

    pub fn descriptor_path(&self, location: &Path) -> PathBuf {
        location.join(&self.descriptor_file_name)
    }
}

impl ArtifactStore for DirectoryArtifactStore {
    fn descriptor_bytes(&self, location: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.descriptor_path(location))
    }
}

#[cfg(test)]
mod tests {
    use super::{ArtifactStore, DirectoryArtifactStore};
    use crate::config::LoaderConfig;
    use std::io::ErrorKind;

    #[test]
    fn reads_descriptor_from_module_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("module.xml"), b"<module/>").expect("write descriptor");

        let config = LoaderConfig::new("module.xml", "1.0").expect("config");
        let store = DirectoryArtifactStore::new(&config);
        let bytes = store.descriptor_bytes(dir.path()).expect("descriptor bytes");
        assert_eq!(bytes, b"<module/>");
    }

    #[test]
    fn surfaces_missing_descriptor_as_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = DirectoryArtifactStore::new(&LoaderConfig::default());
        let err = store
            .descriptor_bytes(dir.path())
            .expect_err("missing descriptor must fail");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
