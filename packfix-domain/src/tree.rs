use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;

/// Handle on the working-tree root.
///
/// The tree is owned by the caller; this type only reads it. Opening
/// verifies the root precondition (exists, is a directory); that
/// failure is fatal to the whole run and is never modeled as a finding.
#[derive(Debug, Clone)]
pub struct WorkTree {
    root: Utf8PathBuf,
}

impl WorkTree {
    pub fn open(root: impl Into<Utf8PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        let meta = fs::metadata(&root).with_context(|| format!("open work tree {}", root))?;
        anyhow::ensure!(meta.is_dir(), "work tree {} is not a directory", root);
        Ok(Self { root })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn abs(&self, rel: &Utf8Path) -> Utf8PathBuf {
        if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.root.join(rel)
        }
    }

    pub fn exists(&self, rel: impl AsRef<Utf8Path>) -> bool {
        self.abs(rel.as_ref()).exists()
    }

    pub fn read_to_string(&self, rel: &Utf8Path) -> anyhow::Result<String> {
        let abs = self.abs(rel);
        fs::read_to_string(&abs).with_context(|| format!("read {}", abs))
    }
}
