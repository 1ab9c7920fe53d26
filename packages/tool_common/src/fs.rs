use std::path::Path;

use anyhow::Result;

/// One entry of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirItem {
    pub name: String,
    pub is_dir: bool,
}

/// The filesystem operations the tools need. Listings come back sorted by
/// name so every scan visits entries in the same order.
pub trait AssetFs {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirItem>>;

    fn is_dir(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool;

    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// True if both paths resolve to the same file.
    fn same_file(&self, a: &Path, b: &Path) -> Result<bool>;
}
