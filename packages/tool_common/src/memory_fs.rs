use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use anyhow::bail;

use crate::AssetFs;
use crate::DirItem;

#[derive(Clone, Debug, PartialEq)]
enum Node {
    Dir,
    File(String),
}

/// In-memory `AssetFs`. Paths are used verbatim as keys, so the tree is
/// case-sensitive. Writes or renames touching a path registered with
/// `deny` fail, which lets tests exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryFs {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    denied: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory and any missing ancestors.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.mkdir_all(path.as_ref());
        self
    }

    /// Create a file, creating its parent directories as needed.
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.mkdir_all(parent);
        }
        self.nodes
            .borrow_mut()
            .insert(path.to_path_buf(), Node::File(contents.to_string()));
        self
    }

    /// Make every mutation of `path` fail.
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.denied.borrow_mut().insert(path.as_ref().to_path_buf());
    }

    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.nodes.borrow().get(path.as_ref()) {
            Some(Node::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    /// Names of the direct children of `path`, sorted.
    pub fn list(&self, path: impl AsRef<Path>) -> Vec<String> {
        self.children(path.as_ref())
            .into_iter()
            .map(|item| item.name)
            .collect()
    }

    fn mkdir_all(&self, path: &Path) {
        let mut nodes = self.nodes.borrow_mut();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }

    fn children(&self, path: &Path) -> Vec<DirItem> {
        self.nodes
            .borrow()
            .iter()
            .filter(|(child, _)| child.parent() == Some(path))
            .filter_map(|(child, node)| {
                Some(DirItem {
                    name: child.file_name()?.to_string_lossy().into_owned(),
                    is_dir: *node == Node::Dir,
                })
            })
            .collect()
    }

    fn check_allowed(&self, path: &Path) -> Result<()> {
        if self.denied.borrow().contains(path) {
            bail!("permission denied: {}", path.display());
        }
        Ok(())
    }

    fn parent_is_dir(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.is_dir(parent),
            _ => true,
        }
    }
}

impl AssetFs for MemoryFs {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirItem>> {
        if !self.is_dir(path) {
            bail!("not a directory: {}", path.display());
        }
        let mut items = self.children(path);
        items.sort();
        Ok(items)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.borrow().get(path), Some(Node::Dir))
    }

    fn exists(&self, path: &Path) -> bool {
        self.nodes.borrow().contains_key(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.check_allowed(from)?;
        self.check_allowed(to)?;
        if !self.exists(from) {
            bail!("no such file or directory: {}", from.display());
        }
        if !self.parent_is_dir(to) {
            bail!("no such directory: {}", to.display());
        }
        if self.is_dir(to) {
            bail!("destination is a directory: {}", to.display());
        }
        let mut nodes = self.nodes.borrow_mut();
        let moved = nodes
            .keys()
            .filter(|path| path.starts_with(from))
            .cloned()
            .collect::<Vec<_>>();
        for old_path in moved {
            if let Some(node) = nodes.remove(&old_path) {
                let suffix = old_path.strip_prefix(from)?;
                let new_path = if suffix.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(suffix)
                };
                nodes.insert(new_path, node);
            }
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.check_allowed(path)?;
        let mut nodes = self.nodes.borrow_mut();
        match nodes.get(path) {
            Some(Node::File(_)) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir) => bail!("is a directory: {}", path.display()),
            None => bail!("no such file: {}", path.display()),
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.nodes.borrow().get(path) {
            Some(Node::File(contents)) => Ok(contents.clone()),
            Some(Node::Dir) => bail!("is a directory: {}", path.display()),
            None => bail!("no such file: {}", path.display()),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.check_allowed(path)?;
        if !self.parent_is_dir(path) {
            bail!("no such directory: {}", path.display());
        }
        if self.is_dir(path) {
            bail!("is a directory: {}", path.display());
        }
        self.nodes
            .borrow_mut()
            .insert(path.to_path_buf(), Node::File(contents.to_string()));
        Ok(())
    }

    fn same_file(&self, a: &Path, b: &Path) -> Result<bool> {
        for path in [a, b] {
            if !self.exists(path) {
                bail!("no such file or directory: {}", path.display());
            }
        }
        Ok(a == b)
    }
}
