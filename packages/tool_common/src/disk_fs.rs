use std::fs;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;

use crate::AssetFs;
use crate::DirItem;

/// `AssetFs` backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskFs;

impl AssetFs for DiskFs {
    fn read_dir(&self, path: &Path) -> Result<Vec<DirItem>> {
        let mut items = vec![];
        for entry in fs::read_dir(path).with_context(|| format!("listing {}", path.display()))? {
            let entry = entry?;
            items.push(DirItem {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        items.sort();
        Ok(items)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to)
            .with_context(|| format!("renaming {} to {}", from.display(), to.display()))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("removing {}", path.display()))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
    }

    fn same_file(&self, a: &Path, b: &Path) -> Result<bool> {
        let a = fs::canonicalize(a).with_context(|| format!("resolving {}", a.display()))?;
        let b = fs::canonicalize(b).with_context(|| format!("resolving {}", b.display()))?;
        Ok(a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_sorted_and_renames() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir(dir.path().join("b.imageset"))?;
        fs::write(dir.path().join("a.png"), b"png")?;

        let items = DiskFs.read_dir(dir.path())?;
        assert_eq!(
            items,
            vec![
                DirItem {
                    name: "a.png".to_string(),
                    is_dir: false
                },
                DirItem {
                    name: "b.imageset".to_string(),
                    is_dir: true
                },
            ]
        );

        let from = dir.path().join("a.png");
        let to = dir.path().join("b.imageset").join("c.png");
        DiskFs.rename(&from, &to)?;
        assert!(!DiskFs.exists(&from));
        assert_eq!(DiskFs.read_to_string(&to)?, "png");
        assert!(DiskFs.same_file(&to, &dir.path().join("b.imageset/../b.imageset/c.png"))?);
        Ok(())
    }

    #[test]
    fn missing_paths_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(DiskFs.read_dir(&missing).is_err());
        assert!(DiskFs.read_to_string(&missing).is_err());
        assert!(!DiskFs.is_dir(&missing));
    }
}
