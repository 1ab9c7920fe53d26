/// Plumbing shared by the asset tools: a filesystem seam so the tools can
/// be run against an in-memory tree, and the logging bootstrap.
///
mod disk_fs;
mod fs;
pub mod logging;
#[cfg(any(test, feature = "testing"))]
mod memory_fs;

pub use disk_fs::DiskFs;
pub use fs::AssetFs;
pub use fs::DirItem;
#[cfg(any(test, feature = "testing"))]
pub use memory_fs::MemoryFs;
