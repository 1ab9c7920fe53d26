use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use serde::Serialize;
use tracing::error;
use tracing::info;
use tracing::warn;

use tool_common::AssetFs;

use crate::descriptor;
use crate::descriptor::DESCRIPTOR_FILE;
use crate::descriptor::DescriptorChange;
use crate::naming::ImagesetName;
use crate::naming::is_png;

/// A change made to the asset tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Correction {
    FolderRenamed { from: String, to: String },
    ImageRenamed { folder: String, from: String, to: String },
    /// A stale file occupying the canonical image name was deleted.
    ConflictRemoved { folder: String, file: String },
    DescriptorCreated { folder: String },
    DescriptorUpdated { folder: String },
}

impl Correction {
    /// Conflict removals are part of an image rename and are not counted
    /// on their own.
    pub fn is_counted(&self) -> bool {
        !matches!(self, Correction::ConflictRemoved { .. })
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct NormalizeReport {
    /// Top level entries seen, files included.
    pub scanned: usize,
    pub corrections: Vec<Correction>,
    pub warnings: Vec<String>,
    /// Folders abandoned part way because an operation failed.
    pub errors: Vec<String>,
}

impl NormalizeReport {
    pub fn corrected_count(&self) -> usize {
        self.corrections.iter().filter(|c| c.is_counted()).count()
    }

    fn correct(&mut self, correction: Correction) {
        self.corrections.push(correction);
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }
}

/// Walk the imageset folders directly under `base` and bring their names,
/// image files and descriptors into the `npc<id>` convention.
///
/// Only a missing base directory is fatal. Anything going wrong inside a
/// folder is logged, recorded in the report, and the scan moves on.
pub fn normalize(fs: &dyn AssetFs, base: &Path) -> Result<NormalizeReport> {
    if !fs.is_dir(base) {
        bail!("{} is not a directory or does not exist", base.display());
    }
    info!("Scanning {}", base.display());
    let items = fs.read_dir(base)?;
    let mut report = NormalizeReport::default();
    for item in items {
        report.scanned += 1;
        if !item.is_dir {
            continue;
        }
        if let Err(e) = normalize_folder(fs, base, &item.name, &mut report) {
            let message = format!("{}: {e:#}", item.name);
            error!("{message}");
            report.errors.push(message);
        }
    }
    info!(
        "Finished {} items, {} corrections",
        report.scanned,
        report.corrected_count()
    );
    Ok(report)
}

fn normalize_folder(
    fs: &dyn AssetFs,
    base: &Path,
    folder: &str,
    report: &mut NormalizeReport,
) -> Result<()> {
    let Some(name) = ImagesetName::parse(folder) else {
        return Ok(());
    };
    let mut folder_name = folder.to_string();
    let mut folder_path = base.join(folder);

    if name.is_misnamed() {
        let target_name = name.folder_name();
        let target_path = base.join(&target_name);
        // a case-only rename on a case-insensitive filesystem sees itself
        if fs.exists(&target_path) && !fs.same_file(&folder_path, &target_path)? {
            report.warn(format!(
                "Target folder {target_name} already exists, skipping {folder}"
            ));
            return Ok(());
        }
        fs.rename(&folder_path, &target_path)?;
        info!("Renamed folder {folder} -> {target_name}");
        report.correct(Correction::FolderRenamed {
            from: folder.to_string(),
            to: target_name.clone(),
        });
        folder_name = target_name;
        folder_path = target_path;
    }

    let image_name = name.image_name();
    let items = fs.read_dir(&folder_path)?;
    let mut pngs = items.iter().filter(|item| !item.is_dir && is_png(&item.name));
    // an image already carrying the right name wins over the rest, then one
    // that only differs in case
    let found = pngs
        .clone()
        .find(|item| item.name == image_name)
        .or_else(|| {
            pngs.clone()
                .find(|item| item.name.eq_ignore_ascii_case(&image_name))
        })
        .or_else(|| pngs.next());
    let Some(found) = found else {
        report.warn(format!("No PNG file found in {folder_name}"));
        return Ok(());
    };
    if found.name != image_name {
        place_image(fs, &folder_path, &found.name, &image_name, report)?;
    }

    let descriptor_path = folder_path.join(DESCRIPTOR_FILE);
    if fs.exists(&descriptor_path) {
        let text = fs.read_to_string(&descriptor_path)?;
        let mut doc = descriptor::parse(&text)
            .with_context(|| format!("could not parse {DESCRIPTOR_FILE}"))?;
        let change = descriptor::point_at(&mut doc, &image_name);
        if let DescriptorChange::ImagesRepaired(repair) = change {
            report.warn(format!(
                "Unexpected images structure ({repair:?}) in {DESCRIPTOR_FILE} for {folder_name}, rebuilt first entry"
            ));
        }
        if change.is_changed() {
            fs.write(&descriptor_path, &descriptor::render(&doc)?)?;
            info!("In {folder_name}: updated {DESCRIPTOR_FILE} to reference {image_name}");
            report.correct(Correction::DescriptorUpdated {
                folder: folder_name,
            });
        }
    } else {
        report.warn(format!(
            "{DESCRIPTOR_FILE} not found in {folder_name}, creating it"
        ));
        let doc = descriptor::fresh(&image_name);
        fs.write(&descriptor_path, &descriptor::render(&doc)?)?;
        info!("In {folder_name}: created {DESCRIPTOR_FILE} referencing {image_name}");
        report.correct(Correction::DescriptorCreated {
            folder: folder_name,
        });
    }
    Ok(())
}

/// Rename `from` to `to` inside `folder`, deleting whatever other file is
/// already sitting at `to`.
fn place_image(
    fs: &dyn AssetFs,
    folder: &Path,
    from: &str,
    to: &str,
    report: &mut NormalizeReport,
) -> Result<()> {
    let folder_name = folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let old_path = folder.join(from);
    let new_path = folder.join(to);
    if fs.exists(&new_path) && !fs.same_file(&old_path, &new_path)? {
        report.warn(format!(
            "Target image {to} already exists in {folder_name}, deleting it before renaming {from}"
        ));
        fs.remove_file(&new_path)?;
        report.correct(Correction::ConflictRemoved {
            folder: folder_name.clone(),
            file: to.to_string(),
        });
    }
    fs.rename(&old_path, &new_path)?;
    info!("In {folder_name}: renamed image {from} -> {to}");
    report.correct(Correction::ImageRenamed {
        folder: folder_name,
        from: from.to_string(),
        to: to.to_string(),
    });
    Ok(())
}
