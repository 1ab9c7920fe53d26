//! Reading and repairing `Contents.json`, the sidecar that tells the asset
//! catalog which image files belong to an imageset.

use anyhow::Result;
use anyhow::bail;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

pub const DESCRIPTOR_FILE: &str = "Contents.json";

const BOM: char = '\u{feff}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repair {
    /// `images` was absent or not an array.
    MissingImages,
    EmptyImages,
    /// `images[0]` was not an object.
    MalformedEntry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorChange {
    Unchanged,
    FilenameUpdated,
    ImagesRepaired(Repair),
}

impl DescriptorChange {
    pub fn is_changed(&self) -> bool {
        *self != DescriptorChange::Unchanged
    }
}

/// Parse descriptor text. Hand edited descriptors often carry a byte order
/// mark or trailing commas, so anything strict JSON rejects gets a second
/// chance through the json5 parser.
pub fn parse(text: &str) -> Result<Map<String, Value>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let doc: Value = match serde_json::from_str(text) {
        Ok(doc) => doc,
        Err(strict_err) => match json5::from_str(text) {
            Ok(doc) => doc,
            Err(_) => return Err(strict_err.into()),
        },
    };
    match doc {
        Value::Object(map) => Ok(map),
        _ => bail!("descriptor root is not an object"),
    }
}

fn image_entry(image_name: &str) -> Value {
    json!({
        "filename": image_name,
        "idiom": "universal",
        "scale": "1x",
    })
}

/// Make `images[0].filename` equal `image_name`, rebuilding the `images`
/// array if it is missing or malformed. Other keys are left alone.
pub fn point_at(doc: &mut Map<String, Value>, image_name: &str) -> DescriptorChange {
    let images = match doc.get_mut("images") {
        Some(Value::Array(images)) => images,
        _ => {
            doc.insert("images".to_string(), json!([image_entry(image_name)]));
            return DescriptorChange::ImagesRepaired(Repair::MissingImages);
        }
    };
    let Some(first) = images.first_mut() else {
        images.push(image_entry(image_name));
        return DescriptorChange::ImagesRepaired(Repair::EmptyImages);
    };
    let Value::Object(entry) = first else {
        *first = image_entry(image_name);
        return DescriptorChange::ImagesRepaired(Repair::MalformedEntry);
    };
    if entry.get("filename").and_then(Value::as_str) == Some(image_name) {
        return DescriptorChange::Unchanged;
    }
    entry.insert("filename".to_string(), Value::from(image_name));
    DescriptorChange::FilenameUpdated
}

/// The descriptor written for a folder that has none: a 1x entry for the
/// image and empty 2x/3x slots.
pub fn fresh(image_name: &str) -> Value {
    json!({
        "images": [
            image_entry(image_name),
            { "idiom": "universal", "scale": "2x" },
            { "idiom": "universal", "scale": "3x" },
        ],
        "info": {
            "author": "xcode",
            "version": 1,
        },
    })
}

pub fn render(doc: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}
