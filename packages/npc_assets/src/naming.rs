use once_cell::sync::Lazy;
use regex::Regex;

static IMAGESET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(npc|npv)(\d+)\.imageset$").expect("imageset pattern is valid")
});

/// A folder name of the form `npc<digits>.imageset` or `npv<digits>.imageset`,
/// in any letter case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagesetName {
    raw: String,
    id: String,
}

impl ImagesetName {
    pub fn parse(name: &str) -> Option<Self> {
        let captures = IMAGESET_PATTERN.captures(name)?;
        Some(Self {
            raw: name.to_string(),
            id: captures[2].to_string(),
        })
    }

    /// The digits, leading zeros kept.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// True unless the name is already exactly `npc<id>.imageset`. Covers the
    /// `npv` typo as well as stray capitals.
    pub fn is_misnamed(&self) -> bool {
        self.raw != self.folder_name()
    }

    pub fn folder_name(&self) -> String {
        format!("npc{}.imageset", self.id)
    }

    pub fn image_name(&self) -> String {
        format!("npc{}.png", self.id)
    }
}

pub fn is_png(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".png")
}
