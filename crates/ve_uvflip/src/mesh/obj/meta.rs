use serde::Deserialize;
use std::{fmt, fs, path::Path, str::FromStr};

use super::FlipError;

/// How a flipped texture coordinate line is put back together
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Keep the first 12 characters, insert the new V value (7 characters at most)
    /// and append everything from character 19 on. Lines which do not fit these
    /// columns are mangled accordingly.
    #[default]
    Columns,
    /// Replace the V field and rejoin all fields with single spaces
    Fields,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_ref() {
            "columns" => Ok(Layout::Columns),
            "fields" => Ok(Layout::Fields),
            _ => Err(format!("Unknown layout: {}", value)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Columns => write!(f, "columns"),
            Layout::Fields => write!(f, "fields"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObjMeta {
    pub layout: Layout,
    pub atomic_write: bool,
}

impl Default for ObjMeta {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            atomic_write: true,
        }
    }
}

/// Settings given on the command line; they take precedence over meta files
#[derive(Debug, Default, Clone, Copy)]
pub struct MetaOverrides {
    pub layout: Option<Layout>,
    pub atomic_write: Option<bool>,
}

impl ObjMeta {
    pub fn parse(path: &Path) -> Result<Self, FlipError> {
        let data = fs::read(path).map_err(|err| FlipError::Read(path.into(), err))?;
        let meta: Self = toml::from_slice(&data).map_err(|err| FlipError::Meta(path.into(), err))?;
        Ok(meta)
    }

    pub fn with_overrides(self, overrides: &MetaOverrides) -> Self {
        Self {
            layout: overrides.layout.unwrap_or(self.layout),
            atomic_write: overrides.atomic_write.unwrap_or(self.atomic_write),
        }
    }
}
