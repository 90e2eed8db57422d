mod flipper;
mod float_text;
mod meta;

use log::{debug, info, warn};
use std::{
    io,
    path::{Path, PathBuf},
};

use crate::utils;

pub use self::flipper::{flip_text, FlipReport, RecordError};
pub use self::meta::{Layout, MetaOverrides, ObjMeta};

#[derive(thiserror::Error, Debug)]
pub enum FlipError {
    #[error("Could not read file: {}", .0.display())]
    Read(PathBuf, #[source] io::Error),
    #[error("Could not write file: {}", .0.display())]
    Write(PathBuf, #[source] io::Error),
    #[error("Invalid meta file: {}", .0.display())]
    Meta(PathBuf, #[source] toml::de::Error),
    #[error("Path has no file name: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("Malformed texture coordinate on line {line}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },
}

/// Flips the texture coordinates of the model at `path` in place.
/// Nothing is written if reading or flipping fails.
pub fn flip(path: &Path, meta: &ObjMeta) -> Result<FlipReport, FlipError> {
    let text = utils::read_file(path).map_err(|err| FlipError::Read(path.into(), err))?;
    let (flipped, report) = flip_text(&text, meta.layout)?;

    utils::write_file(path, flipped.as_bytes(), meta.atomic_write)
        .map_err(|err| FlipError::Write(path.into(), err))?;

    Ok(report)
}

/// Parse meta from file called `file.toml` or alternativley from folder scoped meta file named `obj.toml` or else use default meta
pub fn parse_meta(path: &Path) -> Result<ObjMeta, FlipError> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let meta_file = utils::file_name(path).ok_or_else(|| FlipError::InvalidPath(path.into()))?;

    let candidates = [
        utils::combine_path(dir, meta_file, "toml"),
        utils::combine_path(dir, "obj", "toml"),
    ];

    for candidate in candidates.iter() {
        if candidate.is_file() {
            info!("Using meta file: `{}`", candidate.display());
            return ObjMeta::parse(candidate);
        }
    }

    Ok(ObjMeta::default())
}

pub fn process(path: &Path, overrides: &MetaOverrides) -> Result<FlipReport, FlipError> {
    info!("Processing Wavefront `.obj`-file: `{}`", path.display());
    let meta = parse_meta(path)?.with_overrides(overrides);
    debug!("Layout: {}, atomic write: {}", meta.layout, meta.atomic_write);
    let report = flip(path, &meta)?;

    if meta.layout == Layout::Columns && report.misaligned > 0 {
        warn!(
            "{} texture coordinates in `{}` don't fit the fixed columns and were rewritten column by column",
            report.misaligned,
            path.display()
        );
    }
    info!(
        "Flipped {} of {} lines in `{}`",
        report.flipped,
        report.lines,
        path.display()
    );

    Ok(report)
}
