//! Level export to T3D

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ExportError, ExportOptions};
use crate::object::{LevelData, Object};

/// Write the level as `<dir>/<Package>.t3d`
///
/// Levels are always stored as "MyLevel", so the file takes the package name.
pub(super) fn export(
    object: &Object,
    level: &LevelData,
    dir: &Path,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let extension = options.format_or(object, &["t3d"])?;
    let path = dir.join(format!("{}.{}", object.package, extension));

    fs::write(&path, to_t3d(level)).map_err(ExportError::io(&path))?;
    Ok(path)
}

fn to_t3d(level: &LevelData) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Begin Map");
    for actor in &level.actors {
        let _ = writeln!(text, "Begin Actor Class={} Name={}", actor.class, actor.name);
        for (key, value) in &actor.properties {
            let _ = writeln!(text, "    {}={}", key, value);
        }
        let _ = writeln!(text, "End Actor");
    }
    let _ = writeln!(text, "End Map");
    text
}
