//! UnrealScript class export

use std::fs;
use std::path::{Path, PathBuf};

use super::{ExportError, ExportOptions};
use crate::object::{ClassData, Object};

/// Write the class script to `<dir>/<Name>.uc`
///
/// Classes whose script text was stripped get a bare declaration instead.
pub(super) fn export(
    object: &Object,
    class: &ClassData,
    dir: &Path,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let extension = options.format_or(object, &["uc"])?;
    let path = dir.join(format!("{}.{}", object.name, extension));

    let script = if class.script.trim().is_empty() {
        declaration(&object.name, class.super_class.as_deref())
    } else {
        class.script.clone()
    };

    fs::write(&path, script).map_err(ExportError::io(&path))?;
    Ok(path)
}

fn declaration(name: &str, super_class: Option<&str>) -> String {
    match super_class {
        Some(super_class) => format!("class {} extends {};\n", name, super_class),
        None => format!("class {};\n", name),
    }
}
