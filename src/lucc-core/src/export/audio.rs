//! Sound and music export
//!
//! Audio is stored in its original container (wav, ogg, tracker modules) and
//! written out unchanged; the extension comes from the stored format.

use std::fs;
use std::path::{Path, PathBuf};

use super::{ExportError, ExportOptions};
use crate::object::Object;

pub(super) fn export(
    object: &Object,
    stored_format: &str,
    data: &[u8],
    dir: &Path,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let stored_format = stored_format.to_ascii_lowercase();
    let extension = options.format_or(object, &[stored_format.as_str()])?;
    let path = dir.join(format!("{}.{}", object.name, extension));

    fs::write(&path, data).map_err(ExportError::io(&path))?;
    Ok(path)
}
