//! Texture export to PNG

use image::{ImageBuffer, Rgba};
use std::path::{Path, PathBuf};

use super::{ExportError, ExportOptions};
use crate::object::{Object, ObjectKind, TextureData};

pub(super) fn export(
    object: &Object,
    texture: &TextureData,
    dir: &Path,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let extension = options.format_or(object, &["png"])?;
    let path = dir.join(format!("{}.{}", object.name, extension));

    let expected = texture.width as usize * texture.height as usize * 4;
    if texture.rgba.len() != expected {
        return Err(ExportError::InvalidData {
            object: object.name.clone(),
            kind: ObjectKind::Texture,
            reason: format!(
                "{}x{} RGBA needs {} bytes, found {}",
                texture.width,
                texture.height,
                expected,
                texture.rgba.len()
            ),
        });
    }

    let img: ImageBuffer<Rgba<u8>, _> =
        ImageBuffer::from_raw(texture.width, texture.height, texture.rgba.clone()).ok_or_else(
            || ExportError::InvalidData {
                object: object.name.clone(),
                kind: ObjectKind::Texture,
                reason: "could not create image buffer".to_string(),
            },
        )?;

    img.save(&path).map_err(|source| ExportError::Image {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
