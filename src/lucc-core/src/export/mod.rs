//! Per-kind object exporters
//!
//! [`export_object`] picks the exporter for a loaded object and writes the
//! result into an existing output directory:
//! - classes: UnrealScript source (`.uc`)
//! - textures: PNG
//! - sounds and music: the stored container format, byte for byte
//! - meshes: Unreal vertex mesh (`_d.3d` / `_a.3d`) or Wavefront OBJ
//! - levels: T3D scene text

mod audio;
mod class;
mod level;
mod mesh;
mod texture;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::object::{Object, ObjectData, ObjectKind};

pub use mesh::MeshFormat;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{kind} '{object}' cannot be exported as '{format}'")]
    UnsupportedFormat {
        object: String,
        kind: ObjectKind,
        format: String,
    },

    #[error("no exporter for {kind} '{object}'")]
    Unsupported { object: String, kind: ObjectKind },

    #[error("mesh '{object}' has no frame {frame} ({frames} frames)")]
    Frame {
        object: String,
        frame: usize,
        frames: usize,
    },

    #[error("invalid {kind} data in '{object}': {reason}")]
    InvalidData {
        object: String,
        kind: ObjectKind,
        reason: String,
    },
}

impl ExportError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> ExportError + '_ {
        move |source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Exporter settings shared by every object in a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Requested output format (file extension); `None` picks the default
    pub format: Option<String>,
    /// Mesh animation frame to export; `None` exports every frame where the
    /// format supports it, or frame 0 otherwise
    pub frame: Option<usize>,
}

impl ExportOptions {
    pub fn with_format(mut self, format: Option<String>) -> Self {
        self.format = format;
        self
    }

    pub fn with_frame(mut self, frame: Option<usize>) -> Self {
        self.frame = frame;
        self
    }

    /// Check a requested format against the formats an exporter can write
    fn format_or<'s>(
        &self,
        object: &Object,
        supported: &[&'s str],
    ) -> Result<&'s str, ExportError> {
        let Some(format) = self.format.as_deref() else {
            return Ok(supported[0]);
        };
        supported
            .iter()
            .copied()
            .find(|s| s.eq_ignore_ascii_case(format))
            .ok_or_else(|| ExportError::UnsupportedFormat {
                object: object.name.clone(),
                kind: object.kind(),
                format: format.to_string(),
            })
    }
}

/// Export an object into `dir`, returning the files written
pub fn export_object(
    object: &Object,
    dir: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    let written = match &object.data {
        ObjectData::Class(class) => vec![class::export(object, class, dir, options)?],
        ObjectData::Texture(texture) => vec![texture::export(object, texture, dir, options)?],
        ObjectData::Sound(sound) => {
            vec![audio::export(object, &sound.format, &sound.data, dir, options)?]
        }
        ObjectData::Music(music) => {
            vec![audio::export(object, &music.format, &music.data, dir, options)?]
        }
        ObjectData::Mesh(mesh) => mesh::export(object, mesh, dir, options)?,
        ObjectData::Level(level) => vec![level::export(object, level, dir, options)?],
        ObjectData::Other => {
            return Err(ExportError::Unsupported {
                object: object.name.clone(),
                kind: object.kind(),
            })
        }
    };

    for path in &written {
        debug!("Exported {}.{} to {}", object.package, object.name, path.display());
    }
    Ok(written)
}
