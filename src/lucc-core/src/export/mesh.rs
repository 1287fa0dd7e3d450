//! Mesh export
//!
//! Two formats:
//! - `u3d`: Unreal vertex mesh, a `_d.3d` triangle file plus an `_a.3d`
//!   animation file with packed 11/11/10 bit vertices per frame
//! - `obj`: Wavefront OBJ of a single animation frame

use byteorder::{WriteBytesExt, LE};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{ExportError, ExportOptions};
use crate::object::{MeshData, Object, ObjectKind};

/// Size of the `_d.3d` header in bytes
const DATA_HEADER_SIZE: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    U3d,
    Obj,
}

impl MeshFormat {
    pub const NAMES: [&'static str; 2] = ["u3d", "obj"];

    fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("obj") {
            MeshFormat::Obj
        } else {
            MeshFormat::U3d
        }
    }
}

pub(super) fn export(
    object: &Object,
    mesh: &MeshData,
    dir: &Path,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    let format = MeshFormat::from_name(options.format_or(object, &MeshFormat::NAMES)?);
    validate(object, mesh)?;

    if let Some(frame) = options.frame {
        if frame >= mesh.frames.len() {
            return Err(ExportError::Frame {
                object: object.name.clone(),
                frame,
                frames: mesh.frames.len(),
            });
        }
    }

    match format {
        MeshFormat::U3d => write_u3d(object, mesh, dir, options.frame),
        MeshFormat::Obj => write_obj(object, mesh, dir, options.frame.unwrap_or(0)).map(|p| vec![p]),
    }
}

fn invalid(object: &Object, reason: String) -> ExportError {
    ExportError::InvalidData {
        object: object.name.clone(),
        kind: ObjectKind::Mesh,
        reason,
    }
}

fn validate(object: &Object, mesh: &MeshData) -> Result<(), ExportError> {
    let vertex_count = mesh.vertex_count();
    if mesh.frames.is_empty() || vertex_count == 0 {
        return Err(invalid(object, "mesh has no vertices".to_string()));
    }
    // Header fields are u16: face count, vertex count, frame count and the
    // per-frame byte size of the packed vertices
    if vertex_count * 4 > u16::MAX as usize
        || mesh.faces.len() > u16::MAX as usize
        || mesh.frames.len() > u16::MAX as usize
    {
        return Err(invalid(
            object,
            format!(
                "{} vertices / {} faces / {} frames exceed the 3d format limits",
                vertex_count,
                mesh.faces.len(),
                mesh.frames.len()
            ),
        ));
    }
    if let Some((i, frame)) = mesh
        .frames
        .iter()
        .enumerate()
        .find(|(_, frame)| frame.len() != vertex_count)
    {
        return Err(invalid(
            object,
            format!("frame {} has {} vertices, expected {}", i, frame.len(), vertex_count),
        ));
    }
    if let Some(face) = mesh
        .faces
        .iter()
        .find(|face| face.vertices.iter().any(|&v| v as usize >= vertex_count))
    {
        return Err(invalid(
            object,
            format!("face {:?} references a missing vertex", face.vertices),
        ));
    }
    Ok(())
}

/// Pack a vertex position into the 11/11/10 bit `_a.3d` layout
fn pack_vertex([x, y, z]: [f32; 3]) -> u32 {
    let x = ((x * 8.0) as i32 & 0x7ff) as u32;
    let y = ((y * 8.0) as i32 & 0x7ff) as u32;
    let z = ((z * 4.0) as i32 & 0x3ff) as u32;
    x | (y << 11) | (z << 22)
}

fn write_u3d(
    object: &Object,
    mesh: &MeshData,
    dir: &Path,
    frame: Option<usize>,
) -> Result<Vec<PathBuf>, ExportError> {
    let data_path = dir.join(format!("{}_d.3d", object.name));
    let anim_path = dir.join(format!("{}_a.3d", object.name));
    let vertex_count = mesh.vertex_count();

    {
        let file = File::create(&data_path).map_err(ExportError::io(&data_path))?;
        let mut out = BufWriter::new(file);
        write_data_file(&mut out, mesh, vertex_count).map_err(ExportError::io(&data_path))?;
    }

    let frames: Vec<&Vec<[f32; 3]>> = match frame {
        Some(frame) => vec![&mesh.frames[frame]],
        None => mesh.frames.iter().collect(),
    };
    {
        let file = File::create(&anim_path).map_err(ExportError::io(&anim_path))?;
        let mut out = BufWriter::new(file);
        write_anim_file(&mut out, &frames, vertex_count).map_err(ExportError::io(&anim_path))?;
    }

    Ok(vec![data_path, anim_path])
}

fn write_data_file<W: Write>(out: &mut W, mesh: &MeshData, vertex_count: usize) -> std::io::Result<()> {
    out.write_u16::<LE>(mesh.faces.len() as u16)?;
    out.write_u16::<LE>(vertex_count as u16)?;
    // Remaining header fields are unused by the importer
    out.write_all(&[0u8; DATA_HEADER_SIZE - 4])?;

    for face in &mesh.faces {
        for &v in &face.vertices {
            out.write_u16::<LE>(v)?;
        }
        out.write_u8(0)?; // type
        out.write_u8(0)?; // color
        for uv in &face.uvs {
            out.write_all(uv)?;
        }
        out.write_u8(face.texture)?;
        out.write_u8(face.flags)?;
    }
    out.flush()
}

fn write_anim_file<W: Write>(
    out: &mut W,
    frames: &[&Vec<[f32; 3]>],
    vertex_count: usize,
) -> std::io::Result<()> {
    out.write_u16::<LE>(frames.len() as u16)?;
    out.write_u16::<LE>((vertex_count * 4) as u16)?;
    for frame in frames {
        for &vertex in frame.iter() {
            out.write_u32::<LE>(pack_vertex(vertex))?;
        }
    }
    out.flush()
}

fn write_obj(
    object: &Object,
    mesh: &MeshData,
    dir: &Path,
    frame: usize,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{}.obj", object.name));
    let mut text = String::new();

    let _ = writeln!(text, "# {}.{} frame {}", object.package, object.name, frame);
    let _ = writeln!(text, "o {}", object.name);
    for [x, y, z] in &mesh.frames[frame] {
        let _ = writeln!(text, "v {} {} {}", x, y, z);
    }
    for face in &mesh.faces {
        for [u, v] in &face.uvs {
            let _ = writeln!(
                text,
                "vt {} {}",
                *u as f32 / 255.0,
                1.0 - *v as f32 / 255.0
            );
        }
    }
    for (i, face) in mesh.faces.iter().enumerate() {
        let [a, b, c] = face.vertices;
        let t = i * 3;
        let _ = writeln!(
            text,
            "f {}/{} {}/{} {}/{}",
            a as usize + 1,
            t + 1,
            b as usize + 1,
            t + 2,
            c as usize + 1,
            t + 3
        );
    }

    fs::write(&path, text).map_err(ExportError::io(&path))?;
    Ok(path)
}
