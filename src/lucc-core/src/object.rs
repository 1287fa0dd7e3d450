//! Loaded objects and their payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Broad kind of a loaded object, used to pick an exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Class,
    Texture,
    Sound,
    Music,
    Mesh,
    Level,
    Other,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Class => "class",
            ObjectKind::Texture => "texture",
            ObjectKind::Sound => "sound",
            ObjectKind::Music => "music",
            ObjectKind::Mesh => "mesh",
            ObjectKind::Level => "level",
            ObjectKind::Other => "object",
        };
        f.write_str(name)
    }
}

/// An object materialised from a package export
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Name of the package the object was loaded from
    pub package: String,
    pub name: String,
    pub class_name: String,
    pub data: ObjectData,
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        self.data.kind()
    }
}

/// Decoded object payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectData {
    Class(ClassData),
    Texture(TextureData),
    Sound(SoundData),
    Music(MusicData),
    Mesh(MeshData),
    Level(LevelData),
    Other,
}

impl ObjectData {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectData::Class(_) => ObjectKind::Class,
            ObjectData::Texture(_) => ObjectKind::Texture,
            ObjectData::Sound(_) => ObjectKind::Sound,
            ObjectData::Music(_) => ObjectKind::Music,
            ObjectData::Mesh(_) => ObjectKind::Mesh,
            ObjectData::Level(_) => ObjectKind::Level,
            ObjectData::Other => ObjectKind::Other,
        }
    }
}

/// A class definition: script source plus declared properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassData {
    #[serde(default)]
    pub super_class: Option<String>,
    /// Whether the class derives from Actor
    #[serde(default)]
    pub is_actor: bool,
    #[serde(default)]
    pub script: String,
    /// Properties declared by this class (inherited ones are not listed)
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(flatten)]
    pub ty: PropertyType,
    /// Offset of the matching native field, if the engine declares one
    #[serde(default)]
    pub native_offset: Option<u32>,
    #[serde(default = "default_array_dim")]
    pub array_dim: u32,
}

fn default_array_dim() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyType {
    Byte,
    Int,
    Bool,
    Float,
    Object {
        class: String,
        #[serde(default)]
        is_actor: bool,
    },
    Name,
    String,
    Class,
    Array {
        inner: Box<PropertyType>,
    },
    Struct {
        name: String,
    },
    Vector,
    Rotator,
    Str,
    Map,
    FixedArray,
    Pointer,
}

/// Uncompressed 8-bit RGBA texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    #[serde(with = "base64_bytes")]
    pub rgba: Vec<u8>,
}

/// Sound stored in its original container format (usually wav)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundData {
    pub format: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Music stored in its original tracker or stream format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicData {
    pub format: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Vertex-animated mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Vertex positions per animation frame
    pub frames: Vec<Vec<[f32; 3]>>,
    pub faces: Vec<MeshFace>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.frames.first().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshFace {
    pub vertices: [u16; 3],
    #[serde(default)]
    pub uvs: [[u8; 2]; 3],
    #[serde(default)]
    pub texture: u8,
    #[serde(default)]
    pub flags: u8,
}

/// Level contents as a list of actors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub actors: Vec<ActorData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorData {
    pub class: String,
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_kind_tag() {
        let data: ObjectData =
            serde_json::from_str(r#"{"kind": "sound", "format": "wav", "data": "UklGRg=="}"#)
                .unwrap();
        assert_eq!(data.kind(), ObjectKind::Sound);
        match data {
            ObjectData::Sound(sound) => assert_eq!(sound.data, b"RIFF"),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let result: Result<ObjectData, _> =
            serde_json::from_str(r#"{"kind": "music", "format": "it", "data": "%%%"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_property_defaults() {
        let prop: PropertyDef =
            serde_json::from_str(r#"{"name": "Health", "type": "int"}"#).unwrap();
        assert_eq!(prop.ty, PropertyType::Int);
        assert_eq!(prop.array_dim, 1);
        assert_eq!(prop.native_offset, None);
    }

    #[test]
    fn test_nested_array_property() {
        let prop: PropertyDef = serde_json::from_str(
            r#"{"name": "Skins", "type": "array", "inner": {"type": "object", "class": "Texture"}}"#,
        )
        .unwrap();
        assert_eq!(
            prop.ty,
            PropertyType::Array {
                inner: Box::new(PropertyType::Object {
                    class: "Texture".to_string(),
                    is_actor: false,
                })
            }
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ObjectKind::Mesh.to_string(), "mesh");
        assert_eq!(ObjectKind::Other.to_string(), "object");
    }
}
