//! Package collaborator interface
//!
//! Core abstraction over an opened package: its export table, name
//! resolution and object loading.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::object::{Object, ObjectKind};

/// Name returned for null references and reserved export slots
pub const NONE_NAME: &str = "None";

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("package '{name}' not found")]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse package dump {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("name index {0} out of range")]
    NameIndex(usize),

    #[error("object reference {0} out of range")]
    ObjectRef(i32),

    #[error("export index {0} out of range")]
    ExportIndex(usize),

    #[error("object '{0}' not found")]
    MissingObject(String),

    #[error("object '{object}' is a {actual}, expected a {expected}")]
    UnexpectedKind {
        object: String,
        expected: ObjectKind,
        actual: ObjectKind,
    },
}

/// Reference to an object in the export or import table
///
/// Zero is the null reference, positive values point at export `n - 1`
/// and negative values at import `-n - 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(pub i32);

impl ObjectRef {
    pub const NONE: ObjectRef = ObjectRef(0);

    pub fn export(index: usize) -> Self {
        ObjectRef(index as i32 + 1)
    }

    pub fn import(index: usize) -> Self {
        ObjectRef(-(index as i32) - 1)
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    pub fn export_index(self) -> Option<usize> {
        (self.0 > 0).then(|| (self.0 - 1) as usize)
    }

    pub fn import_index(self) -> Option<usize> {
        (self.0 < 0).then(|| (-self.0 - 1) as usize)
    }
}

/// One record of a package's export table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Index into the package name table
    pub object_name: usize,
    /// Class of the object; null when the export is itself a class
    #[serde(default)]
    pub class: ObjectRef,
    /// Group (outer) of the object; null when ungrouped
    #[serde(default)]
    pub group: ObjectRef,
}

/// An opened package
pub trait Package {
    /// Package name (without extension)
    fn name(&self) -> &str;

    /// The export table, in on-disk order
    fn exports(&self) -> &[ExportEntry];

    /// Resolve a name table index
    fn resolve_name(&self, index: usize) -> Result<&str, PackageError>;

    /// Resolve an object reference to the referenced object's name
    ///
    /// Null references resolve to [`NONE_NAME`].
    fn resolve_object_name(&self, reference: ObjectRef) -> Result<&str, PackageError>;

    /// Load the object stored in an export slot
    ///
    /// When `expected` is set, objects of any other kind are rejected.
    fn load_object(&self, index: usize, expected: Option<ObjectKind>)
        -> Result<Object, PackageError>;

    /// Resolve an export's class name ("None" when the export is a class)
    fn resolve_class_name(&self, reference: ObjectRef) -> Result<&str, PackageError> {
        self.resolve_object_name(reference)
    }

    /// Resolve an export's group name ("None" when ungrouped)
    fn resolve_group_name(&self, reference: ObjectRef) -> Result<&str, PackageError> {
        self.resolve_object_name(reference)
    }

    /// Resolve the object name of an export slot
    fn export_name(&self, index: usize) -> Result<&str, PackageError> {
        let entry = self
            .exports()
            .get(index)
            .ok_or(PackageError::ExportIndex(index))?;
        self.resolve_name(entry.object_name)
    }

    /// Find the first export with the given name (case-insensitive)
    fn find_export(&self, name: &str) -> Option<usize> {
        (0..self.exports().len()).find(|&index| {
            self.export_name(index)
                .map(|n| n.eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
    }
}

/// Opens packages by name
pub trait PackageLoader {
    fn open(&self, name: &str) -> Result<Box<dyn Package>, PackageError>;
}
