//! Asset category routing for full package exports
//!
//! Every exported object whose class appears in [`ASSET_CATEGORIES`] lands in
//! that category's folder under the export root. Classes without an entry are
//! left out of full package exports.

use crate::hash::name_hash;

/// A class name and the folder its objects are exported into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetCategory {
    /// Class name as it appears in the export table ("None" for class exports)
    pub class_name: &'static str,
    /// [`name_hash`] of `class_name`
    pub hash: u32,
    /// Folder name under the export root
    pub folder: &'static str,
}

impl AssetCategory {
    pub const fn new(class_name: &'static str, folder: &'static str) -> Self {
        Self {
            class_name,
            hash: name_hash(class_name),
            folder,
        }
    }

    /// Check whether a resolved class name belongs to this category
    pub fn matches(&self, class_name: &str) -> bool {
        self.matches_hashed(name_hash(class_name), class_name)
    }

    /// [`matches`](Self::matches) with the class name already hashed
    fn matches_hashed(&self, hash: u32, class_name: &str) -> bool {
        self.hash == hash && self.class_name.eq_ignore_ascii_case(class_name)
    }
}

/// Default category table used by `fullpkgexport` and `levelexport -m`
pub static ASSET_CATEGORIES: [AssetCategory; 5] = [
    AssetCategory::new("None", "Classes"),
    AssetCategory::new("Texture", "Textures"),
    AssetCategory::new("Sound", "Sounds"),
    AssetCategory::new("Music", "Music"),
    AssetCategory::new("LodMesh", "Models"),
];

/// Find the category for a class name in a category table
pub fn category_for<'a>(
    table: &'a [AssetCategory],
    class_name: &str,
) -> Option<&'a AssetCategory> {
    let hash = name_hash(class_name);
    table
        .iter()
        .find(|category| category.matches_hashed(hash, class_name))
}
