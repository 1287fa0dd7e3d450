//! Case-insensitive FNV-1a hash for class name lookups

/// FNV-1a 32-bit offset basis
pub const FNV1A_OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a 32-bit prime
pub const FNV1A_PRIME: u32 = 0x0100_0193;

/// Hash a name the way the asset category table expects.
///
/// ASCII letters are folded to lowercase before hashing, so `"Texture"` and
/// `"TEXTURE"` produce the same value. Usable in const context so the
/// category table can be built at compile time.
///
/// # Example
///
/// ```
/// use lucc_core::name_hash;
///
/// assert_eq!(name_hash("LodMesh"), name_hash("lodmesh"));
/// ```
pub const fn name_hash(name: &str) -> u32 {
    let bytes = name.as_bytes();
    let mut hash = FNV1A_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i].to_ascii_lowercase() as u32;
        hash = hash.wrapping_mul(FNV1A_PRIME);
        i += 1;
    }
    hash
}
