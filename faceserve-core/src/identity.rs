//! Public identifier policy

use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::extract::FontDescriptor;

/// Compute the public identifier a font is served under.
///
/// The family section matching the font's full name decides whether the
/// identifier is obfuscated; with no matching section (or no config at all)
/// obfuscation is on. Pure given its inputs: the same configuration and
/// descriptor always yield the same identifier, across files, directories,
/// and process restarts.
pub fn compute_unique_id(config: &Config, descriptor: &FontDescriptor) -> String {
    let obfuscate = config
        .font_key_for(&descriptor.full_name)
        .map(|(_, family)| family.obfuscate_filenames)
        .unwrap_or(true);

    if obfuscate {
        obfuscated_id(&descriptor.family_name, &descriptor.subfamily_name)
    } else {
        descriptor.full_name.clone()
    }
}

/// Obfuscated identifier: lowercase-hex SHA-256 of `"<family> <subfamily>"`.
pub fn obfuscated_id(family_name: &str, subfamily_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(family_name.as_bytes());
    hasher.update(b" ");
    hasher.update(subfamily_name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Lowercase-hex SHA-256 of arbitrary bytes; used as the HTTP ETag for
/// served font binaries.
pub fn content_hash(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}
