use sha2::{Digest, Sha256};

/// Short content-addressed id for a config: the first 8 hex characters of the
/// sha-256 of the definition's name and id, matching the id width used across
/// the config authoring tables.
pub fn short_config_id(definition_name: &str, definition_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(definition_name.as_bytes());
    hasher.update(b"_");
    hasher.update(definition_id.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)[..8].to_string()
}
