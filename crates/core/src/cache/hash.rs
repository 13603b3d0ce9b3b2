//! App-shell manifest fingerprints.

use sha2::{Digest, Sha256};

/// Fingerprint of an app-shell manifest.
///
/// Order-sensitive on purpose: the manifest is a fixed list and reordering it
/// is a change like any other.
pub fn manifest_fingerprint<S: AsRef<str>>(manifest: &[S]) -> String {
    let mut hasher = Sha256::new();
    for path in manifest {
        hasher.update(path.as_ref().as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_stability() {
        let a = manifest_fingerprint(&["/", "/static/style.css"]);
        let b = manifest_fingerprint(&["/", "/static/style.css"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_changes_with_manifest() {
        let a = manifest_fingerprint(&["/", "/static/style.css"]);
        let b = manifest_fingerprint(&["/", "/static/style.css", "/static/app.js"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_separates_entries() {
        let a = manifest_fingerprint(&["/ab", "/c"]);
        let b = manifest_fingerprint(&["/a", "b/c"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_format() {
        let hash = manifest_fingerprint(&["/"]);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
