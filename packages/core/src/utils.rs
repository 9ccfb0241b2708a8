// ABOUTME: Shared utility functions for Folio
// ABOUTME: Prefixed identifier generation

/// Generate a prefixed unique identifier, e.g. `tag-V1StGXR8_Z5jdHi6B-myT`
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, nanoid::nanoid!())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id1 = generate_id("tag");
        let id2 = generate_id("tag");

        assert!(id1.starts_with("tag-"));
        assert_eq!(id1.len(), "tag-".len() + 21);
        assert_ne!(id1, id2);
    }
}
