//! Content-derived identity for board items.
//!
//! Interaction state must survive a full rebuild even when a record changes
//! position or group between snapshots, so identity is addressed by content
//! (title + content), not by index or DOM node. Two records with identical
//! title and content are the *same* logical item; that collision is accepted
//! and means both render with shared expand state.

const KEY_SEPARATOR: &str = "||";

/// Stable identity of one logical item across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(String);

impl ItemKey {
    /// Derives the key from a record's title and content.
    pub fn derive(title: &str, content: &str) -> Self {
        Self(format!("{}{}{}", title, KEY_SEPARATOR, content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_content_same_key() {
        assert_eq!(ItemKey::derive("t1", "c1"), ItemKey::derive("t1", "c1"));
    }

    #[test]
    fn key_ignores_group_and_position() {
        // The key has no group component at all; this is what lets an item
        // keep its state when the backend reclassifies it.
        let key = ItemKey::derive("t1", "c1");
        assert_eq!(key.as_str(), "t1||c1");
    }

    #[test]
    fn different_content_different_key() {
        assert_ne!(ItemKey::derive("t1", "c1"), ItemKey::derive("t1", "c2"));
        assert_ne!(ItemKey::derive("t1", "c1"), ItemKey::derive("t2", "c1"));
    }

    #[test]
    fn empty_fields_still_derive() {
        assert_eq!(ItemKey::derive("", "").as_str(), "||");
    }
}
