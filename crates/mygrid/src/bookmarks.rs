//! Single-character bookmarks for fast cursor navigation.
//!
//! Keys are `a-z` and `0-9`, case-folded, which bounds the table to 36
//! slots. Last write wins.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Default)]
pub struct Bookmarks {
    slots: BTreeMap<char, Bookmark>,
}

/// Valid bookmark keys are a single alphanumeric ASCII character.
pub fn valid_key(key: &str) -> Option<char> {
    let mut chars = key.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let folded = ch.to_ascii_lowercase();
    if folded.is_ascii_lowercase() || folded.is_ascii_digit() {
        Some(folded)
    } else {
        None
    }
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: char, x: i64, y: i64) -> bool {
        match valid_key(&key.to_string()) {
            Some(folded) => {
                self.slots.insert(folded, Bookmark { x, y });
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: char) -> Option<Bookmark> {
        let folded = valid_key(&key.to_string())?;
        self.slots.get(&folded).copied()
    }

    pub fn delete(&mut self, key: char) -> bool {
        match valid_key(&key.to_string()) {
            Some(folded) => self.slots.remove(&folded).is_some(),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All bookmarks in key order.
    pub fn list(&self) -> impl Iterator<Item = (char, Bookmark)> + '_ {
        self.slots.iter().map(|(&key, &bm)| (key, bm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_jump_last_write_wins() {
        let mut marks = Bookmarks::new();
        assert!(marks.set('a', 10, 20));
        assert!(marks.set('A', 30, 40));
        assert_eq!(marks.get('a'), Some(Bookmark { x: 30, y: 40 }));
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn invalid_keys_rejected() {
        let mut marks = Bookmarks::new();
        assert!(!marks.set('!', 0, 0));
        assert!(!marks.set('é', 0, 0));
        assert!(marks.set('7', -5, 5));
        assert_eq!(marks.get('7'), Some(Bookmark { x: -5, y: 5 }));
    }

    #[test]
    fn delete_and_clear() {
        let mut marks = Bookmarks::new();
        marks.set('a', 1, 1);
        marks.set('b', 2, 2);
        assert!(marks.delete('a'));
        assert!(!marks.delete('a'));
        marks.clear();
        assert!(marks.is_empty());
    }

    #[test]
    fn list_is_sorted_by_key() {
        let mut marks = Bookmarks::new();
        marks.set('z', 1, 1);
        marks.set('0', 2, 2);
        marks.set('m', 3, 3);
        let keys: Vec<char> = marks.list().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!['0', 'm', 'z']);
    }
}
