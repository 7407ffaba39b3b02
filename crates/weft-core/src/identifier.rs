//! Stable keys backed by string interning.
//!
//! Every node and edge record is identified by a [`Key`] extracted through a
//! key accessor. Keys are compared and hashed on every redraw, so they are
//! interned once and then handled as plain copyable symbols.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for key storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<T>(f: impl FnOnce(&mut DefaultStringInterner) -> T) -> T {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Stable identity of a node or edge record.
///
/// # Examples
///
/// ```
/// use weft_core::identifier::Key;
///
/// let a = Key::new("server-a");
/// let b: Key = "server-a".into();
/// assert_eq!(a, b);
/// assert_eq!(a, "server-a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(DefaultSymbol);

impl Key {
    /// Creates a `Key` from its string form, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns the key with every character outside `[A-Za-z0-9_-]`
    /// replaced by `-`, suitable as part of a document element id.
    ///
    /// # Examples
    ///
    /// ```
    /// use weft_core::identifier::Key;
    ///
    /// assert_eq!(Key::new("a->b (1)").dom_safe(), "a--b--1-");
    /// ```
    pub fn dom_safe(&self) -> String {
        self.to_string()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_interner(|interner| {
            let value = interner
                .resolve(self.0)
                .expect("Symbol should exist in interner");
            write!(f, "{value}")
        })
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                == other
        })
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let k1 = Key::new("alpha");
        let k2 = Key::new("alpha");
        let k3 = Key::new("beta");

        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
        assert_eq!(k1, "alpha");
    }

    #[test]
    fn test_display_roundtrip() {
        let key = Key::new("edge/a:b");
        assert_eq!(key.to_string(), "edge/a:b");
    }

    #[test]
    fn test_dom_safe() {
        assert_eq!(Key::new("plain_key-1").dom_safe(), "plain_key-1");
        assert_eq!(Key::new("a.b c").dom_safe(), "a-b-c");
    }
}
