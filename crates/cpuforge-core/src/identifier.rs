//! Identifiers for placed components and connections.
//!
//! Component and connection ids are compared constantly (pin coverage,
//! cascade deletion, graph traversal), so they are string-interned into a
//! [`Copy`] handle. Imported designs may carry arbitrary id text; freshly
//! placed elements get random base-36 ids via [`Id::random`].

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner. The
/// interner is append-only, so a poisoned lock is recovered.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Interned identifier of a component instance or a connection.
///
/// # Examples
///
/// ```
/// use cpuforge_core::identifier::Id;
///
/// let alu = Id::new("alu1");
/// assert_eq!(alu, "alu1");
///
/// let fresh = Id::random(9);
/// assert_eq!(fresh.to_string().len(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        let symbol = interner().get_or_intern(name);
        Self(symbol)
    }

    /// Creates an `Id` made of `len` random lowercase base-36 characters.
    ///
    /// Uniqueness is not guaranteed by this function alone; the diagram store
    /// retries until the id is unused.
    pub fn random(len: usize) -> Self {
        let mut rng = rand::rng();
        let name: String = (0..len)
            .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
            .collect();
        Self::new(&name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        f.write_str(interner.resolve(self.0).unwrap_or_default())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("alu1");
        let id2 = Id::new("alu1");
        let id3 = Id::new("reg1");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "alu1");
    }

    #[test]
    fn test_random_length_and_alphabet() {
        let id = Id::random(9);
        let text = id.to_string();

        assert_eq!(text.len(), 9);
        assert!(
            text.chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()),
            "unexpected character in {text}"
        );
    }

    #[test]
    fn test_random_ids_differ() {
        // 36^12 possibilities; a collision here means the generator is broken.
        assert_ne!(Id::random(12), Id::random(12));
    }

    #[test]
    fn test_interner_survives_poisoned_lock() {
        let poisoner = std::thread::spawn(|| {
            let _guard = interner();
            panic!("poison the interner lock");
        });
        assert!(poisoner.join().is_err());

        let id = Id::new("after_poison");
        assert_eq!(id.to_string(), "after_poison");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{}", id), "display_test");
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "conn1".into();
        assert_eq!(id1, Id::new("conn1"));
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("key1"), "value1");
        map.insert(Id::new("key2"), "value2");

        assert_eq!(map.get(&Id::new("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("ctrl1");

        assert!(id == "ctrl1");
        assert!(id != "ctrl");

        let empty = Id::new("");
        assert!(empty == "");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = Id::new("mem1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"mem1\"");

        let back: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
