//! Identifier management using string interning
//!
//! Element identifiers (`n0`, `n0::n1`, `e12`) and namespace URIs are compared
//! and hashed constantly while a document is assembled. The [`Id`] type interns
//! them once so that comparisons are symbol comparisons.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// Interned identifier
///
/// # Examples
///
/// ```
/// use trellis_core::identifier::Id;
///
/// let node = Id::new("n0::n1");
/// assert_eq!(node, "n0::n1");
/// assert_eq!(node.to_mask(), "n0-3a--3a-n1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates an identifier for an element the source document left unnamed.
    pub fn from_anonymous(idx: usize) -> Self {
        Self::new(&format!("__{idx}"))
    }

    /// Returns an encoded form usable as an SVG/XML identifier prefix.
    ///
    /// ASCII letters and digits are kept, `-` is doubled, and every other
    /// character becomes `-<hex code point>-`. A mask that would start with
    /// a digit or `-` gets a leading `_`. The encoding is one-to-one and no
    /// mask contains `_` after its first character, so `mask + "_" + suffix`
    /// is unique for every pair as well.
    pub fn to_mask(self) -> String {
        let raw = self.to_string();
        let mut mask = String::with_capacity(raw.len() + 1);
        for c in raw.chars() {
            match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' => mask.push(c),
                '-' => mask.push_str("--"),
                _ => mask.push_str(&format!("-{:x}-", u32::from(c))),
            }
        }
        if mask.is_empty() || mask.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
            mask.insert(0, '_');
        }
        mask
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = with_interner(|interner| interner.resolve(self.0).map(str::to_owned));
        match value {
            Some(value) => f.write_str(&value),
            None => Err(fmt::Error),
        }
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.get(other)) == Some(self.0)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
