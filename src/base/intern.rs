//! String interner backed by the session arena.
//!
//! Interning a string copies it into the arena once and returns a [`Name`]
//! handle. Equal content always yields the same arena pointer, so `Name`
//! comparison and hashing work on pointer identity rather than content.

use std::fmt;
use std::hash::{Hash, Hasher};

use bumpalo::Bump;
use rustc_hash::FxHashSet;

/// An interned string handle.
///
/// `Name`s from the same [`Interner`] compare equal exactly when their
/// content is equal; the comparison itself is a pointer check.
#[derive(Clone, Copy)]
pub struct Name<'a>(&'a str);

impl<'a> Name<'a> {
    pub fn as_str(self) -> &'a str {
        self.0
    }
}

impl PartialEq for Name<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Name<'_> {}

impl Hash for Name<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0.as_ptr() as usize).hash(state);
        self.0.len().hash(state);
    }
}

impl fmt::Debug for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Content-addressed string interner for one compilation session.
///
/// Not shared between sessions; each session owns its arena and interner.
pub struct Interner<'a> {
    arena: &'a Bump,
    entries: FxHashSet<&'a str>,
}

impl<'a> Interner<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            arena,
            entries: FxHashSet::default(),
        }
    }

    /// Intern a string, returning a stable handle.
    ///
    /// The same content always returns the same handle for the life of the
    /// arena.
    pub fn intern(&mut self, text: &str) -> Name<'a> {
        if let Some(&existing) = self.entries.get(text) {
            return Name(existing);
        }
        let stored: &'a str = self.arena.alloc_str(text);
        self.entries.insert(stored);
        Name(stored)
    }

    /// Get an interned handle without creating one.
    pub fn get(&self, text: &str) -> Option<Name<'a>> {
        self.entries.get(text).map(|&s| Name(s))
    }

    /// Number of unique strings interned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
