//! Symbols: named elements collected from the model.

use text_size::TextRange;

use crate::ast::Visibility;
use crate::base::{Name, is_valid_range};

use super::scope::ScopeId;

/// Index of a symbol in the table's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Namespace,
    Package,
    Type,
    Classifier,
    Feature,
    Alias,
}

impl SymbolKind {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Package => "package",
            Self::Type => "type",
            Self::Classifier => "classifier",
            Self::Feature => "feature",
            Self::Alias => "alias",
        }
    }
}

/// A named element. Built-ins carry the invalid range sentinel and no body
/// scope.
#[derive(Debug, Clone, Copy)]
pub struct Symbol<'a> {
    pub name: Name<'a>,
    pub kind: SymbolKind,
    pub visibility: Visibility,
    /// Range of the defining name token; invalid for built-ins.
    pub range: TextRange,
    /// The scope opened for this element's body, once pass 2 has visited it.
    pub body_scope: Option<ScopeId>,
}

impl Symbol<'_> {
    pub fn is_builtin(&self) -> bool {
        !is_valid_range(self.range)
    }
}
