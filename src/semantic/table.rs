//! The scoped symbol table.
//!
//! Symbols live in one `Vec` addressed by [`SymbolId`]; scopes form a tree
//! with a current-scope cursor that the analyzer drives as a stack. The
//! root scope holds the built-in types.

use text_size::TextRange;

use crate::ast::{QualifiedName, Visibility};
use crate::base::{Interner, Name, invalid_range};

use super::scope::{Scope, ScopeId, ScopeKind};
use super::symbol::{Symbol, SymbolId, SymbolKind};

/// The built-in type names registered at the root scope before any user
/// definitions are collected.
pub const BUILTIN_TYPES: &[&str] = &[
    "Base",
    "Anything",
    "Boolean",
    "String",
    "Integer",
    "Real",
    "Natural",
    "Positive",
    "UnlimitedNatural",
    "Occurrence",
    "Object",
    "Link",
    "Classifier",
    "Type",
    "Feature",
    "Class",
    "DataType",
    "Struct",
    "Association",
    "Behavior",
    "Function",
    "Predicate",
];

const ROOT: ScopeId = 0;

pub struct SymbolTable<'a> {
    symbols: Vec<Symbol<'a>>,
    scopes: Vec<Scope<'a>>,
    current: ScopeId,
}

impl<'a> SymbolTable<'a> {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: vec![Scope::new(ScopeKind::Root, None, None)],
            current: ROOT,
        }
    }

    /// Register every built-in type in the root scope: kind type, public,
    /// no defining node, invalid range.
    pub fn register_builtins(&mut self, interner: &mut Interner<'a>) {
        for builtin in BUILTIN_TYPES {
            let name = interner.intern(builtin);
            let _ = self.define(name, SymbolKind::Type, Visibility::Public, invalid_range());
        }
    }

    // =========================================================================
    // Scope stack
    // =========================================================================

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn scope(&self, id: ScopeId) -> &Scope<'a> {
        &self.scopes[id]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self, kind: ScopeKind, name: Option<Name<'a>>) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope::new(kind, name, Some(self.current)));
        self.current = id;
        id
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Scope ids from `from` up to and including the root.
    pub fn scope_chain(&self, from: ScopeId) -> Vec<ScopeId> {
        let mut chain = vec![from];
        let mut cursor = from;
        while let Some(parent) = self.scopes[cursor].parent {
            chain.push(parent);
            cursor = parent;
        }
        chain
    }

    // =========================================================================
    // Definition and lookup
    // =========================================================================

    /// Define `name` in the current scope. On a duplicate the existing
    /// symbol is preserved and returned as the error value.
    pub fn define(
        &mut self,
        name: Name<'a>,
        kind: SymbolKind,
        visibility: Visibility,
        range: TextRange,
    ) -> Result<SymbolId, SymbolId> {
        if let Some(existing) = self.scopes[self.current].local(name) {
            return Err(existing);
        }
        let id = SymbolId::new(self.symbols.len());
        self.symbols.push(Symbol {
            name,
            kind,
            visibility,
            range,
            body_scope: None,
        });
        self.scopes[self.current].symbols.insert(name, id);
        tracing::trace!(name = %name, ?kind, scope = self.current, "define symbol");
        Ok(id)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol<'a> {
        &self.symbols[id.index()]
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Record the scope opened for a symbol's body.
    pub fn set_body_scope(&mut self, id: SymbolId, scope: ScopeId) {
        self.symbols[id.index()].body_scope = Some(scope);
    }

    /// Look up in one scope, locals only.
    pub fn lookup_in(&self, scope: ScopeId, name: Name<'a>) -> Option<SymbolId> {
        self.scopes[scope].local(name)
    }

    /// Look up in the current scope, locals only.
    pub fn lookup_local(&self, name: Name<'a>) -> Option<SymbolId> {
        self.lookup_in(self.current, name)
    }

    /// Walk the scope chain from the current scope to the root.
    pub fn lookup(&self, name: Name<'a>) -> Option<SymbolId> {
        for scope in self.scope_chain(self.current) {
            if let Some(id) = self.scopes[scope].local(name) {
                return Some(id);
            }
        }
        None
    }

    /// Search enclosing scopes only (used for shadowing checks).
    pub fn lookup_enclosing(&self, name: Name<'a>) -> Option<SymbolId> {
        for scope in self.scope_chain(self.current).into_iter().skip(1) {
            if let Some(id) = self.scopes[scope].local(name) {
                return Some(id);
            }
        }
        None
    }

    /// Resolve a qualified name against the scope stack.
    ///
    /// The first segment resolves through the chain (or from the root for
    /// global names); later segments descend through recorded body scopes.
    /// When a deeper segment cannot be found (nested contents may not be
    /// collected yet) the resolution falls back to the first segment alone.
    pub fn resolve_qualified(&self, name: &QualifiedName<'a>) -> Option<SymbolId> {
        let first_segment = name.first()?;
        let first = if name.is_global {
            self.lookup_in(ROOT, first_segment)?
        } else {
            self.lookup(first_segment)?
        };

        let mut current = first;
        for &segment in &name.segments[1..] {
            let next = self
                .symbol(current)
                .body_scope
                .and_then(|scope| self.lookup_in(scope, segment));
            match next {
                Some(id) => current = id,
                None => return Some(first),
            }
        }
        Some(current)
    }
}

impl Default for SymbolTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn range(start: u32, end: u32) -> TextRange {
        use text_size::TextSize;
        TextRange::new(TextSize::new(start), TextSize::new(end))
    }

    #[test]
    fn builtins_live_in_the_root_scope() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);
        let mut table = SymbolTable::new();
        table.register_builtins(&mut interner);

        assert_eq!(table.symbol_count(), BUILTIN_TYPES.len());
        let integer = interner.intern("Integer");
        let id = table.lookup(integer).expect("Integer is registered");
        let symbol = table.symbol(id);
        assert!(symbol.is_builtin());
        assert_eq!(symbol.kind, SymbolKind::Type);
    }

    #[test]
    fn duplicate_definition_preserves_the_first() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);
        let mut table = SymbolTable::new();

        let name = interner.intern("A");
        let first = table
            .define(name, SymbolKind::Classifier, Visibility::Public, range(6, 7))
            .expect("first definition succeeds");
        let err = table
            .define(name, SymbolKind::Classifier, Visibility::Public, range(17, 18))
            .expect_err("second definition is rejected");
        assert_eq!(err, first);
        assert_eq!(table.symbol(table.lookup(name).unwrap()).range, range(6, 7));
    }

    #[test]
    fn lookup_walks_the_scope_chain() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);
        let mut table = SymbolTable::new();

        let outer = interner.intern("outer");
        table
            .define(outer, SymbolKind::Feature, Visibility::Public, range(0, 5))
            .unwrap();
        table.enter_scope(ScopeKind::Classifier, None);
        assert!(table.lookup_local(outer).is_none());
        assert!(table.lookup(outer).is_some());
        table.exit_scope();
    }

    #[test]
    fn sibling_scopes_are_isolated() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);
        let mut table = SymbolTable::new();
        let x = interner.intern("x");

        table.enter_scope(ScopeKind::Package, None);
        table
            .define(x, SymbolKind::Feature, Visibility::Public, range(0, 1))
            .unwrap();
        table.exit_scope();

        let sibling = table.enter_scope(ScopeKind::Package, None);
        assert!(table.lookup(x).is_none());
        assert!(table.scope(sibling).is_empty());
        table.exit_scope();
    }

    #[test]
    fn exit_scope_leaves_local_tables_untouched() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);
        let mut table = SymbolTable::new();
        let x = interner.intern("x");

        let before = table.scope(0).len();
        let child = table.enter_scope(ScopeKind::Classifier, None);
        table
            .define(x, SymbolKind::Feature, Visibility::Public, range(0, 1))
            .unwrap();
        table.exit_scope();

        assert_eq!(table.scope(0).len(), before);
        assert_eq!(table.scope(child).len(), 1);
        assert_eq!(table.current_scope(), 0);
    }

    #[test]
    fn qualified_resolution_descends_body_scopes() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);
        let mut table = SymbolTable::new();

        let pkg = interner.intern("P");
        let inner = interner.intern("x");
        let pkg_id = table
            .define(pkg, SymbolKind::Package, Visibility::Public, range(8, 9))
            .unwrap();
        let body = table.enter_scope(ScopeKind::Package, Some(pkg));
        table.set_body_scope(pkg_id, body);
        let inner_id = table
            .define(inner, SymbolKind::Feature, Visibility::Public, range(20, 21))
            .unwrap();
        table.exit_scope();

        let segments = [pkg, inner];
        let qualified = QualifiedName {
            segments: &segments,
            is_global: false,
            range: range(0, 4),
        };
        assert_eq!(table.resolve_qualified(&qualified), Some(inner_id));
    }

    #[test]
    fn qualified_resolution_falls_back_to_first_segment() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);
        let mut table = SymbolTable::new();

        let pkg = interner.intern("P");
        let missing = interner.intern("nope");
        let pkg_id = table
            .define(pkg, SymbolKind::Package, Visibility::Public, range(8, 9))
            .unwrap();

        let segments = [pkg, missing];
        let qualified = QualifiedName {
            segments: &segments,
            is_global: false,
            range: range(0, 4),
        };
        // No body scope recorded: the first segment alone decides.
        assert_eq!(table.resolve_qualified(&qualified), Some(pkg_id));
    }

    #[test]
    fn global_names_resolve_from_the_root_only() {
        let arena = Bump::new();
        let mut interner = Interner::new(&arena);
        let mut table = SymbolTable::new();

        let x = interner.intern("x");
        table.enter_scope(ScopeKind::Package, None);
        table
            .define(x, SymbolKind::Feature, Visibility::Public, range(0, 1))
            .unwrap();

        let segments = [x];
        let global = QualifiedName {
            segments: &segments,
            is_global: true,
            range: range(0, 3),
        };
        assert_eq!(table.resolve_qualified(&global), None);
        let local = QualifiedName {
            segments: &segments,
            is_global: false,
            range: range(0, 1),
        };
        assert!(table.resolve_qualified(&local).is_some());
    }
}
