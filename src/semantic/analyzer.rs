//! Two-pass semantic walk.
//!
//! Per scope: pass 1 collects every sibling definition, then pass 2 checks
//! relationship targets and recurses into bodies. Keeping the passes
//! strictly separate lets references see all siblings regardless of order.

use crate::ast::{
    ClassifierKind, Member, MemberKind, Namespace, QualifiedName, Relationship, RelationshipKind,
};
use crate::base::{Interner, Name};
use crate::diagnostics::{DiagCode, Diagnostic, DiagnosticContext};

use super::scope::ScopeKind;
use super::suggest;
use super::symbol::SymbolKind;
use super::table::SymbolTable;

/// Analyze a parsed model: populate the symbol table and emit semantic
/// diagnostics. Returns the table for downstream consumers.
pub fn analyze<'a>(
    root: &'a Namespace<'a>,
    interner: &mut Interner<'a>,
    diag: &mut DiagnosticContext,
) -> SymbolTable<'a> {
    let mut table = SymbolTable::new();
    table.register_builtins(interner);
    let mut analyzer = Analyzer { table, diag };
    analyzer.analyze_members(root.members);
    analyzer.finish()
}

/// The semantic walker. Owns the symbol table for the session and borrows
/// the shared diagnostic context.
pub struct Analyzer<'a, 'c> {
    table: SymbolTable<'a>,
    diag: &'c mut DiagnosticContext,
}

impl<'a, 'c> Analyzer<'a, 'c> {
    /// Run the remaining whole-model checks and hand back the table.
    fn finish(mut self) -> SymbolTable<'a> {
        self.check_specialization_cycles();
        self.check_type_compatibility();
        self.check_multiplicity_bounds();
        self.resolve_imports();
        self.table
    }

    /// Definition collection, then reference checking, for one member list.
    fn analyze_members(&mut self, members: &'a [Member<'a>]) {
        for member in members {
            if self.diag.should_stop() {
                return;
            }
            self.collect_definition(member);
        }
        for member in members {
            if self.diag.should_stop() {
                return;
            }
            self.check_member(member);
        }
    }

    // =========================================================================
    // Pass 1: definitions
    // =========================================================================

    fn collect_definition(&mut self, member: &Member<'a>) {
        let Some((identifier, kind)) = declared_symbol(member) else {
            return;
        };
        match self
            .table
            .define(identifier.name, kind, member.visibility, identifier.range)
        {
            Ok(_) => self.warn_if_shadowing(identifier.name, identifier.range),
            Err(prior) => {
                let prior_range = self.table.symbol(prior).range;
                self.diag.emit(
                    Diagnostic::error(
                        DiagCode::E3004,
                        identifier.range,
                        format!("duplicate definition of '{}'", identifier.name),
                    )
                    .with_note(
                        prior_range,
                        format!("previous definition of '{}' is here", identifier.name),
                    ),
                );
            }
        }
    }

    /// W10002 when a definition hides a user-defined name in an enclosing
    /// scope. Built-ins are exempt; models redefine them routinely.
    fn warn_if_shadowing(&mut self, name: Name<'a>, range: text_size::TextRange) {
        let Some(shadowed) = self.table.lookup_enclosing(name) else {
            return;
        };
        let shadowed = self.table.symbol(shadowed);
        if shadowed.is_builtin() {
            return;
        }
        self.diag.emit(
            Diagnostic::warning(
                DiagCode::W10002,
                range,
                format!("definition of '{name}' shadows an earlier definition"),
            )
            .with_note(shadowed.range, format!("shadowed definition of '{name}' is here")),
        );
    }

    // =========================================================================
    // Pass 2: references and recursion
    // =========================================================================

    fn check_member(&mut self, member: &Member<'a>) {
        for relationship in member.relationships() {
            self.check_relationship(relationship);
        }
        if let MemberKind::Alias(alias) = member.kind {
            if self.table.resolve_qualified(&alias.target).is_none() {
                self.emit_undefined(DiagCode::E3002, "reference", &alias.target);
            }
        }

        let Some(body) = member.body() else {
            return;
        };
        let symbol = member
            .name()
            .and_then(|identifier| self.table.lookup_local(identifier.name));
        let scope = self.table.enter_scope(
            scope_kind(member),
            member.name().map(|identifier| identifier.name),
        );
        if let Some(symbol) = symbol {
            self.table.set_body_scope(symbol, scope);
        }
        self.analyze_members(body);
        self.table.exit_scope();
    }

    fn check_relationship(&mut self, relationship: &Relationship<'a>) {
        if self.table.resolve_qualified(&relationship.target).is_some() {
            return;
        }
        let (code, what) = match relationship.kind {
            RelationshipKind::TypedBy => (DiagCode::E3001, "type"),
            RelationshipKind::Specializes => (DiagCode::E3001, "supertype"),
            RelationshipKind::Conjugates => (DiagCode::E3001, "type"),
            RelationshipKind::Subsets => (DiagCode::E3002, "subsetted feature"),
            RelationshipKind::Redefines => (DiagCode::E3002, "redefined feature"),
            RelationshipKind::References => (DiagCode::E3002, "reference"),
        };
        self.emit_undefined(code, what, &relationship.target);
    }

    fn emit_undefined(&mut self, code: DiagCode, what: &str, target: &QualifiedName<'a>) {
        let mut diagnostic = Diagnostic::error(
            code,
            target.range,
            format!("undefined {what} '{target}'"),
        );
        let last = target.last().map(|name| name.as_str()).unwrap_or_default();
        if let Some(similar) = suggest::find_similar(&self.table, last) {
            diagnostic = diagnostic.with_help(format!("did you mean '{similar}'?"));
        }
        self.diag.emit(diagnostic);
    }

    // =========================================================================
    // Whole-model checks
    // =========================================================================

    /// Cycle detection over specialization chains. Entry point reserved;
    /// performs no checks yet.
    fn check_specialization_cycles(&mut self) {}

    /// Typing-compatibility validation. Entry point reserved; performs no
    /// checks yet.
    fn check_type_compatibility(&mut self) {}

    /// Multiplicity-bound validation. Entry point reserved; performs no
    /// checks yet.
    fn check_multiplicity_bounds(&mut self) {}

    /// Cross-file import resolution. Entry point reserved; performs no
    /// checks yet.
    fn resolve_imports(&mut self) {}
}

/// The symbol a member declares, if any. Anonymous members and
/// non-declaration members (imports, comments) collect nothing.
fn declared_symbol<'a>(
    member: &Member<'a>,
) -> Option<(crate::ast::Identifier<'a>, SymbolKind)> {
    let kind = match member.kind {
        MemberKind::Namespace(_) => SymbolKind::Namespace,
        MemberKind::Package(_) => SymbolKind::Package,
        MemberKind::Classifier(classifier) if classifier.kind == ClassifierKind::Type => {
            SymbolKind::Type
        }
        MemberKind::Classifier(_) => SymbolKind::Classifier,
        MemberKind::Feature(_) => SymbolKind::Feature,
        MemberKind::Alias(_) => SymbolKind::Alias,
        MemberKind::Import(_) | MemberKind::Comment(_) => return None,
    };
    member.name().map(|identifier| (identifier, kind))
}

fn scope_kind(member: &Member<'_>) -> ScopeKind {
    match member.kind {
        MemberKind::Namespace(_) => ScopeKind::Namespace,
        MemberKind::Package(_) => ScopeKind::Package,
        MemberKind::Classifier(_) => ScopeKind::Classifier,
        _ => ScopeKind::Feature,
    }
}
