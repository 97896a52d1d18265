//! Declaration grammar: members, bodies, clauses, names, multiplicities.

use text_size::{TextRange, TextSize};

use crate::ast::{
    Alias, Classifier, ClassifierKind, CommentElement, Direction, Feature, FeatureKind,
    FeatureValue, Identifier, Import, ImportScope, Member, MemberKind, Multiplicity, Namespace,
    Package, QualifiedName, Relationship, RelationshipKind, TypePrefix, Visibility,
};
use crate::diagnostics::DiagCode;

use super::super::parser::{Parser, SyncLevel};
use super::super::token::{TokenKind, kind_to_name};

impl<'s, 'a, 'c> Parser<'s, 'a, 'c> {
    /// Parse one member at the current position.
    ///
    /// Returns `None` when nothing usable could be built; the caller is
    /// responsible for synchronizing if panic mode was entered.
    pub fn parse_member(&mut self) -> Option<Member<'a>> {
        let start = self.current.range.start();
        let visibility = self.parse_visibility();
        let prefix = self.parse_type_prefix();
        let direction = self.parse_direction();

        let kind = match self.current.kind {
            TokenKind::NamespaceKw => self.parse_namespace_decl(start),
            TokenKind::LibraryKw => {
                self.advance();
                if self.at(TokenKind::PackageKw) {
                    self.parse_package_decl(start, true)
                } else {
                    self.error(
                        DiagCode::E2006,
                        self.current.range,
                        format!(
                            "expected 'package' after 'library', found {}",
                            kind_to_name(self.current.kind)
                        ),
                    );
                    return None;
                }
            }
            TokenKind::PackageKw => self.parse_package_decl(start, false),
            TokenKind::ImportKw => self.parse_import_decl(start),
            TokenKind::AliasKw => self.parse_alias_decl(start),
            TokenKind::CommentKw => self.parse_comment_decl(start, false),
            TokenKind::DocKw => self.parse_comment_decl(start, true),

            TokenKind::TypeKw => self.parse_classifier_kw(start, prefix, ClassifierKind::Type),
            TokenKind::ClassifierKw => {
                self.parse_classifier_kw(start, prefix, ClassifierKind::Classifier)
            }
            TokenKind::ClassKw => self.parse_classifier_kw(start, prefix, ClassifierKind::Class),
            TokenKind::DatatypeKw => {
                self.parse_classifier_kw(start, prefix, ClassifierKind::DataType)
            }
            TokenKind::StructKw => self.parse_classifier_kw(start, prefix, ClassifierKind::Struct),
            TokenKind::AssocKw => {
                self.parse_classifier_kw(start, prefix, ClassifierKind::Association)
            }
            TokenKind::BehaviorKw => {
                self.parse_classifier_kw(start, prefix, ClassifierKind::Behavior)
            }
            TokenKind::FunctionKw => {
                self.parse_classifier_kw(start, prefix, ClassifierKind::Function)
            }
            TokenKind::PredicateKw => {
                self.parse_classifier_kw(start, prefix, ClassifierKind::Predicate)
            }

            TokenKind::PartKw => {
                self.parse_def_or_usage(start, prefix, direction, ClassifierKind::PartDef, FeatureKind::Part)
            }
            TokenKind::ActionKw => self.parse_def_or_usage(
                start,
                prefix,
                direction,
                ClassifierKind::ActionDef,
                FeatureKind::Action,
            ),
            TokenKind::StateKw => self.parse_def_or_usage(
                start,
                prefix,
                direction,
                ClassifierKind::StateDef,
                FeatureKind::State,
            ),
            TokenKind::RequirementKw => self.parse_def_or_usage(
                start,
                prefix,
                direction,
                ClassifierKind::RequirementDef,
                FeatureKind::Requirement,
            ),
            TokenKind::ConstraintKw => self.parse_def_or_usage(
                start,
                prefix,
                direction,
                ClassifierKind::ConstraintDef,
                FeatureKind::Constraint,
            ),
            TokenKind::PortKw => self.parse_def_or_usage(
                start,
                prefix,
                direction,
                ClassifierKind::PortDef,
                FeatureKind::Port,
            ),
            TokenKind::AttributeKw => self.parse_def_or_usage(
                start,
                prefix,
                direction,
                ClassifierKind::AttributeDef,
                FeatureKind::Attribute,
            ),
            TokenKind::ItemKw => self.parse_def_or_usage(
                start,
                prefix,
                direction,
                ClassifierKind::ItemDef,
                FeatureKind::Item,
            ),

            TokenKind::FeatureKw => {
                self.advance();
                self.parse_feature_decl(start, prefix, direction, FeatureKind::Feature)
            }
            TokenKind::ConnectorKw => {
                self.advance();
                self.parse_feature_decl(start, prefix, direction, FeatureKind::Connector)
            }
            TokenKind::BindingKw => {
                self.advance();
                self.parse_feature_decl(start, prefix, direction, FeatureKind::Binding)
            }
            TokenKind::SuccessionKw => {
                self.advance();
                self.parse_feature_decl(start, prefix, direction, FeatureKind::Succession)
            }

            // A bare name (or a consumed direction) begins an anonymous
            // feature declaration with no leading keyword.
            kind if kind.is_name() => {
                self.parse_feature_decl(start, prefix, direction, FeatureKind::Feature)
            }
            _ if direction != Direction::None => {
                self.parse_feature_decl(start, prefix, direction, FeatureKind::Feature)
            }

            // The lexer already reported this token; skip it quietly.
            TokenKind::Error => {
                self.advance();
                return None;
            }
            kind => {
                self.error(
                    DiagCode::E2006,
                    self.current.range,
                    format!("unexpected {}", kind_to_name(kind)),
                );
                self.advance();
                return None;
            }
        }?;

        Some(Member {
            visibility,
            kind,
            range: TextRange::new(start, self.previous.range.end()),
        })
    }

    // =========================================================================
    // Prefixes
    // =========================================================================

    fn parse_visibility(&mut self) -> Visibility {
        if self.eat(TokenKind::PublicKw) {
            Visibility::Public
        } else if self.eat(TokenKind::PrivateKw) {
            Visibility::Private
        } else if self.eat(TokenKind::ProtectedKw) {
            Visibility::Protected
        } else {
            Visibility::default()
        }
    }

    /// Prefix flags may repeat and appear in any order.
    fn parse_type_prefix(&mut self) -> TypePrefix {
        let mut prefix = TypePrefix::default();
        loop {
            match self.current.kind {
                TokenKind::AbstractKw => prefix.is_abstract = true,
                TokenKind::ReadonlyKw => prefix.is_readonly = true,
                TokenKind::DerivedKw => prefix.is_derived = true,
                TokenKind::EndKw => prefix.is_end = true,
                TokenKind::CompositeKw => prefix.is_composite = true,
                TokenKind::PortionKw => prefix.is_portion = true,
                TokenKind::RefKw => prefix.is_ref = true,
                _ => return prefix,
            }
            self.advance();
        }
    }

    fn parse_direction(&mut self) -> Direction {
        if self.eat(TokenKind::InKw) {
            Direction::In
        } else if self.eat(TokenKind::OutKw) {
            Direction::Out
        } else if self.eat(TokenKind::InoutKw) {
            Direction::Inout
        } else {
            Direction::None
        }
    }

    // =========================================================================
    // Namespaces, packages, imports, aliases, comments
    // =========================================================================

    fn parse_namespace_decl(&mut self, start: TextSize) -> Option<MemberKind<'a>> {
        self.advance();
        let name = self.parse_optional_name();
        let members = self
            .parse_body(SyncLevel::Namespace)
            .unwrap_or_default();
        let range = TextRange::new(start, self.previous.range.end());
        Some(MemberKind::Namespace(self.alloc(Namespace {
            name,
            members,
            range,
        })))
    }

    fn parse_package_decl(&mut self, start: TextSize, is_library: bool) -> Option<MemberKind<'a>> {
        self.advance();
        let name = self.expect_name();
        let members = self
            .parse_body(SyncLevel::Namespace)
            .unwrap_or_default();
        let range = TextRange::new(start, self.previous.range.end());
        Some(MemberKind::Package(self.alloc(Package {
            name,
            is_library,
            members,
            range,
        })))
    }

    fn parse_import_decl(&mut self, start: TextSize) -> Option<MemberKind<'a>> {
        self.advance();
        let target = self.parse_qualified_name()?;
        let mut scope = ImportScope::Single;
        if self.eat(TokenKind::ColonColon) {
            if self.eat(TokenKind::Star) {
                scope = ImportScope::Wildcard;
            } else if self.eat(TokenKind::StarStar) {
                scope = ImportScope::Recursive;
            } else {
                self.error(
                    DiagCode::E2006,
                    self.current.range,
                    format!(
                        "expected '*' or '**' after '::' in import, found {}",
                        kind_to_name(self.current.kind)
                    ),
                );
            }
        }
        self.consume(TokenKind::Semicolon);
        let range = TextRange::new(start, self.previous.range.end());
        Some(MemberKind::Import(self.alloc(Import {
            target,
            scope,
            range,
        })))
    }

    fn parse_alias_decl(&mut self, start: TextSize) -> Option<MemberKind<'a>> {
        self.advance();
        let name = self.expect_name()?;
        if !self.eat(TokenKind::ForKw) {
            self.error(
                DiagCode::E2006,
                self.current.range,
                format!(
                    "expected 'for' in alias declaration, found {}",
                    kind_to_name(self.current.kind)
                ),
            );
            return None;
        }
        let target = self.parse_qualified_name()?;
        self.consume(TokenKind::Semicolon);
        let range = TextRange::new(start, self.previous.range.end());
        Some(MemberKind::Alias(self.alloc(Alias {
            name,
            target,
            range,
        })))
    }

    fn parse_comment_decl(&mut self, start: TextSize, is_doc: bool) -> Option<MemberKind<'a>> {
        self.advance();
        let name = self.parse_optional_name();

        let mut about = Vec::new();
        if self.eat(TokenKind::AboutKw) {
            loop {
                match self.parse_qualified_name() {
                    Some(target) => about.push(target),
                    None => break,
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        let locale = if self.eat(TokenKind::LocaleKw) {
            if self.at(TokenKind::String) {
                let token = self.current;
                self.advance();
                Some(self.intern_string_literal(token).as_str())
            } else {
                self.error(
                    DiagCode::E2006,
                    self.current.range,
                    format!(
                        "expected string literal after 'locale', found {}",
                        kind_to_name(self.current.kind)
                    ),
                );
                None
            }
        } else {
            None
        };

        // The annotation text runs to the terminator; anything in between,
        // trivia included, is the body.
        let body_from = self.previous.range.end();
        while !self.at(TokenKind::Semicolon)
            && !self.at(TokenKind::RBrace)
            && !self.at(TokenKind::Eof)
        {
            self.advance();
        }
        let body_to = self.current.range.start();
        let body = if body_to > body_from {
            let text = self.file.slice(TextRange::new(body_from, body_to)).trim();
            (!text.is_empty()).then(|| self.alloc_str(text))
        } else {
            None
        };
        self.eat(TokenKind::Semicolon);

        let range = TextRange::new(start, self.previous.range.end());
        let about = self.alloc_slice(about);
        Some(MemberKind::Comment(self.alloc(CommentElement {
            name,
            is_doc,
            about,
            locale,
            body,
            range,
        })))
    }

    // =========================================================================
    // Classifiers and features
    // =========================================================================

    /// `<kw> [def]` selects between the definition (classifier) and usage
    /// (feature) variants of the SysML declaration kinds.
    fn parse_def_or_usage(
        &mut self,
        start: TextSize,
        prefix: TypePrefix,
        direction: Direction,
        def_kind: ClassifierKind,
        usage_kind: FeatureKind,
    ) -> Option<MemberKind<'a>> {
        self.advance();
        if self.eat(TokenKind::DefKw) {
            self.parse_classifier_decl(start, prefix, def_kind)
        } else {
            self.parse_feature_decl(start, prefix, direction, usage_kind)
        }
    }

    fn parse_classifier_kw(
        &mut self,
        start: TextSize,
        prefix: TypePrefix,
        kind: ClassifierKind,
    ) -> Option<MemberKind<'a>> {
        self.advance();
        self.parse_classifier_decl(start, prefix, kind)
    }

    fn parse_classifier_decl(
        &mut self,
        start: TextSize,
        prefix: TypePrefix,
        kind: ClassifierKind,
    ) -> Option<MemberKind<'a>> {
        let name = self.parse_optional_name();
        let multiplicity = self.parse_optional_multiplicity();
        let relationships = self.parse_relationships();
        let body = self.parse_body(SyncLevel::Type);
        let range = TextRange::new(start, self.previous.range.end());
        Some(MemberKind::Classifier(self.alloc(Classifier {
            kind,
            name,
            prefix,
            multiplicity,
            relationships,
            body,
            range,
        })))
    }

    fn parse_feature_decl(
        &mut self,
        start: TextSize,
        prefix: TypePrefix,
        direction: Direction,
        kind: FeatureKind,
    ) -> Option<MemberKind<'a>> {
        let name = self.parse_optional_name();
        let multiplicity = self.parse_optional_multiplicity();
        let relationships = self.parse_relationships();

        let value = if self.eat(TokenKind::Eq) {
            Some(FeatureValue {
                is_default: false,
                expr: self.parse_expression(),
            })
        } else if self.eat(TokenKind::DefaultKw) {
            self.eat(TokenKind::Eq);
            Some(FeatureValue {
                is_default: true,
                expr: self.parse_expression(),
            })
        } else {
            None
        };

        let body = self.parse_body(SyncLevel::Feature);
        let range = TextRange::new(start, self.previous.range.end());
        Some(MemberKind::Feature(self.alloc(Feature {
            kind,
            name,
            prefix,
            direction,
            multiplicity,
            relationships,
            value,
            body,
            range,
        })))
    }

    // =========================================================================
    // Shared pieces
    // =========================================================================

    /// Body: `{ members }` or `;`. Returns `None` for the `;` form and on
    /// failure (E2001 with an inserted-`;` suggestion).
    pub(crate) fn parse_body(&mut self, level: SyncLevel) -> Option<&'a [Member<'a>]> {
        if self.eat(TokenKind::Semicolon) {
            return None;
        }
        if self.eat(TokenKind::LBrace) {
            let mut members = Vec::new();
            while !self.at(TokenKind::RBrace)
                && !self.at(TokenKind::Eof)
                && !self.diag.should_stop()
            {
                if let Some(member) = self.parse_member() {
                    members.push(member);
                }
                if self.panic_mode {
                    self.synchronize(level);
                }
            }
            self.consume(TokenKind::RBrace);
            return Some(self.alloc_slice(members));
        }
        self.consume(TokenKind::Semicolon);
        None
    }

    fn parse_optional_name(&mut self) -> Option<Identifier<'a>> {
        if self.current.kind.is_name() {
            let token = self.current;
            self.advance();
            Some(Identifier {
                name: self.intern_name(token),
                range: token.range,
            })
        } else {
            None
        }
    }

    fn expect_name(&mut self) -> Option<Identifier<'a>> {
        if let Some(name) = self.parse_optional_name() {
            return Some(name);
        }
        self.error(
            DiagCode::E2002,
            self.current.range,
            format!(
                "expected identifier, found {}",
                kind_to_name(self.current.kind)
            ),
        );
        None
    }

    /// Relationship clauses in any order and multiplicity. Each clause is a
    /// kind token followed by comma-separated qualified-name targets; every
    /// target becomes its own record.
    pub(crate) fn parse_relationships(&mut self) -> &'a [Relationship<'a>] {
        let mut relationships = Vec::new();
        loop {
            let kind = match self.current.kind {
                TokenKind::Colon => RelationshipKind::TypedBy,
                TokenKind::ColonGt | TokenKind::SpecializesKw => RelationshipKind::Specializes,
                TokenKind::ColonColonGt | TokenKind::SubsetsKw => RelationshipKind::Subsets,
                TokenKind::ColonGtGt | TokenKind::RedefinesKw => RelationshipKind::Redefines,
                TokenKind::ReferencesKw => RelationshipKind::References,
                TokenKind::Tilde => RelationshipKind::Conjugates,
                _ => break,
            };
            let clause_start = self.current.range.start();
            self.advance();
            loop {
                let Some(target) = self.parse_qualified_name() else {
                    return self.alloc_slice(relationships);
                };
                relationships.push(Relationship {
                    kind,
                    target,
                    range: TextRange::new(clause_start, target.range.end()),
                });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.alloc_slice(relationships)
    }

    /// `[ bounds ordered|nonunique* ]`. `[n]` desugars to `[n..n]` sharing
    /// the bound expression; `[*]` leaves both bounds absent.
    pub(crate) fn parse_optional_multiplicity(&mut self) -> Option<&'a Multiplicity<'a>> {
        if !self.at(TokenKind::LBracket) {
            return None;
        }
        let start = self.current.range.start();
        self.advance();

        let mut lower = None;
        let mut upper = None;
        if self.eat(TokenKind::Star) {
            // unbounded on both sides
        } else if !self.at(TokenKind::RBracket)
            && !self.at(TokenKind::OrderedKw)
            && !self.at(TokenKind::NonuniqueKw)
        {
            let low = self.parse_expression();
            if self.eat(TokenKind::DotDot) {
                if !self.eat(TokenKind::Star) {
                    upper = Some(self.parse_expression());
                }
            } else {
                upper = Some(low);
            }
            lower = Some(low);
        }

        let mut is_ordered = false;
        let mut is_nonunique = false;
        loop {
            if self.eat(TokenKind::OrderedKw) {
                is_ordered = true;
            } else if self.eat(TokenKind::NonuniqueKw) {
                is_nonunique = true;
            } else {
                break;
            }
        }
        self.consume(TokenKind::RBracket);

        let range = TextRange::new(start, self.previous.range.end());
        Some(self.alloc(Multiplicity {
            lower,
            upper,
            is_ordered,
            is_nonunique,
            range,
        }))
    }

    /// Qualified name: optional leading `::` (global), then `::`-separated
    /// segments. A trailing `::` (as in `pkg::*`) is left for the caller.
    pub(crate) fn parse_qualified_name(&mut self) -> Option<QualifiedName<'a>> {
        let start = self.current.range.start();
        let is_global = if self.at(TokenKind::ColonColon) {
            self.advance();
            true
        } else {
            false
        };

        let mut segments = Vec::new();
        if self.current.kind.is_name() {
            let token = self.current;
            self.advance();
            segments.push(self.intern_name(token));
        } else {
            self.error(
                DiagCode::E2002,
                self.current.range,
                format!(
                    "expected identifier, found {}",
                    kind_to_name(self.current.kind)
                ),
            );
            return None;
        }

        while self.at(TokenKind::ColonColon) && self.peek_kind().is_name() {
            self.advance();
            let token = self.current;
            self.advance();
            segments.push(self.intern_name(token));
        }

        let range = TextRange::new(start, self.previous.range.end());
        let segments = self.alloc_slice(segments);
        Some(QualifiedName {
            segments,
            is_global,
            range,
        })
    }
}
