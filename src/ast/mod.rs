//! Typed AST for the KerML/SysML v2 front-end.
//!
//! Every node lives in the session arena; containers hold arena slices and
//! payloads are arena references, so the whole tree is released by dropping
//! (or resetting) the `Bump`. Each node's range encloses the ranges of all
//! its sub-nodes.

mod expr;

pub use expr::{BinaryOp, Expr, UnaryOp};

use std::fmt;

use text_size::TextRange;

use crate::base::Name;

/// Visibility of a member. Defaults to public when unwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

/// Direction of a feature, for parameters and ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    In,
    Out,
    Inout,
    #[default]
    None,
}

/// Prefix flags accepted before a declaration keyword, in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypePrefix {
    pub is_abstract: bool,
    pub is_readonly: bool,
    pub is_derived: bool,
    pub is_end: bool,
    pub is_composite: bool,
    pub is_portion: bool,
    pub is_ref: bool,
}

/// A declared name together with the range of its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier<'a> {
    pub name: Name<'a>,
    pub range: TextRange,
}

/// A `::`-separated name path. `is_global` is set when the name begins with
/// a leading `::`, anchoring resolution at the root scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedName<'a> {
    pub segments: &'a [Name<'a>],
    pub is_global: bool,
    pub range: TextRange,
}

impl<'a> QualifiedName<'a> {
    pub fn is_simple(&self) -> bool {
        !self.is_global && self.segments.len() == 1
    }

    pub fn first(&self) -> Option<Name<'a>> {
        self.segments.first().copied()
    }

    pub fn last(&self) -> Option<Name<'a>> {
        self.segments.last().copied()
    }
}

impl fmt::Display for QualifiedName<'_> {
    /// The canonical form: segments joined by `::`, with a leading `::`
    /// when the name is global.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global {
            write!(f, "::")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "::")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Kinds of directed relationship clauses on a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// `:` or `typed by`
    TypedBy,
    /// `:>` or `specializes`
    Specializes,
    /// `::>` or `subsets`
    Subsets,
    /// `:>>` or `redefines`
    Redefines,
    /// `references`
    References,
    /// `~`
    Conjugates,
}

/// One relationship edge; a clause with several comma-separated targets
/// produces one record per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relationship<'a> {
    pub kind: RelationshipKind,
    pub target: QualifiedName<'a>,
    pub range: TextRange,
}

/// A `[lower..upper]` bound with ordering flags.
///
/// Absent bounds mean unbounded (`*`). The `[n]` form stores the same
/// expression for both bounds; `[*]` stores neither.
#[derive(Debug, Clone, Copy)]
pub struct Multiplicity<'a> {
    pub lower: Option<&'a Expr<'a>>,
    pub upper: Option<&'a Expr<'a>>,
    pub is_ordered: bool,
    pub is_nonunique: bool,
    pub range: TextRange,
}

/// Root container and the payload of `namespace` declarations.
#[derive(Debug, Clone, Copy)]
pub struct Namespace<'a> {
    pub name: Option<Identifier<'a>>,
    pub members: &'a [Member<'a>],
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy)]
pub struct Package<'a> {
    pub name: Option<Identifier<'a>>,
    pub is_library: bool,
    pub members: &'a [Member<'a>],
    pub range: TextRange,
}

/// Sub-kinds of classifier declarations, including the SysML definition
/// forms (`part def`, `action def`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Type,
    Classifier,
    Class,
    DataType,
    Struct,
    Association,
    Behavior,
    Function,
    Predicate,
    PartDef,
    ActionDef,
    StateDef,
    RequirementDef,
    ConstraintDef,
    PortDef,
    AttributeDef,
    ItemDef,
}

impl ClassifierKind {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Classifier => "classifier",
            Self::Class => "class",
            Self::DataType => "datatype",
            Self::Struct => "struct",
            Self::Association => "association",
            Self::Behavior => "behavior",
            Self::Function => "function",
            Self::Predicate => "predicate",
            Self::PartDef => "part def",
            Self::ActionDef => "action def",
            Self::StateDef => "state def",
            Self::RequirementDef => "requirement def",
            Self::ConstraintDef => "constraint def",
            Self::PortDef => "port def",
            Self::AttributeDef => "attribute def",
            Self::ItemDef => "item def",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    pub kind: ClassifierKind,
    pub name: Option<Identifier<'a>>,
    pub prefix: TypePrefix,
    pub multiplicity: Option<&'a Multiplicity<'a>>,
    pub relationships: &'a [Relationship<'a>],
    /// `None` when the declaration ends with `;`.
    pub body: Option<&'a [Member<'a>]>,
    pub range: TextRange,
}

/// Sub-kinds of feature declarations, including the SysML usage forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Feature,
    Connector,
    Binding,
    Succession,
    Part,
    Action,
    State,
    Requirement,
    Constraint,
    Port,
    Attribute,
    Item,
}

impl FeatureKind {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Connector => "connector",
            Self::Binding => "binding",
            Self::Succession => "succession",
            Self::Part => "part",
            Self::Action => "action",
            Self::State => "state",
            Self::Requirement => "requirement",
            Self::Constraint => "constraint",
            Self::Port => "port",
            Self::Attribute => "attribute",
            Self::Item => "item",
        }
    }
}

/// The `= expr` or `default expr` initializer of a feature.
#[derive(Debug, Clone, Copy)]
pub struct FeatureValue<'a> {
    pub is_default: bool,
    pub expr: &'a Expr<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct Feature<'a> {
    pub kind: FeatureKind,
    pub name: Option<Identifier<'a>>,
    pub prefix: TypePrefix,
    pub direction: Direction,
    pub multiplicity: Option<&'a Multiplicity<'a>>,
    pub relationships: &'a [Relationship<'a>],
    pub value: Option<FeatureValue<'a>>,
    pub body: Option<&'a [Member<'a>]>,
    pub range: TextRange,
}

/// Wildcard suffix of an import target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportScope {
    /// `import A::B;`
    #[default]
    Single,
    /// `import A::*;`
    Wildcard,
    /// `import A::**;`
    Recursive,
}

#[derive(Debug, Clone, Copy)]
pub struct Import<'a> {
    pub target: QualifiedName<'a>,
    pub scope: ImportScope,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy)]
pub struct Alias<'a> {
    pub name: Identifier<'a>,
    pub target: QualifiedName<'a>,
    pub range: TextRange,
}

/// `comment` and `doc` annotation elements.
#[derive(Debug, Clone, Copy)]
pub struct CommentElement<'a> {
    pub name: Option<Identifier<'a>>,
    pub is_doc: bool,
    pub about: &'a [QualifiedName<'a>],
    pub locale: Option<&'a str>,
    /// Raw annotation text between the clauses and the terminator.
    pub body: Option<&'a str>,
    pub range: TextRange,
}

/// Payload of a member, one variant per declaration family.
#[derive(Debug, Clone, Copy)]
pub enum MemberKind<'a> {
    Namespace(&'a Namespace<'a>),
    Package(&'a Package<'a>),
    Classifier(&'a Classifier<'a>),
    Feature(&'a Feature<'a>),
    Import(&'a Import<'a>),
    Alias(&'a Alias<'a>),
    Comment(&'a CommentElement<'a>),
}

/// A member of a namespace, package, classifier, or feature body.
#[derive(Debug, Clone, Copy)]
pub struct Member<'a> {
    pub visibility: Visibility,
    pub kind: MemberKind<'a>,
    pub range: TextRange,
}

impl<'a> Member<'a> {
    /// The declared name, when the member has one.
    pub fn name(&self) -> Option<Identifier<'a>> {
        match self.kind {
            MemberKind::Namespace(n) => n.name,
            MemberKind::Package(p) => p.name,
            MemberKind::Classifier(c) => c.name,
            MemberKind::Feature(f) => f.name,
            MemberKind::Alias(a) => Some(a.name),
            MemberKind::Comment(c) => c.name,
            MemberKind::Import(_) => None,
        }
    }

    /// The body members, for the kinds that can own members.
    pub fn body(&self) -> Option<&'a [Member<'a>]> {
        match self.kind {
            MemberKind::Namespace(n) => Some(n.members),
            MemberKind::Package(p) => Some(p.members),
            MemberKind::Classifier(c) => c.body,
            MemberKind::Feature(f) => f.body,
            _ => None,
        }
    }

    /// Relationship clauses attached to the declaration.
    pub fn relationships(&self) -> &'a [Relationship<'a>] {
        match self.kind {
            MemberKind::Classifier(c) => c.relationships,
            MemberKind::Feature(f) => f.relationships,
            _ => &[],
        }
    }
}
