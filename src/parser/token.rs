//! Token model: kinds, keyword reclassification, display names.
//!
//! Keywords are lexed as identifiers and reclassified through
//! [`keyword_from_str`]; the reserved-word set is closed.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use text_size::TextRange;

/// A token produced by the lexer.
///
/// `text` borrows from the source buffer; `range` is the half-open byte
/// range the token occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub text: &'s str,
    pub range: TextRange,
}

/// Kinds of tokens in the KerML/SysML v2 textual notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // Literals
    // =========================================================================
    Integer,
    Real,
    String,
    Ident,
    /// Single-quoted name that may contain arbitrary characters.
    UnrestrictedName,

    // =========================================================================
    // Punctuation and operators
    // =========================================================================
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Semicolon,
    Colon,
    ColonColon,
    ColonGt,
    ColonColonGt,
    ColonGtGt,
    Comma,
    Dot,
    DotDot,
    DotDotDot,
    Eq,
    EqEq,
    EqEqEq,
    Bang,
    BangEq,
    BangEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Arrow,
    Tilde,
    Amp,
    Pipe,

    // =========================================================================
    // Keywords (closed reserved-word set)
    // =========================================================================
    AboutKw,
    AbstractKw,
    AcceptKw,
    ActionKw,
    ActorKw,
    AfterKw,
    AliasKw,
    AllKw,
    AllocateKw,
    AllocationKw,
    AnalysisKw,
    AndKw,
    AsKw,
    AssertKw,
    AssignKw,
    AssocKw,
    AssumeKw,
    AtKw,
    AttributeKw,
    BehaviorKw,
    BindKw,
    BindingKw,
    ByKw,
    CalcKw,
    CaseKw,
    ChainsKw,
    ClassKw,
    ClassifierKw,
    CommentKw,
    CompositeKw,
    ConcernKw,
    ConjugateKw,
    ConjugatesKw,
    ConjugationKw,
    ConnectKw,
    ConnectionKw,
    ConnectorKw,
    ConstKw,
    ConstantKw,
    ConstraintKw,
    CrossesKw,
    DatatypeKw,
    DecideKw,
    DefKw,
    DefaultKw,
    DefinedKw,
    DependencyKw,
    DerivedKw,
    DifferencesKw,
    DiffersKw,
    DisjoiningKw,
    DisjointKw,
    DoKw,
    DocKw,
    DoneKw,
    ElseKw,
    EndKw,
    EntryKw,
    EnumKw,
    EnumerationKw,
    EventKw,
    ExhibitKw,
    ExitKw,
    ExposeKw,
    ExprKw,
    FalseKw,
    FeatureKw,
    FeaturedKw,
    FeaturingKw,
    FilterKw,
    FirstKw,
    FlowKw,
    ForKw,
    ForkKw,
    FrameKw,
    FromKw,
    FunctionKw,
    HastypeKw,
    IfKw,
    ImpliesKw,
    ImportKw,
    InKw,
    IncludeKw,
    IndividualKw,
    InoutKw,
    InteractionKw,
    InterfaceKw,
    IntersectsKw,
    InvKw,
    InverseKw,
    InvertingKw,
    IstypeKw,
    ItemKw,
    JoinKw,
    LanguageKw,
    LibraryKw,
    LocaleKw,
    LoopKw,
    MemberKw,
    MergeKw,
    MessageKw,
    MetaKw,
    MetaclassKw,
    MetadataKw,
    MultiplicityKw,
    NamespaceKw,
    NewKw,
    NonuniqueKw,
    NotKw,
    NullKw,
    ObjectiveKw,
    OccurrenceKw,
    OfKw,
    OrKw,
    OrderedKw,
    OutKw,
    PackageKw,
    ParallelKw,
    PartKw,
    PerformKw,
    PortKw,
    PortionKw,
    PredicateKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReadonlyKw,
    RedefinesKw,
    RedefinitionKw,
    RefKw,
    ReferencesKw,
    RenderKw,
    RenderingKw,
    RepKw,
    RequireKw,
    RequirementKw,
    ReturnKw,
    SatisfyKw,
    SendKw,
    SnapshotKw,
    SpecializationKw,
    SpecializesKw,
    StakeholderKw,
    StandardKw,
    StartKw,
    StateKw,
    StepKw,
    StructKw,
    SubclassifierKw,
    SubjectKw,
    SubsetKw,
    SubsetsKw,
    SubtypeKw,
    SuccessionKw,
    TerminateKw,
    ThenKw,
    ThisKw,
    TimesliceKw,
    ToKw,
    TransitionKw,
    TrueKw,
    TypeKw,
    TypedKw,
    TypingKw,
    UnionsKw,
    UntilKw,
    UseKw,
    VarKw,
    VariantKw,
    VariationKw,
    VerificationKw,
    VerifyKw,
    ViaKw,
    ViewKw,
    ViewpointKw,
    WhenKw,
    WhileKw,
    XorKw,

    // =========================================================================
    // Control
    // =========================================================================
    Eof,
    Error,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        keyword_text(self).is_some()
    }

    /// Tokens that can serve as a declared name or name segment.
    pub fn is_name(self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::UnrestrictedName)
    }
}

/// The reserved-word table: source text to token kind.
///
/// Kept sorted by text so the table doubles as documentation of the
/// reserved set.
pub(crate) const KEYWORDS: &[(&str, TokenKind)] = &[
    ("about", TokenKind::AboutKw),
    ("abstract", TokenKind::AbstractKw),
    ("accept", TokenKind::AcceptKw),
    ("action", TokenKind::ActionKw),
    ("actor", TokenKind::ActorKw),
    ("after", TokenKind::AfterKw),
    ("alias", TokenKind::AliasKw),
    ("all", TokenKind::AllKw),
    ("allocate", TokenKind::AllocateKw),
    ("allocation", TokenKind::AllocationKw),
    ("analysis", TokenKind::AnalysisKw),
    ("and", TokenKind::AndKw),
    ("as", TokenKind::AsKw),
    ("assert", TokenKind::AssertKw),
    ("assign", TokenKind::AssignKw),
    ("assoc", TokenKind::AssocKw),
    ("assume", TokenKind::AssumeKw),
    ("at", TokenKind::AtKw),
    ("attribute", TokenKind::AttributeKw),
    ("behavior", TokenKind::BehaviorKw),
    ("bind", TokenKind::BindKw),
    ("binding", TokenKind::BindingKw),
    ("by", TokenKind::ByKw),
    ("calc", TokenKind::CalcKw),
    ("case", TokenKind::CaseKw),
    ("chains", TokenKind::ChainsKw),
    ("class", TokenKind::ClassKw),
    ("classifier", TokenKind::ClassifierKw),
    ("comment", TokenKind::CommentKw),
    ("composite", TokenKind::CompositeKw),
    ("concern", TokenKind::ConcernKw),
    ("conjugate", TokenKind::ConjugateKw),
    ("conjugates", TokenKind::ConjugatesKw),
    ("conjugation", TokenKind::ConjugationKw),
    ("connect", TokenKind::ConnectKw),
    ("connection", TokenKind::ConnectionKw),
    ("connector", TokenKind::ConnectorKw),
    ("const", TokenKind::ConstKw),
    ("constant", TokenKind::ConstantKw),
    ("constraint", TokenKind::ConstraintKw),
    ("crosses", TokenKind::CrossesKw),
    ("datatype", TokenKind::DatatypeKw),
    ("decide", TokenKind::DecideKw),
    ("def", TokenKind::DefKw),
    ("default", TokenKind::DefaultKw),
    ("defined", TokenKind::DefinedKw),
    ("dependency", TokenKind::DependencyKw),
    ("derived", TokenKind::DerivedKw),
    ("differences", TokenKind::DifferencesKw),
    ("differs", TokenKind::DiffersKw),
    ("disjoining", TokenKind::DisjoiningKw),
    ("disjoint", TokenKind::DisjointKw),
    ("do", TokenKind::DoKw),
    ("doc", TokenKind::DocKw),
    ("done", TokenKind::DoneKw),
    ("else", TokenKind::ElseKw),
    ("end", TokenKind::EndKw),
    ("entry", TokenKind::EntryKw),
    ("enum", TokenKind::EnumKw),
    ("enumeration", TokenKind::EnumerationKw),
    ("event", TokenKind::EventKw),
    ("exhibit", TokenKind::ExhibitKw),
    ("exit", TokenKind::ExitKw),
    ("expose", TokenKind::ExposeKw),
    ("expr", TokenKind::ExprKw),
    ("false", TokenKind::FalseKw),
    ("feature", TokenKind::FeatureKw),
    ("featured", TokenKind::FeaturedKw),
    ("featuring", TokenKind::FeaturingKw),
    ("filter", TokenKind::FilterKw),
    ("first", TokenKind::FirstKw),
    ("flow", TokenKind::FlowKw),
    ("for", TokenKind::ForKw),
    ("fork", TokenKind::ForkKw),
    ("frame", TokenKind::FrameKw),
    ("from", TokenKind::FromKw),
    ("function", TokenKind::FunctionKw),
    ("hastype", TokenKind::HastypeKw),
    ("if", TokenKind::IfKw),
    ("implies", TokenKind::ImpliesKw),
    ("import", TokenKind::ImportKw),
    ("in", TokenKind::InKw),
    ("include", TokenKind::IncludeKw),
    ("individual", TokenKind::IndividualKw),
    ("inout", TokenKind::InoutKw),
    ("interaction", TokenKind::InteractionKw),
    ("interface", TokenKind::InterfaceKw),
    ("intersects", TokenKind::IntersectsKw),
    ("inv", TokenKind::InvKw),
    ("inverse", TokenKind::InverseKw),
    ("inverting", TokenKind::InvertingKw),
    ("istype", TokenKind::IstypeKw),
    ("item", TokenKind::ItemKw),
    ("join", TokenKind::JoinKw),
    ("language", TokenKind::LanguageKw),
    ("library", TokenKind::LibraryKw),
    ("locale", TokenKind::LocaleKw),
    ("loop", TokenKind::LoopKw),
    ("member", TokenKind::MemberKw),
    ("merge", TokenKind::MergeKw),
    ("message", TokenKind::MessageKw),
    ("meta", TokenKind::MetaKw),
    ("metaclass", TokenKind::MetaclassKw),
    ("metadata", TokenKind::MetadataKw),
    ("multiplicity", TokenKind::MultiplicityKw),
    ("namespace", TokenKind::NamespaceKw),
    ("new", TokenKind::NewKw),
    ("nonunique", TokenKind::NonuniqueKw),
    ("not", TokenKind::NotKw),
    ("null", TokenKind::NullKw),
    ("objective", TokenKind::ObjectiveKw),
    ("occurrence", TokenKind::OccurrenceKw),
    ("of", TokenKind::OfKw),
    ("or", TokenKind::OrKw),
    ("ordered", TokenKind::OrderedKw),
    ("out", TokenKind::OutKw),
    ("package", TokenKind::PackageKw),
    ("parallel", TokenKind::ParallelKw),
    ("part", TokenKind::PartKw),
    ("perform", TokenKind::PerformKw),
    ("port", TokenKind::PortKw),
    ("portion", TokenKind::PortionKw),
    ("predicate", TokenKind::PredicateKw),
    ("private", TokenKind::PrivateKw),
    ("protected", TokenKind::ProtectedKw),
    ("public", TokenKind::PublicKw),
    ("readonly", TokenKind::ReadonlyKw),
    ("redefines", TokenKind::RedefinesKw),
    ("redefinition", TokenKind::RedefinitionKw),
    ("ref", TokenKind::RefKw),
    ("references", TokenKind::ReferencesKw),
    ("render", TokenKind::RenderKw),
    ("rendering", TokenKind::RenderingKw),
    ("rep", TokenKind::RepKw),
    ("require", TokenKind::RequireKw),
    ("requirement", TokenKind::RequirementKw),
    ("return", TokenKind::ReturnKw),
    ("satisfy", TokenKind::SatisfyKw),
    ("send", TokenKind::SendKw),
    ("snapshot", TokenKind::SnapshotKw),
    ("specialization", TokenKind::SpecializationKw),
    ("specializes", TokenKind::SpecializesKw),
    ("stakeholder", TokenKind::StakeholderKw),
    ("standard", TokenKind::StandardKw),
    ("start", TokenKind::StartKw),
    ("state", TokenKind::StateKw),
    ("step", TokenKind::StepKw),
    ("struct", TokenKind::StructKw),
    ("subclassifier", TokenKind::SubclassifierKw),
    ("subject", TokenKind::SubjectKw),
    ("subset", TokenKind::SubsetKw),
    ("subsets", TokenKind::SubsetsKw),
    ("subtype", TokenKind::SubtypeKw),
    ("succession", TokenKind::SuccessionKw),
    ("terminate", TokenKind::TerminateKw),
    ("then", TokenKind::ThenKw),
    ("this", TokenKind::ThisKw),
    ("timeslice", TokenKind::TimesliceKw),
    ("to", TokenKind::ToKw),
    ("transition", TokenKind::TransitionKw),
    ("true", TokenKind::TrueKw),
    ("type", TokenKind::TypeKw),
    ("typed", TokenKind::TypedKw),
    ("typing", TokenKind::TypingKw),
    ("unions", TokenKind::UnionsKw),
    ("until", TokenKind::UntilKw),
    ("use", TokenKind::UseKw),
    ("var", TokenKind::VarKw),
    ("variant", TokenKind::VariantKw),
    ("variation", TokenKind::VariationKw),
    ("verification", TokenKind::VerificationKw),
    ("verify", TokenKind::VerifyKw),
    ("via", TokenKind::ViaKw),
    ("view", TokenKind::ViewKw),
    ("viewpoint", TokenKind::ViewpointKw),
    ("when", TokenKind::WhenKw),
    ("while", TokenKind::WhileKw),
    ("xor", TokenKind::XorKw),
];

static KEYWORD_MAP: LazyLock<FxHashMap<&'static str, TokenKind>> =
    LazyLock::new(|| KEYWORDS.iter().copied().collect());

/// Reclassify an identifier as a keyword, if it is one.
pub fn keyword_from_str(ident: &str) -> Option<TokenKind> {
    KEYWORD_MAP.get(ident).copied()
}

/// The source text of a keyword kind.
pub fn keyword_text(kind: TokenKind) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|&&(_, k)| k == kind)
        .map(|&(text, _)| text)
}

/// A human-readable name for a token kind, used in error messages.
pub fn kind_to_name(kind: TokenKind) -> String {
    if let Some(text) = keyword_text(kind) {
        return format!("'{text}'");
    }
    let name = match kind {
        TokenKind::Integer => "integer literal",
        TokenKind::Real => "real literal",
        TokenKind::String => "string literal",
        TokenKind::Ident => "identifier",
        TokenKind::UnrestrictedName => "name",
        TokenKind::LBrace => "'{'",
        TokenKind::RBrace => "'}'",
        TokenKind::LBracket => "'['",
        TokenKind::RBracket => "']'",
        TokenKind::LParen => "'('",
        TokenKind::RParen => "')'",
        TokenKind::Semicolon => "';'",
        TokenKind::Colon => "':'",
        TokenKind::ColonColon => "'::'",
        TokenKind::ColonGt => "':>'",
        TokenKind::ColonColonGt => "'::>'",
        TokenKind::ColonGtGt => "':>>'",
        TokenKind::Comma => "','",
        TokenKind::Dot => "'.'",
        TokenKind::DotDot => "'..'",
        TokenKind::DotDotDot => "'...'",
        TokenKind::Eq => "'='",
        TokenKind::EqEq => "'=='",
        TokenKind::EqEqEq => "'==='",
        TokenKind::Bang => "'!'",
        TokenKind::BangEq => "'!='",
        TokenKind::BangEqEq => "'!=='",
        TokenKind::Lt => "'<'",
        TokenKind::LtEq => "'<='",
        TokenKind::Gt => "'>'",
        TokenKind::GtEq => "'>='",
        TokenKind::Plus => "'+'",
        TokenKind::Minus => "'-'",
        TokenKind::Star => "'*'",
        TokenKind::StarStar => "'**'",
        TokenKind::Slash => "'/'",
        TokenKind::Percent => "'%'",
        TokenKind::Arrow => "'->'",
        TokenKind::Tilde => "'~'",
        TokenKind::Amp => "'&'",
        TokenKind::Pipe => "'|'",
        TokenKind::Eof => "end of file",
        TokenKind::Error => "invalid token",
        _ => "token",
    };
    name.to_string()
}
