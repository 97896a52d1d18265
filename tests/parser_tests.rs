//! Parser integration tests: declaration shapes, recovery, expressions.

use bumpalo::Bump;
use kermlc::ast::{
    BinaryOp, ClassifierKind, Expr, FeatureKind, ImportScope, Member, MemberKind,
    RelationshipKind, Visibility,
};
use kermlc::{DiagCode, DiagnosticContext, Interner, Namespace, SourceFile};
use rstest::rstest;

fn parse_source(source: &str, f: impl FnOnce(&Namespace<'_>, &DiagnosticContext)) {
    let file = SourceFile::new("test.kerml", source);
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut diag = DiagnosticContext::new();
    let root = kermlc::parse(&file, &arena, &mut interner, &mut diag);
    f(root, &diag);
}

fn feature_of<'a>(member: &Member<'a>) -> &'a kermlc::ast::Feature<'a> {
    match member.kind {
        MemberKind::Feature(feature) => feature,
        other => panic!("expected a feature member, got {other:?}"),
    }
}

fn classifier_of<'a>(member: &Member<'a>) -> &'a kermlc::ast::Classifier<'a> {
    match member.kind {
        MemberKind::Classifier(classifier) => classifier,
        other => panic!("expected a classifier member, got {other:?}"),
    }
}

fn value_expr<'a>(root: &'a Namespace<'a>) -> &'a Expr<'a> {
    feature_of(&root.members[0])
        .value
        .expect("feature has an initializer")
        .expr
}

#[test]
fn empty_input_yields_empty_root() {
    parse_source("", |root, diag| {
        assert!(root.members.is_empty());
        assert_eq!(diag.diagnostics().len(), 0);
        assert!(!diag.has_errors());
    });
}

#[test]
fn package_with_empty_body() {
    parse_source("package P {}", |root, diag| {
        assert_eq!(root.members.len(), 1);
        let member = &root.members[0];
        let MemberKind::Package(package) = member.kind else {
            panic!("expected a package");
        };
        assert_eq!(package.name.expect("package is named").name.as_str(), "P");
        assert!(package.members.is_empty());
        assert!(!package.is_library);
        assert_eq!(diag.diagnostics().len(), 0);
    });
}

#[test]
fn library_package() {
    parse_source("library package Shapes { }", |root, diag| {
        let MemberKind::Package(package) = root.members[0].kind else {
            panic!("expected a package");
        };
        assert!(package.is_library);
        assert_eq!(package.name.unwrap().name.as_str(), "Shapes");
        assert!(!diag.has_errors());
    });
}

#[test]
fn classifier_with_specialization() {
    parse_source("class Car :> Vehicle {}", |root, diag| {
        assert!(!diag.has_errors());
        let classifier = classifier_of(&root.members[0]);
        assert_eq!(classifier.kind, ClassifierKind::Class);
        assert_eq!(classifier.name.unwrap().name.as_str(), "Car");
        assert_eq!(classifier.relationships.len(), 1);
        let relationship = &classifier.relationships[0];
        assert_eq!(relationship.kind, RelationshipKind::Specializes);
        assert_eq!(relationship.target.segments.len(), 1);
        assert_eq!(relationship.target.segments[0].as_str(), "Vehicle");
        assert_eq!(classifier.body.expect("body parsed").len(), 0);
    });
}

#[test]
fn missing_semicolon_recovers_with_fixit() {
    let source = "class A { feature x : X\n    feature y : Y;\n}";
    parse_source(source, |root, diag| {
        let classifier = classifier_of(&root.members[0]);
        let body = classifier.body.expect("body parsed");
        assert_eq!(body.len(), 2, "both features survive recovery");
        assert_eq!(feature_of(&body[0]).name.unwrap().name.as_str(), "x");
        assert_eq!(feature_of(&body[1]).name.unwrap().name.as_str(), "y");

        assert_eq!(diag.error_count(), 1);
        let d = &diag.diagnostics()[0];
        assert_eq!(d.code, DiagCode::E2001);
        assert!(d.help.is_some());
        assert_eq!(d.fixits.len(), 1);
        assert_eq!(d.fixits[0].replacement, ";");
        assert!(d.fixits[0].range.is_empty());
    });
}

#[test]
fn exact_multiplicity_desugars_to_shared_bounds() {
    parse_source("package P { feature wheels[4] : Wheel; }", |root, diag| {
        assert!(!diag.has_errors());
        let MemberKind::Package(package) = root.members[0].kind else {
            panic!("expected a package");
        };
        let feature = feature_of(&package.members[0]);
        let multiplicity = feature.multiplicity.expect("multiplicity parsed");
        let lower = multiplicity.lower.expect("lower bound");
        let upper = multiplicity.upper.expect("upper bound");
        assert_eq!(lower.as_integer(), Some(4));
        assert!(
            std::ptr::eq(lower, upper),
            "[n] shares one bound expression"
        );
        assert_eq!(feature.relationships[0].kind, RelationshipKind::TypedBy);
    });
}

#[test]
fn star_multiplicity_leaves_bounds_absent() {
    parse_source("feature xs[*] : X;", |root, _| {
        let multiplicity = feature_of(&root.members[0]).multiplicity.unwrap();
        assert!(multiplicity.lower.is_none());
        assert!(multiplicity.upper.is_none());
    });
}

#[test]
fn range_multiplicity_with_flags() {
    parse_source("feature xs[2..5] ordered nonunique : X;", |root, diag| {
        assert!(!diag.has_errors());
        let multiplicity = feature_of(&root.members[0]).multiplicity.unwrap();
        assert_eq!(multiplicity.lower.unwrap().as_integer(), Some(2));
        assert_eq!(multiplicity.upper.unwrap().as_integer(), Some(5));
        assert!(multiplicity.is_ordered);
        assert!(multiplicity.is_nonunique);
    });
}

#[test]
fn open_upper_bound() {
    parse_source("feature xs[1..*] : X;", |root, _| {
        let multiplicity = feature_of(&root.members[0]).multiplicity.unwrap();
        assert_eq!(multiplicity.lower.unwrap().as_integer(), Some(1));
        assert!(multiplicity.upper.is_none());
    });
}

#[test]
fn power_is_right_associative_and_binds_tightest() {
    parse_source("feature f = 1 + 2 * 3 ** 2 ** 4;", |root, diag| {
        assert!(!diag.has_errors());
        // Expected shape: (+ 1 (* 2 (** 3 (** 2 4))))
        let Expr::Binary {
            op: BinaryOp::Add,
            lhs: one,
            rhs: product,
            ..
        } = value_expr(root)
        else {
            panic!("top is addition");
        };
        assert_eq!(one.as_integer(), Some(1));
        let Expr::Binary {
            op: BinaryOp::Mul,
            lhs: two,
            rhs: power,
            ..
        } = product
        else {
            panic!("rhs of + is multiplication");
        };
        assert_eq!(two.as_integer(), Some(2));
        let Expr::Binary {
            op: BinaryOp::Pow,
            lhs: three,
            rhs: inner_power,
            ..
        } = power
        else {
            panic!("rhs of * is a power");
        };
        assert_eq!(three.as_integer(), Some(3));
        let Expr::Binary {
            op: BinaryOp::Pow,
            lhs: two2,
            rhs: four,
            ..
        } = inner_power
        else {
            panic!("power nests to the right");
        };
        assert_eq!(two2.as_integer(), Some(2));
        assert_eq!(four.as_integer(), Some(4));
    });
}

#[rstest]
#[case("feature f = 1 + 2 + 3;", BinaryOp::Add)]
#[case("feature f = 1 - 2 - 3;", BinaryOp::Sub)]
#[case("feature f = 1 * 2 * 3;", BinaryOp::Mul)]
#[case("feature f = 1 / 2 / 3;", BinaryOp::Div)]
#[case("feature f = 1 % 2 % 3;", BinaryOp::Mod)]
#[case("feature f = true and false and true;", BinaryOp::And)]
#[case("feature f = true or false or true;", BinaryOp::Or)]
#[case("feature f = true xor false xor true;", BinaryOp::Xor)]
#[case("feature f = true implies false implies true;", BinaryOp::Implies)]
fn left_associative_levels(#[case] source: &str, #[case] op: BinaryOp) {
    parse_source(source, |root, diag| {
        assert!(!diag.has_errors(), "{:?}", diag.diagnostics());
        let Expr::Binary {
            op: top,
            lhs,
            rhs,
            ..
        } = value_expr(root)
        else {
            panic!("top is binary");
        };
        assert_eq!(*top, op);
        assert!(
            matches!(lhs, Expr::Binary { .. }),
            "left operand holds the earlier application"
        );
        assert!(!matches!(rhs, Expr::Binary { .. }));
    });
}

#[rstest]
#[case("feature f = 1 == 2;", BinaryOp::Eq)]
#[case("feature f = 1 != 2;", BinaryOp::Ne)]
#[case("feature f = 1 === 2;", BinaryOp::MetaEq)]
#[case("feature f = 1 !== 2;", BinaryOp::MetaNe)]
#[case("feature f = 1 < 2;", BinaryOp::Lt)]
#[case("feature f = 1 <= 2;", BinaryOp::Le)]
#[case("feature f = 1 > 2;", BinaryOp::Gt)]
#[case("feature f = 1 >= 2;", BinaryOp::Ge)]
fn comparison_and_equality_operators(#[case] source: &str, #[case] op: BinaryOp) {
    parse_source(source, |root, diag| {
        assert!(!diag.has_errors());
        let Expr::Binary { op: parsed, .. } = value_expr(root) else {
            panic!("top is binary");
        };
        assert_eq!(*parsed, op);
    });
}

#[test]
fn call_forms_bind_tighter_than_binary() {
    parse_source("feature f = base.size(2)[0] + 1;", |root, diag| {
        assert!(!diag.has_errors());
        let Expr::Binary {
            op: BinaryOp::Add,
            lhs,
            ..
        } = value_expr(root)
        else {
            panic!("top is addition");
        };
        let Expr::Index { base, index, .. } = lhs else {
            panic!("lhs is an index expression");
        };
        assert_eq!(index.as_integer(), Some(0));
        let Expr::Invocation { target, args, .. } = base else {
            panic!("indexed expression is an invocation");
        };
        assert_eq!(args.len(), 1);
        assert!(matches!(target, Expr::MemberAccess { .. }));
    });
}

#[test]
fn conditional_expression() {
    parse_source("feature f = if x > 0 then 1 else 2;", |root, diag| {
        assert!(!diag.has_errors());
        let Expr::Conditional {
            condition,
            then_branch,
            else_branch,
            ..
        } = value_expr(root)
        else {
            panic!("conditional expression");
        };
        assert!(matches!(condition, Expr::Binary { .. }));
        assert_eq!(then_branch.as_integer(), Some(1));
        assert_eq!(else_branch.unwrap().as_integer(), Some(2));
    });
}

#[test]
fn literal_primaries() {
    parse_source(
        "feature f = compute(42, 0x2A, 3.5, \"hi\", true, null);",
        |root, diag| {
            assert!(!diag.has_errors());
            let Expr::Invocation { args, .. } = value_expr(root) else {
                panic!("invocation");
            };
            assert_eq!(args[0].as_integer(), Some(42));
            assert_eq!(args[1].as_integer(), Some(42));
            assert!(matches!(args[2], Expr::Real { value, .. } if (*value - 3.5).abs() < 1e-9));
            assert!(matches!(args[3], Expr::String { value, .. } if value.as_str() == "hi"));
            assert!(matches!(args[4], Expr::Boolean { value: true, .. }));
            assert!(matches!(args[5], Expr::Null { .. }));
        },
    );
}

#[test]
fn import_forms() {
    parse_source(
        "import A::B; import ISQ::*; import SI::**;",
        |root, diag| {
            assert!(!diag.has_errors());
            let scopes: Vec<ImportScope> = root
                .members
                .iter()
                .map(|member| match member.kind {
                    MemberKind::Import(import) => import.scope,
                    _ => panic!("expected imports"),
                })
                .collect();
            assert_eq!(
                scopes,
                [
                    ImportScope::Single,
                    ImportScope::Wildcard,
                    ImportScope::Recursive
                ]
            );
            let MemberKind::Import(first) = root.members[0].kind else {
                unreachable!();
            };
            assert_eq!(first.target.to_string(), "A::B");
        },
    );
}

#[test]
fn qualified_name_round_trip() {
    parse_source("feature f : ::Scalar::Values::Real;", |root, diag| {
        assert!(!diag.has_errors());
        let feature = feature_of(&root.members[0]);
        let target = feature.relationships[0].target;
        assert!(target.is_global);
        assert_eq!(target.to_string(), "::Scalar::Values::Real");
    });
}

#[test]
fn unrestricted_names_lose_their_quotes() {
    parse_source("part def 'Wheel Assembly' { }", |root, diag| {
        assert!(!diag.has_errors());
        let classifier = classifier_of(&root.members[0]);
        assert_eq!(classifier.kind, ClassifierKind::PartDef);
        assert_eq!(classifier.name.unwrap().name.as_str(), "Wheel Assembly");
    });
}

#[test]
fn alias_declaration() {
    parse_source("alias Wheels for Vehicle::wheels;", |root, diag| {
        assert!(!diag.has_errors());
        let MemberKind::Alias(alias) = root.members[0].kind else {
            panic!("expected an alias");
        };
        assert_eq!(alias.name.name.as_str(), "Wheels");
        assert_eq!(alias.target.to_string(), "Vehicle::wheels");
    });
}

#[test]
fn comment_element_with_clauses() {
    let source = "comment intro about A, B locale \"en\" /* the vehicle model */ ;";
    parse_source(source, |root, diag| {
        assert!(!diag.has_errors(), "{:?}", diag.diagnostics());
        let MemberKind::Comment(comment) = root.members[0].kind else {
            panic!("expected a comment element");
        };
        assert!(!comment.is_doc);
        assert_eq!(comment.name.unwrap().name.as_str(), "intro");
        assert_eq!(comment.about.len(), 2);
        assert_eq!(comment.locale, Some("en"));
        assert_eq!(comment.body, Some("/* the vehicle model */"));
    });
}

#[test]
fn doc_element() {
    parse_source("doc /* overview */ ;", |root, diag| {
        assert!(!diag.has_errors());
        let MemberKind::Comment(comment) = root.members[0].kind else {
            panic!("expected a doc element");
        };
        assert!(comment.is_doc);
        assert_eq!(comment.body, Some("/* overview */"));
    });
}

#[test]
fn visibility_prefix_and_direction() {
    parse_source(
        "private abstract part def Hidden; protected in feature cfg : Config; ref feature spare : Wheel;",
        |root, diag| {
            assert!(!diag.has_errors());
            assert_eq!(root.members[0].visibility, Visibility::Private);
            let classifier = classifier_of(&root.members[0]);
            assert!(classifier.prefix.is_abstract);

            assert_eq!(root.members[1].visibility, Visibility::Protected);
            let feature = feature_of(&root.members[1]);
            assert_eq!(feature.direction, kermlc::ast::Direction::In);

            assert!(feature_of(&root.members[2]).prefix.is_ref);
        },
    );
}

#[test]
fn anonymous_feature_from_bare_name() {
    parse_source("class A { wheels : Wheel; }", |root, diag| {
        assert!(!diag.has_errors());
        let body = classifier_of(&root.members[0]).body.unwrap();
        let feature = feature_of(&body[0]);
        assert_eq!(feature.kind, FeatureKind::Feature);
        assert_eq!(feature.name.unwrap().name.as_str(), "wheels");
    });
}

#[test]
fn def_selects_classifier_variant_usage_selects_feature() {
    parse_source("part def Wheel; part w : Wheel;", |root, diag| {
        assert!(!diag.has_errors());
        assert_eq!(classifier_of(&root.members[0]).kind, ClassifierKind::PartDef);
        assert_eq!(feature_of(&root.members[1]).kind, FeatureKind::Part);
    });
}

#[test]
fn relationship_clause_lists_fan_out() {
    parse_source("class C :> A, B : T ::> s :>> r ~ P;", |root, diag| {
        assert!(!diag.has_errors());
        let kinds: Vec<RelationshipKind> = classifier_of(&root.members[0])
            .relationships
            .iter()
            .map(|relationship| relationship.kind)
            .collect();
        assert_eq!(
            kinds,
            [
                RelationshipKind::Specializes,
                RelationshipKind::Specializes,
                RelationshipKind::TypedBy,
                RelationshipKind::Subsets,
                RelationshipKind::Redefines,
                RelationshipKind::Conjugates
            ]
        );
    });
}

#[test]
fn word_form_relationships() {
    parse_source(
        "feature f specializes g subsets h redefines i references j;",
        |root, diag| {
            assert!(!diag.has_errors());
            let kinds: Vec<RelationshipKind> = feature_of(&root.members[0])
                .relationships
                .iter()
                .map(|relationship| relationship.kind)
                .collect();
            assert_eq!(
                kinds,
                [
                    RelationshipKind::Specializes,
                    RelationshipKind::Subsets,
                    RelationshipKind::Redefines,
                    RelationshipKind::References
                ]
            );
        },
    );
}

#[test]
fn unexpected_token_recovers_to_next_member() {
    parse_source(", package P {}", |root, diag| {
        assert_eq!(diag.error_count(), 1);
        assert_eq!(diag.diagnostics()[0].code, DiagCode::E2006);
        assert_eq!(root.members.len(), 1);
        assert!(matches!(root.members[0].kind, MemberKind::Package(_)));
    });
}

#[test]
fn nested_bodies_parse() {
    let source = "package Vehicles {\n    part def Engine {\n        attribute power : Real;\n    }\n    part engine : Engine;\n}";
    parse_source(source, |root, diag| {
        assert!(!diag.has_errors(), "{:?}", diag.diagnostics());
        let MemberKind::Package(package) = root.members[0].kind else {
            panic!("expected a package");
        };
        assert_eq!(package.members.len(), 2);
        let engine_def = classifier_of(&package.members[0]);
        assert_eq!(engine_def.body.unwrap().len(), 1);
    });
}

#[test]
fn member_ranges_enclose_children() {
    fn assert_containment(member: &Member<'_>) {
        if let Some(body) = member.body() {
            for child in body {
                assert!(
                    member.range.contains_range(child.range),
                    "{:?} does not enclose {:?}",
                    member.range,
                    child.range
                );
                assert_containment(child);
            }
        }
        for relationship in member.relationships() {
            assert!(member.range.contains_range(relationship.range));
            assert!(relationship.range.contains_range(relationship.target.range));
        }
    }

    let source = "package P {\n    class Car :> Vehicle {\n        feature wheels[4] : Wheel;\n    }\n}";
    parse_source(source, |root, _| {
        for member in root.members {
            assert!(root.range.contains_range(member.range));
            assert_containment(member);
        }
    });
}

#[test]
fn parser_stops_at_the_error_budget() {
    // Thirty imports with missing targets; the default budget is 20.
    let source = "import ;\n".repeat(30);
    parse_source(&source, |_, diag| {
        assert_eq!(diag.error_count(), 20);
        assert_eq!(diag.diagnostics().len(), 20);
        assert!(diag.should_stop());
    });
}

#[test]
fn fatal_diagnostic_halts_parsing_before_it_starts() {
    let file = SourceFile::new("test.kerml", "package P {}");
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut diag = DiagnosticContext::new();
    diag.emit(kermlc::Diagnostic::new(
        DiagCode::E1001,
        kermlc::Severity::Fatal,
        kermlc::base::invalid_range(),
        "cannot continue",
    ));
    let root = kermlc::parse(&file, &arena, &mut interner, &mut diag);
    assert!(root.members.is_empty());
}

#[test]
fn lexer_errors_do_not_cascade_into_parse_errors() {
    parse_source("package P { } ` package Q { }", |root, diag| {
        // One E1001 from the lexer; the dispatcher skips the error token.
        assert_eq!(diag.error_count(), 1);
        assert_eq!(diag.diagnostics()[0].code, DiagCode::E1001);
        assert_eq!(root.members.len(), 2);
    });
}
