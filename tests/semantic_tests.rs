//! Semantic integration tests: definition collection, reference checks,
//! suggestions, scoping.

use bumpalo::Bump;
use kermlc::{DiagCode, DiagnosticContext, Interner, Severity, SourceFile};
use text_size::{TextRange, TextSize};

fn check_source(source: &str, f: impl FnOnce(&DiagnosticContext)) {
    let file = SourceFile::new("test.kerml", source);
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut diag = DiagnosticContext::new();
    let _ = kermlc::check(&file, &arena, &mut interner, &mut diag);
    f(&diag);
}

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::new(start), TextSize::new(end))
}

#[test]
fn undefined_supertype_is_reported_once() {
    check_source("class Car :> Vehicle {}", |diag| {
        assert_eq!(diag.error_count(), 1);
        let d = &diag.diagnostics()[0];
        assert_eq!(d.code, DiagCode::E3001);
        assert!(d.message.contains("undefined supertype 'Vehicle'"));
        assert_eq!(d.range, range(13, 20));
    });
}

#[test]
fn duplicate_definition_reports_once_with_note() {
    check_source("class A {} class A {}", |diag| {
        assert_eq!(diag.error_count(), 1);
        let d = &diag.diagnostics()[0];
        assert_eq!(d.code, DiagCode::E3004);
        assert!(d.message.contains("duplicate definition of 'A'"));
        assert_eq!(d.range, range(17, 18), "reported at the second definition");
        assert_eq!(d.notes.len(), 1);
        assert_eq!(d.notes[0].range, range(6, 7), "note points at the first");
    });
}

#[test]
fn first_definition_stays_resolvable_after_a_duplicate() {
    check_source("class A {} class A {} class B :> A {}", |diag| {
        // Only the duplicate itself is reported; B :> A resolves.
        assert_eq!(diag.error_count(), 1);
        assert_eq!(diag.diagnostics()[0].code, DiagCode::E3004);
    });
}

#[test]
fn builtins_resolve() {
    check_source(
        "feature count : Integer; feature label : String; feature temp : Real;",
        |diag| {
            assert_eq!(diag.error_count(), 0, "{:?}", diag.diagnostics());
        },
    );
}

#[test]
fn close_misspelling_gets_a_suggestion() {
    check_source("feature count : Integr;", |diag| {
        assert_eq!(diag.error_count(), 1);
        let d = &diag.diagnostics()[0];
        assert_eq!(d.code, DiagCode::E3001);
        assert!(d.message.contains("undefined type 'Integr'"));
        let help = d.help.as_ref().expect("suggestion attached");
        assert!(help.contains("did you mean 'Integer'?"), "{help}");
    });
}

#[test]
fn distant_names_get_no_suggestion() {
    check_source("class Car :> Vehicle {}", |diag| {
        assert!(diag.diagnostics()[0].help.is_none());
    });
}

#[test]
fn user_defined_sibling_suggestion() {
    check_source("part def Wheel; part w : Wheal;", |diag| {
        assert_eq!(diag.error_count(), 1);
        let help = diag.diagnostics()[0].help.as_ref().expect("suggestion");
        assert!(help.contains("'Wheel'"));
    });
}

#[test]
fn sibling_references_resolve_regardless_of_order() {
    check_source("class B :> A {} class A {}", |diag| {
        assert_eq!(diag.error_count(), 0, "{:?}", diag.diagnostics());
    });
}

#[test]
fn nested_scope_references() {
    check_source(
        "package P { part def Wheel {} part w : Wheel; }",
        |diag| {
            assert_eq!(diag.error_count(), 0, "{:?}", diag.diagnostics());
        },
    );
}

#[test]
fn qualified_reference_into_an_earlier_body() {
    check_source("package P { part def W {} } part w : P::W;", |diag| {
        assert_eq!(diag.error_count(), 0, "{:?}", diag.diagnostics());
    });
}

#[test]
fn unresolved_first_segment_reports_the_full_name() {
    check_source("part w : Garage::Wheel;", |diag| {
        assert_eq!(diag.error_count(), 1);
        assert!(
            diag.diagnostics()[0]
                .message
                .contains("undefined type 'Garage::Wheel'")
        );
    });
}

#[test]
fn relationship_kinds_pick_their_code_and_wording() {
    check_source("feature f ::> missing;", |diag| {
        let d = &diag.diagnostics()[0];
        assert_eq!(d.code, DiagCode::E3002);
        assert!(d.message.contains("undefined subsetted feature 'missing'"));
    });
    check_source("feature f :>> missing;", |diag| {
        let d = &diag.diagnostics()[0];
        assert_eq!(d.code, DiagCode::E3002);
        assert!(d.message.contains("undefined redefined feature 'missing'"));
    });
    check_source("feature f references missing;", |diag| {
        let d = &diag.diagnostics()[0];
        assert_eq!(d.code, DiagCode::E3002);
        assert!(d.message.contains("undefined reference 'missing'"));
    });
    check_source("feature f ~ Missing;", |diag| {
        let d = &diag.diagnostics()[0];
        assert_eq!(d.code, DiagCode::E3001);
        assert!(d.message.contains("undefined type 'Missing'"));
    });
}

#[test]
fn alias_targets_are_checked() {
    check_source("alias W for Wheels;", |diag| {
        assert_eq!(diag.error_count(), 1);
        let d = &diag.diagnostics()[0];
        assert_eq!(d.code, DiagCode::E3002);
        assert!(d.message.contains("undefined reference 'Wheels'"));
    });
}

#[test]
fn alias_to_a_defined_element_is_quiet() {
    check_source("part def Wheel; alias W for Wheel;", |diag| {
        assert_eq!(diag.error_count(), 0, "{:?}", diag.diagnostics());
    });
}

#[test]
fn imports_are_not_resolved_yet() {
    // Cross-file import resolution is a reserved hook; no diagnostics.
    check_source("import UnknownLibrary::*;", |diag| {
        assert_eq!(diag.error_count(), 0);
    });
}

#[test]
fn anonymous_members_collect_no_symbols() {
    check_source("class A { in : Integer; }", |diag| {
        // The anonymous feature types against a builtin; nothing to define.
        assert_eq!(diag.error_count(), 0, "{:?}", diag.diagnostics());
    });
}

#[test]
fn shadowing_a_user_definition_warns() {
    check_source(
        "package P { part def X {} part def Y { part X : Integer; } }",
        |diag| {
            assert_eq!(diag.error_count(), 0, "{:?}", diag.diagnostics());
            assert_eq!(diag.warning_count(), 1);
            let d = &diag.diagnostics()[0];
            assert_eq!(d.code, DiagCode::W10002);
            assert!(d.message.contains("shadows"));
            assert_eq!(d.notes.len(), 1);
        },
    );
}

#[test]
fn shadowing_a_builtin_is_quiet() {
    check_source("package P { part def Integer {} }", |diag| {
        assert_eq!(diag.warning_count(), 0);
        assert_eq!(diag.error_count(), 0);
    });
}

#[test]
fn promoted_warnings_count_as_errors() {
    let file = SourceFile::new(
        "test.kerml",
        "package P { part def X {} part def Y { part X : Integer; } }",
    );
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut diag = DiagnosticContext::new();
    diag.set_warnings_as_errors(true);
    let _ = kermlc::check(&file, &arena, &mut interner, &mut diag);

    assert_eq!(diag.warning_count(), 0);
    assert_eq!(diag.error_count(), 1);
    assert_eq!(diag.diagnostics()[0].severity, Severity::Error);
    assert!(diag.has_errors());
}

#[test]
fn symbol_table_contents_after_analysis() {
    let file = SourceFile::new("test.kerml", "package P { part def Wheel {} }");
    let arena = Bump::new();
    let mut interner = Interner::new(&arena);
    let mut diag = DiagnosticContext::new();
    let (_, table) = kermlc::check(&file, &arena, &mut interner, &mut diag);

    let p = interner.intern("P");
    let id = table.lookup(p).expect("package symbol collected");
    let symbol = table.symbol(id);
    assert_eq!(symbol.kind, kermlc::SymbolKind::Package);
    assert!(!symbol.is_builtin());

    let wheel = interner.intern("Wheel");
    let body = symbol.body_scope.expect("body scope recorded");
    let wheel_id = table.lookup_in(body, wheel).expect("nested symbol");
    assert_eq!(
        table.symbol(wheel_id).kind,
        kermlc::SymbolKind::Classifier
    );
}

#[test]
fn parse_and_semantic_errors_interleave_in_emission_order() {
    // A parse error on the first member, a semantic error on the second.
    check_source("feature a : ; feature b : Missing;", |diag| {
        let codes: Vec<DiagCode> = diag.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(codes, [DiagCode::E2002, DiagCode::E3001]);
        assert_eq!(diag.parse_error_count(), 1);
        assert_eq!(diag.semantic_error_count(), 1);
    });
}

#[test]
fn semantic_walk_respects_the_error_budget() {
    let mut source = String::new();
    for i in 0..30 {
        source.push_str(&format!("feature f{i} : Missing{i};\n"));
    }
    check_source(&source, |diag| {
        assert_eq!(diag.error_count(), 20);
        assert!(diag.should_stop());
    });
}
