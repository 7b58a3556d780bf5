use indoc::indoc;

use super::*;

fn run(host_version: u32, source: &str) -> Result<String, ParseError> {
    Preprocessor::new(host_version).preprocess(Path::new("t.evt"), source)
}

#[test]
fn test_plain_input_is_unchanged() {
    let source = "import A;\nexport A::T;\n";
    assert_eq!(run(50200, source).unwrap(), source);
}

#[test]
fn test_if_else_selects_branch_and_preserves_lines() {
    let source = indoc! {"
        @if HOST_VERSION >= 50200
        import New;
        @else
        import Old;
        @endif
        export A::T;
    "};

    let old = run(50100, source).unwrap();
    assert_eq!(old, "\n\n\nimport Old;\n\nexport A::T;\n");
    assert_eq!(old.lines().count(), source.lines().count());

    let new = run(50200, source).unwrap();
    assert_eq!(new, "\nimport New;\n\n\n\nexport A::T;\n");
}

#[test]
fn test_nested_conditions() {
    let source = indoc! {"
        @if HOST_VERSION < 40000
        @if HOST_VERSION > 10
        a;
        @endif
        @else
        @if !HOST_VERSION
        b;
        @else
        c;
        @endif
        @endif
    "};
    let out = run(50000, source).unwrap();
    assert_eq!(out.lines().filter(|l| !l.is_empty()).collect::<Vec<_>>(), vec!["c;"]);
}

#[test]
fn test_indented_directives_and_synonym() {
    let source = "  @if ZEEK_VERSION == 50200\nx;\n  @endif\n";
    assert_eq!(run(50200, source).unwrap(), "\nx;\n\n");
}

#[test]
fn test_directive_errors() {
    let err = run(50200, "@if HOST_VERSION\nx;\n").unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::UnterminatedDirective);

    let err = run(50200, "x;\n@endif\n").unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::UnmatchedDirective("endif"));
    assert_eq!(err.location(), Some(&Location::new("t.evt", 2)));

    let err = run(50200, "@if HOST_VERSION\n@else\n@else\n@endif\n").unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::DuplicateElse);

    let err = run(50200, "@ifdef X\n").unwrap_err();
    assert_eq!(
        err.kind(),
        &ParseErrorKind::UnknownDirective("@ifdef".to_string())
    );

    let err = run(50200, "@if OTHER > 1\n@endif\n").unwrap_err();
    assert_eq!(
        err.kind(),
        &ParseErrorKind::UnknownVariable("OTHER".to_string())
    );

    let err = run(50200, "@if HOST_VERSION >= abc\n@endif\n").unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::InvalidCondition(_)));
}
