use indoc::indoc;

use super::*;

const SOURCE: &str = indoc! {r#"
    # HTTP glue
    import Zeek_HTTP from zeek/http;

    protocol analyzer spicy::HTTP over TCP:
        parse originator with HTTP::Requests,
        parse responder with HTTP::Replies,
        port 80/tcp;

    on HTTP::Request -> event http::request($conn, self.method, self.uri);
    on HTTP::Reply::%done -> event http::reply($conn, self.status);

    export HTTP::Method;
"#};

#[test]
fn test_load_collects_declarations_in_order() {
    let decls = load_source(Path::new("http.evt"), SOURCE, 50200).unwrap();

    assert_eq!(decls.imports.len(), 1);
    assert_eq!(decls.protocol_analyzers.len(), 1);
    assert_eq!(decls.exports.len(), 1);

    let names: Vec<&str> = decls.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["http::request", "http::reply"]);

    let lines: Vec<usize> = decls.events.iter().map(|e| e.location.line).collect();
    assert_eq!(lines, vec![9, 10]);
    assert_eq!(decls.protocol_analyzers[0].location.line, 4);
    assert_eq!(decls.exports[0].location.line, 12);
}

#[test]
fn test_load_is_deterministic() {
    let first = load_source(Path::new("http.evt"), SOURCE, 50200).unwrap();
    let second = load_source(Path::new("http.evt"), SOURCE, 50200).unwrap();
    assert_eq!(first.events, second.events);
    assert_eq!(first.protocol_analyzers, second.protocol_analyzers);
}

#[test]
fn test_load_reports_statement_location() {
    let source = indoc! {"
        import A;

        on A::U -> event e(self.x)
            extra;
    "};
    let err = load_source(Path::new("bad.evt"), source, 50200).unwrap_err();
    assert_eq!(err.location(), Some(&Location::new("bad.evt", 3)));
    assert_eq!(err.kind(), &ParseErrorKind::ExpectedToken(";".to_string()));
}

#[test]
fn test_load_line_numbers_survive_preprocessing() {
    let source = indoc! {"
        @if HOST_VERSION >= 50200
        on A::U -> event new_event();
        @else
        on A::U -> event old_event();
        @endif
        on A::U -> event
    "};
    let err = load_source(Path::new("pp.evt"), source, 50100).unwrap_err();
    assert_eq!(err.kind(), &ParseErrorKind::UnexpectedEof);
    assert_eq!(err.location(), Some(&Location::new("pp.evt", 7)));

    let ok = "@if HOST_VERSION >= 50200\non A::U -> event new_event();\n@else\non A::U -> event old_event();\n@endif\n";
    let decls = load_source(Path::new("pp.evt"), ok, 50100).unwrap();
    assert_eq!(decls.events.len(), 1);
    assert_eq!(decls.events[0].name.as_str(), "old_event");
    assert_eq!(decls.events[0].location.line, 4);
}
