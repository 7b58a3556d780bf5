use super::*;
use crate::core::decls::{DEFAULT_EVENT_PRIORITY, Port};
use crate::core::ids::QualifiedId;

fn loc() -> Location {
    Location::new("t.evt", 1)
}

fn protocol(chunk: &str) -> Result<ProtocolAnalyzer, ParseErrorKind> {
    parse_protocol_analyzer(chunk, &loc())
}

fn qid(id: &str) -> Option<QualifiedId> {
    Some(QualifiedId::new(id))
}

#[test]
fn test_minimal_protocol_analyzer() {
    let analyzer =
        protocol("protocol analyzer HTTP over TCP: parse with HTTP::Requests, port 80/tcp;")
            .unwrap();

    assert_eq!(analyzer.name, "HTTP");
    assert_eq!(analyzer.transport, Transport::Tcp);
    assert_eq!(analyzer.orig_unit, qid("HTTP::Requests"));
    assert_eq!(analyzer.resp_unit, qid("HTTP::Requests"));
    assert_eq!(analyzer.ports, vec![Port::new(80, Transport::Tcp)]);
    assert_eq!(analyzer.replaces, None);
    assert_eq!(analyzer.location, loc());
}

#[test]
fn test_protocol_analyzer_directions_and_ports() {
    let analyzer = protocol(
        "protocol analyzer spicy::DNS over udp:
            parse originator with DNS::Request,
            parse responder with DNS::Reply,
            ports { 53/udp, 5353-5354/udp },
            port 443/tcp,
            replaces DNS;",
    )
    .unwrap();

    assert_eq!(analyzer.name, "spicy::DNS");
    assert_eq!(analyzer.transport, Transport::Udp);
    assert_eq!(analyzer.orig_unit, qid("DNS::Request"));
    assert_eq!(analyzer.resp_unit, qid("DNS::Reply"));
    assert_eq!(
        analyzer.ports,
        vec![
            Port::new(53, Transport::Udp),
            Port::new(5353, Transport::Udp),
            Port::new(5354, Transport::Udp),
            Port::new(443, Transport::Tcp),
        ]
    );
    assert_eq!(analyzer.replaces, qid("DNS"));
}

#[test]
fn test_protocol_analyzer_errors() {
    assert_eq!(
        protocol("protocol analyzer X over SCTP: parse with A::B;"),
        Err(ParseErrorKind::UnknownTransport("sctp".to_string()))
    );
    assert_eq!(
        protocol("protocol analyzer X over TCP: parse sideways with A::B;"),
        Err(ParseErrorKind::InvalidParseSpec)
    );
    assert_eq!(
        protocol("protocol analyzer X over TCP: parse with A::B, colour blue;"),
        Err(ParseErrorKind::UnexpectedToken)
    );
    assert_eq!(
        protocol("protocol analyzer X over TCP: parse with A::B port 80/tcp;"),
        Err(ParseErrorKind::ExpectedToken(",".to_string()))
    );
    assert_eq!(
        protocol("protocol analyzer X over TCP: port 80/tcp;"),
        Err(ParseErrorKind::MissingParseSpec("X".to_string()))
    );
    assert_eq!(
        protocol("protocol analyzer X over TCP: parse with A::B, port 6000-6002/tcp-6100/udp;"),
        Err(ParseErrorKind::PortRangeProtocolMismatch)
    );
}

#[test]
fn test_file_analyzer() {
    let analyzer = parse_file_analyzer(
        "file analyzer PDF: parse with PDF::File, mime-type application/pdf, mime-type application/x-pdf, replaces PDF;",
        &loc(),
    )
    .unwrap();

    assert_eq!(analyzer.name, "PDF");
    assert_eq!(analyzer.unit, qid("PDF::File"));
    assert_eq!(
        analyzer.mime_types,
        vec!["application/pdf".to_string(), "application/x-pdf".to_string()]
    );
    assert_eq!(analyzer.replaces, qid("PDF"));
}

#[test]
fn test_packet_analyzer_replaces_is_version_gated() {
    let chunk = "packet analyzer spicy::RawLayer: parse with RawLayer::Packet, replaces ETH;";

    let analyzer = parse_packet_analyzer(chunk, &loc(), 50200).unwrap();
    assert_eq!(analyzer.unit, qid("RawLayer::Packet"));
    assert_eq!(analyzer.replaces, qid("ETH"));

    assert_eq!(
        parse_packet_analyzer(chunk, &loc(), 50100),
        Err(ParseErrorKind::PacketReplacesUnsupported)
    );
}

#[test]
fn test_event_with_condition_and_reserved_args() {
    let event = parse_event(
        "on HTTP::Request::%done if (self.method == \"GET\") -> event http::req($conn, $is_orig, self.uri) &priority=5;",
        &loc(),
    )
    .unwrap();

    assert_eq!(event.path.as_str(), "HTTP::Request::0x25_done");
    assert_eq!(event.condition.as_deref(), Some("self.method == \"GET\""));
    assert_eq!(event.name.as_str(), "http::req");
    assert_eq!(event.exprs, vec!["$conn", "$is_orig", "self.uri"]);
    assert_eq!(event.priority, 5);
    assert_eq!(event.file, std::path::PathBuf::from("t.evt"));
}

#[test]
fn test_event_defaults_and_nested_args() {
    let event = parse_event("on X::Y -> event e(f(a, b), [1, 2]);", &loc()).unwrap();
    assert_eq!(event.condition, None);
    assert_eq!(event.priority, DEFAULT_EVENT_PRIORITY);
    assert_eq!(event.exprs, vec!["f(a, b)", "[1, 2]"]);

    let event = parse_event("on X::Y -> event e() &priority = -3;", &loc()).unwrap();
    assert!(event.exprs.is_empty());
    assert_eq!(event.priority, -3);
}

#[test]
fn test_event_errors() {
    assert_eq!(
        parse_event("on X::Y -> event e(a) junk;", &loc()).map(|_| ()),
        Err(ParseErrorKind::ExpectedToken(";".to_string()))
    );
    assert_eq!(
        parse_event("on X::Y event e(a);", &loc()).map(|_| ()),
        Err(ParseErrorKind::ExpectedToken("->".to_string()))
    );
    assert_eq!(
        parse_event("on X::Y -> event e(a,);", &loc()).map(|_| ()),
        Err(ParseErrorKind::ExpectedExpression)
    );
}

#[test]
fn test_import_and_export() {
    let import = parse_import("import Zeek_HTTP from some/path;").unwrap();
    assert_eq!(import.module.as_str(), "Zeek_HTTP");
    assert_eq!(import.scope.as_deref(), Some("some/path"));

    let import = parse_import("import HTTP;").unwrap();
    assert_eq!(import.scope, None);

    let export = parse_export("export HTTP::Request;", &loc()).unwrap();
    assert_eq!(export.id.as_str(), "HTTP::Request");
}

#[test]
fn test_statement_dispatch() {
    let loc = loc();
    assert!(matches!(
        parse_statement("import A;", &loc, 50200),
        Ok(Statement::Import(_))
    ));
    assert!(matches!(
        parse_statement("on A::U -> event e();", &loc, 50200),
        Ok(Statement::Event(_))
    ));
    assert_eq!(
        parse_statement("bogus thing;", &loc, 50200),
        Err(ParseErrorKind::UnknownStatement)
    );
}
