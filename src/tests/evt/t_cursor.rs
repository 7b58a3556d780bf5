use super::*;

fn tcp(number: u16) -> Port {
    Port::new(number, Transport::Tcp)
}

fn udp(number: u16) -> Port {
    Port::new(number, Transport::Udp)
}

#[test]
fn test_eat_token_skips_whitespace() {
    let mut cursor = Cursor::new("  protocol   analyzer X");
    cursor.eat_token("protocol").unwrap();
    assert!(cursor.eat_if("analyzer"));
    assert!(!cursor.eat_if("over"));
    assert_eq!(cursor.rest(), " X");
    assert_eq!(
        cursor.eat_token(":"),
        Err(ParseErrorKind::ExpectedToken(":".to_string()))
    );
}

#[test]
fn test_extract_id() {
    let mut cursor = Cursor::new("HTTP::Request::%done -> event");
    let id = cursor.extract_id().unwrap();
    assert_eq!(id.as_str(), "HTTP::Request::0x25_done");
    assert!(cursor.is_looking_at("->"));

    // A single `:` is not part of an identifier.
    let mut cursor = Cursor::new("HTTP: parse");
    assert_eq!(cursor.extract_id().unwrap().as_str(), "HTTP");
    assert!(cursor.is_looking_at(":"));

    let mut cursor = Cursor::new("  ;");
    assert_eq!(cursor.extract_id(), Err(ParseErrorKind::ExpectedId));
}

#[test]
fn test_extract_path_and_mime_type() {
    let mut cursor = Cursor::new(" some/dir/x.spicy;");
    assert_eq!(cursor.extract_path().unwrap(), "some/dir/x.spicy");
    assert_eq!(cursor.rest(), ";");

    let mut cursor = Cursor::new("application/pdf, replaces PDF;");
    assert_eq!(cursor.extract_mime_type().unwrap(), "application/pdf");
    assert!(cursor.is_looking_at(","));
}

#[test]
fn test_extract_int() {
    assert_eq!(Cursor::new(" 5;").extract_int(), Ok(5));
    assert_eq!(Cursor::new("-17").extract_int(), Ok(-17));
    assert_eq!(Cursor::new("+3").extract_int(), Ok(3));
    assert_eq!(
        Cursor::new("-x").extract_int(),
        Err(ParseErrorKind::ExpectedInteger)
    );
    assert!(matches!(
        Cursor::new("99999999999999999999").extract_int(),
        Err(ParseErrorKind::IntegerOutOfRange(_))
    ));
}

#[test]
fn test_extract_single_port() {
    assert_eq!(Cursor::new("80/tcp").extract_ports(), Ok(vec![tcp(80)]));
    assert_eq!(
        Cursor::new("53/udp").extract_ports(),
        Ok(vec![udp(53)])
    );
    assert_eq!(
        Cursor::new("70000/tcp").extract_ports(),
        Err(ParseErrorKind::PortOutOfRange)
    );
    assert_eq!(
        Cursor::new("80/sctp").extract_ports(),
        Err(ParseErrorKind::InvalidPort)
    );
    assert_eq!(
        Cursor::new("80").extract_ports(),
        Err(ParseErrorKind::InvalidPort)
    );
}

#[test]
fn test_extract_port_range() {
    assert_eq!(
        Cursor::new("6000-6002/tcp").extract_ports(),
        Ok(vec![tcp(6000), tcp(6001), tcp(6002)])
    );
    assert_eq!(
        Cursor::new("6000/udp-6001/udp").extract_ports(),
        Ok(vec![udp(6000), udp(6001)])
    );
    assert_eq!(
        Cursor::new("6000/tcp-6002/udp").extract_ports(),
        Err(ParseErrorKind::PortRangeProtocolMismatch)
    );
    assert_eq!(
        Cursor::new("6000-6002/tcp-6100/udp").extract_ports(),
        Err(ParseErrorKind::PortRangeProtocolMismatch)
    );
    assert_eq!(
        Cursor::new("6000-6002-6100/tcp").extract_ports(),
        Err(ParseErrorKind::PortRangeTooManyEndpoints)
    );
    assert_eq!(
        Cursor::new("6002-6000/tcp").extract_ports(),
        Err(ParseErrorKind::PortRangeInverted)
    );
}

#[test]
fn test_port_range_is_closed_interval() {
    let ports = Cursor::new("1-10/tcp").extract_ports().unwrap();
    assert_eq!(ports.len(), 10);
    assert_eq!(ports.first(), Some(&tcp(1)));
    assert_eq!(ports.last(), Some(&tcp(10)));
    assert!(ports.iter().all(|p| p.transport == Transport::Tcp));
}

#[test]
fn test_extract_expr_stops_at_top_level_separator() {
    let mut cursor = Cursor::new("f(a, b), [c, d] )");
    assert_eq!(cursor.extract_expr().unwrap(), "f(a, b)");
    cursor.eat_token(",").unwrap();
    assert_eq!(cursor.extract_expr().unwrap(), "[c, d]");
    assert!(cursor.is_looking_at(")"));
}

#[test]
fn test_extract_expr_skips_strings() {
    let mut cursor = Cursor::new("self.x == \",)\\\"\" )");
    assert_eq!(cursor.extract_expr().unwrap(), "self.x == \",)\\\"\"");
}

#[test]
fn test_extract_expr_errors() {
    assert_eq!(
        Cursor::new("a]").extract_expr(),
        Err(ParseErrorKind::UnbalancedBracket(']'))
    );
    assert_eq!(
        Cursor::new("  )").extract_expr(),
        Err(ParseErrorKind::ExpectedExpression)
    );
    assert_eq!(
        Cursor::new("\"abc").extract_expr(),
        Err(ParseErrorKind::UnterminatedString)
    );
}
