use std::path::PathBuf;

use super::*;
use crate::core::decls::{FileAnalyzer, ProtocolAnalyzer, Transport};
use crate::core::types::{GrammarType, TypeTable, UnitItem, UnitType};

fn table() -> TypeTable {
    let mut table = TypeTable::new();
    table.add_module(QualifiedId::new("HTTP"), PathBuf::from("http.spicy"));

    let unit = UnitType {
        items: vec![UnitItem::Field {
            id: Some("uri".to_string()),
            ty: GrammarType::Bytes,
            transient: false,
            void: false,
        }],
    };
    table.add_type(
        &QualifiedId::new("HTTP"),
        QualifiedId::new("HTTP::Request"),
        GrammarType::Unit(unit),
        None,
    );
    table.add_type(
        &QualifiedId::new("HTTP"),
        QualifiedId::new("HTTP::Method"),
        GrammarType::String,
        None,
    );
    table
}

fn store(events: Vec<Event>) -> DeclStore {
    let mut decls = DeclStore::new();
    decls.add_spicy_module(QualifiedId::new("HTTP"), PathBuf::from("http.spicy"));
    decls.events = events;
    decls
}

fn event(path: &str) -> Event {
    Event::new(
        QualifiedId::new(path),
        QualifiedId::new("http::request"),
        Location::new("http.evt", 3),
    )
}

#[test]
fn test_done_hook() {
    assert_eq!(
        done_hook(&QualifiedId::new("HTTP::Request")).as_str(),
        "HTTP::Request::0x25_done"
    );
}

#[test]
fn test_event_on_unit_hooks_done() {
    let mut decls = store(vec![event("HTTP::Request")]);
    let errors = populate_events(&mut decls, &table());
    assert!(errors.is_empty(), "{errors:?}");

    let event = &decls.events[0];
    assert!(event.is_resolved());
    assert_eq!(event.unit, Some(QualifiedId::new("HTTP::Request")));
    assert_eq!(
        event.hook.as_ref().map(|h| h.as_str()),
        Some("HTTP::Request::0x25_done")
    );
    assert_eq!(event.unit_module_id, Some(QualifiedId::new("HTTP")));
    assert_eq!(event.unit_module_path, Some(PathBuf::from("http.spicy")));
    assert_eq!(event.spicy_module, Some(QualifiedId::new("HTTP")));
}

#[test]
fn test_event_on_field_hooks_path() {
    let mut decls = store(vec![event("HTTP::Request::uri")]);
    assert!(populate_events(&mut decls, &table()).is_empty());

    let event = &decls.events[0];
    assert_eq!(event.unit, Some(QualifiedId::new("HTTP::Request")));
    assert_eq!(event.hook, Some(QualifiedId::new("HTTP::Request::uri")));
}

#[test]
fn test_records_evt_file_on_module() {
    let mut decls = store(vec![event("HTTP::Request")]);
    populate_events(&mut decls, &table());

    let module = &decls.spicy_modules[&QualifiedId::new("HTTP")];
    assert!(module.evts.contains(&PathBuf::from("http.evt")));
}

#[test]
fn test_accessors_are_numbered_from_one() {
    let mut e = event("HTTP::Request");
    e.exprs = vec!["$conn".to_string(), "self.uri".to_string()];
    let mut decls = store(vec![e]);
    populate_events(&mut decls, &table());

    let accessors = &decls.events[0].expression_accessors;
    let indices: Vec<usize> = accessors.iter().map(|a| a.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert!(accessors[0].is_reserved());
    assert!(!accessors[1].is_reserved());
    assert_eq!(accessors[1].location, Location::new("http.evt", 3));
}

#[test]
fn test_unqualified_path_is_missing_unit() {
    let mut decls = store(vec![event("Request")]);
    let errors = populate_events(&mut decls, &table());

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "unit type missing in hook 'Request'");
    assert_eq!(errors[0].location(), Some(&Location::new("http.evt", 3)));
    assert!(!decls.events[0].is_resolved());
}

#[test]
fn test_unknown_unit_is_reported_and_others_still_resolve() {
    let mut decls = store(vec![
        event("HTTP::Reply::status"),
        event("HTTP::Method::x"),
        event("HTTP::Request"),
    ]);
    let errors = populate_events(&mut decls, &table());

    let messages: Vec<String> = errors.iter().map(|e| e.message()).collect();
    assert_eq!(
        messages,
        vec![
            "unknown unit type 'HTTP::Reply' in hook 'HTTP::Reply::status': unknown type 'HTTP::Reply'",
            "unknown unit type 'HTTP::Method' in hook 'HTTP::Method::x': 'HTTP::Method' is not a unit type",
        ]
    );
    assert!(decls.events[2].is_resolved());
}

#[test]
fn test_unregistered_module_is_internal_error() {
    let mut decls = DeclStore::new();
    decls.events.push(event("HTTP::Request"));
    let errors = populate_events(&mut decls, &table());

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], GlueError::Internal(_)));
}

#[test]
fn test_check_analyzer_units() {
    let mut decls = DeclStore::new();
    decls.protocol_analyzers.push(ProtocolAnalyzer {
        name: "spicy::HTTP".to_string(),
        transport: Transport::Tcp,
        orig_unit: Some(QualifiedId::new("HTTP::Request")),
        resp_unit: Some(QualifiedId::new("HTTP::Reply")),
        ports: vec![],
        replaces: None,
        location: Location::new("http.evt", 4),
    });
    decls.file_analyzers.push(FileAnalyzer {
        name: "spicy::PDF".to_string(),
        unit: None,
        mime_types: vec![],
        replaces: None,
        location: Location::new("http.evt", 9),
    });

    let errors = check_analyzer_units(&decls, &table());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message(),
        "error with protocol analyzer spicy::HTTP: unknown type 'HTTP::Reply'"
    );
    assert_eq!(errors[0].location(), Some(&Location::new("http.evt", 4)));
}
