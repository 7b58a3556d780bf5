use std::path::PathBuf;

use super::*;
use crate::core::diag::Location;
use crate::core::tree::format::format_expr;
use crate::core::types::{EnumLabel, LookupError, StructField, TupleElement, TypeTable, UnitType};

fn table() -> TypeTable {
    let mut table = TypeTable::new();
    table.add_module(QualifiedId::new("X"), PathBuf::from("x.spicy"));
    table
}

fn project_text(ty: &GrammarType, id: Option<&str>) -> Result<String, ProjectErrorKind> {
    let table = table();
    let id = id.map(QualifiedId::new);
    Projector::new(&table)
        .project(ty, id.as_ref())
        .map(|expr| format_expr(&expr))
}

fn base(tag: &str) -> String {
    format!("host_rt::create_base_type(host_rt::ZeekTypeTag::{tag})")
}

fn field(id: &str, ty: GrammarType) -> StructField {
    StructField {
        id: id.to_string(),
        ty,
        optional: false,
    }
}

#[test]
fn test_base_types() {
    let cases = [
        (GrammarType::Address, "Addr"),
        (GrammarType::Bool, "Bool"),
        (GrammarType::Bytes, "String"),
        (GrammarType::String, "String"),
        (GrammarType::Real, "Double"),
        (GrammarType::SignedInteger, "Int"),
        (GrammarType::UnsignedInteger, "Count"),
        (GrammarType::Time, "Time"),
        (GrammarType::Interval, "Interval"),
        (GrammarType::Port, "Port"),
    ];
    for (ty, tag) in cases {
        assert_eq!(project_text(&ty, None).unwrap(), base(tag));
    }
    assert_eq!(
        project_text(&GrammarType::optional(GrammarType::Bool), None).unwrap(),
        base("Bool")
    );
}

#[test]
fn test_containers() {
    assert_eq!(
        project_text(&GrammarType::set(GrammarType::Address), None).unwrap(),
        format!("host_rt::create_table_type({}, Null)", base("Addr"))
    );
    assert_eq!(
        project_text(
            &GrammarType::map(GrammarType::String, GrammarType::UnsignedInteger),
            None
        )
        .unwrap(),
        format!(
            "host_rt::create_table_type({}, {})",
            base("String"),
            base("Count")
        )
    );
    assert_eq!(
        project_text(&GrammarType::vector(GrammarType::Bool), None).unwrap(),
        format!("host_rt::create_vector_type({})", base("Bool"))
    );
}

#[test]
fn test_enum_maps_undef_label() {
    let ty = GrammarType::Enum {
        labels: vec![
            EnumLabel {
                id: "GET".to_string(),
                value: 0,
            },
            EnumLabel {
                id: "Undef".to_string(),
                value: -1,
            },
        ],
    };
    assert_eq!(
        project_text(&ty, Some("X::Method")).unwrap(),
        "host_rt::create_enum_type(\"X\", \"Method\", [(\"GET\", 0), (\"Undef\", 2147483647)])"
    );
    assert_eq!(
        project_text(&ty, None),
        Err(ProjectErrorKind::Anonymous("enum"))
    );
}

#[test]
fn test_struct_and_tuple() {
    let ty = GrammarType::Struct {
        fields: vec![
            field("a", GrammarType::UnsignedInteger),
            StructField {
                optional: true,
                ..field("b", GrammarType::Bool)
            },
        ],
    };
    assert_eq!(
        project_text(&ty, Some("X::S")).unwrap(),
        format!(
            "host_rt::create_record_type(\"X\", \"S\", [(\"a\", {}, False), (\"b\", {}, True)])",
            base("Count"),
            base("Bool")
        )
    );

    let ty = GrammarType::Tuple {
        elements: vec![TupleElement {
            id: Some("x".to_string()),
            ty: GrammarType::Real,
        }],
    };
    assert_eq!(
        project_text(&ty, Some("X::T")).unwrap(),
        format!(
            "host_rt::create_record_type(\"X\", \"T\", [(\"x\", {}, False)])",
            base("Double")
        )
    );

    let ty = GrammarType::Tuple {
        elements: vec![TupleElement {
            id: None,
            ty: GrammarType::Real,
        }],
    };
    assert_eq!(
        project_text(&ty, Some("X::T")),
        Err(ProjectErrorKind::UnnamedTupleElement)
    );
}

#[test]
fn test_unit_items() {
    let ty = GrammarType::Unit(UnitType {
        items: vec![
            UnitItem::Field {
                id: Some("uri".to_string()),
                ty: GrammarType::Bytes,
                transient: false,
                void: false,
            },
            UnitItem::Field {
                id: Some("skip".to_string()),
                ty: GrammarType::Bytes,
                transient: true,
                void: false,
            },
            UnitItem::Field {
                id: None,
                ty: GrammarType::Bytes,
                transient: false,
                void: false,
            },
            UnitItem::Variable {
                id: "count".to_string(),
                ty: GrammarType::UnsignedInteger,
                optional: false,
            },
            UnitItem::Switch { cases: vec![] },
        ],
    });
    assert_eq!(
        project_text(&ty, Some("X::U")).unwrap(),
        format!(
            "host_rt::create_record_type(\"X\", \"U\", [(\"uri\", {}, True), (\"count\", {}, False)])",
            base("String"),
            base("Count")
        )
    );
}

#[test]
fn test_unsupported_types() {
    assert_eq!(
        project_text(&GrammarType::RegExp, None),
        Err(ProjectErrorKind::Unsupported("regexp"))
    );
    assert_eq!(
        project_text(&GrammarType::vector(GrammarType::Sink), None),
        Err(ProjectErrorKind::Unsupported(GrammarType::Sink.typename()))
    );
}

#[test]
fn test_self_recursive_type() {
    let mut table = table();
    table.add_type(
        &QualifiedId::new("X"),
        QualifiedId::new("X::Node"),
        GrammarType::Struct {
            fields: vec![field("child", GrammarType::named("X::Node"))],
        },
        None,
    );
    let info = table.lookup_type(&QualifiedId::new("X::Node")).unwrap();

    let mut projector = Projector::new(&table);
    assert_eq!(
        projector.project_declared(&info.ty, &info.id),
        Err(ProjectErrorKind::SelfRecursive)
    );
}

#[test]
fn test_named_type_is_resolved() {
    let mut table = table();
    table.add_type(
        &QualifiedId::new("X"),
        QualifiedId::new("X::Inner"),
        GrammarType::Struct {
            fields: vec![field("v", GrammarType::Bool)],
        },
        None,
    );
    let outer = GrammarType::Struct {
        fields: vec![
            field("a", GrammarType::named("X::Inner")),
            field("b", GrammarType::named("X::Inner")),
        ],
    };

    let expr = Projector::new(&table)
        .project_declared(&outer, &QualifiedId::new("X::Outer"))
        .unwrap();
    let inner = format!(
        "host_rt::create_record_type(\"X\", \"Inner\", [(\"v\", {}, False)])",
        base("Bool")
    );
    assert_eq!(
        format_expr(&expr),
        format!(
            "host_rt::create_record_type(\"X\", \"Outer\", [(\"a\", {inner}, False), (\"b\", {inner}, False)])"
        )
    );

    assert_eq!(
        Projector::new(&table).project(&GrammarType::named("X::Nope"), None),
        Err(ProjectErrorKind::Lookup(LookupError::Unknown(QualifiedId::new(
            "X::Nope"
        ))))
    );
}

#[test]
fn test_exported_types_report_errors() {
    let mut table = table();
    table.add_type(
        &QualifiedId::new("X"),
        QualifiedId::new("X::Flag"),
        GrammarType::Bool,
        None,
    );
    table.add_type(
        &QualifiedId::new("X"),
        QualifiedId::new("X::Re"),
        GrammarType::RegExp,
        Some(Location::new("x.spicy", 5)),
    );
    table.add_type(
        &QualifiedId::new("X"),
        QualifiedId::new("Bare"),
        GrammarType::Bool,
        None,
    );
    for id in ["X::Flag", "X::Re", "Bare"] {
        table.mark_exported(&QualifiedId::new(id));
    }

    let exports = vec![Export {
        id: QualifiedId::new("X::Gone"),
        location: Location::new("x.evt", 2),
    }];
    let (projected, errors) = project_exported_types(&table, &table.types(true), &exports);

    let ids: Vec<&str> = projected.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["X::Flag"]);
    assert_eq!(format_expr(&projected[0].expr), base("Bool"));

    let messages: Vec<String> = errors.iter().map(|e| e.message()).collect();
    assert_eq!(
        messages,
        vec![
            "cannot export type 'X::Re': type 'regexp' not supported".to_string(),
            "cannot export type 'Bare': exported type must provide namespace: Bare".to_string(),
            "unknown type exported: X::Gone".to_string(),
        ]
    );
    assert_eq!(errors[0].location(), Some(&Location::new("x.spicy", 5)));
    assert_eq!(errors[1].location(), None);
    assert_eq!(errors[2].location(), Some(&Location::new("x.evt", 2)));
}

#[test]
fn test_unqualified_unknown_export_needs_namespace() {
    let table = table();
    let exports = vec![
        Export {
            id: QualifiedId::new("Foo"),
            location: Location::new("x.evt", 1),
        },
        Export {
            id: QualifiedId::new("X::Gone"),
            location: Location::new("x.evt", 2),
        },
    ];
    let (projected, errors) = project_exported_types(&table, &table.types(true), &exports);
    assert!(projected.is_empty());

    let messages: Vec<String> = errors.iter().map(|e| e.message()).collect();
    assert_eq!(
        messages,
        vec![
            "exported type must provide namespace: Foo".to_string(),
            "unknown type exported: X::Gone".to_string(),
        ]
    );
    assert_eq!(errors[0].location(), Some(&Location::new("x.evt", 1)));
}
