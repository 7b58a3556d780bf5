//! Grammar-language types as seen by the glue compiler.
//!
//! Types referring to other declared types do so by name
//! (`GrammarType::Named`), which keeps recursive definitions finite.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::diag::Location;
use crate::core::ids::QualifiedId;

pub mod table;

pub use table::TypeTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrammarType {
    Address,
    Bool,
    Bytes,
    String,
    Interval,
    Port,
    Real,
    SignedInteger,
    UnsignedInteger,
    Time,
    Void,
    #[serde(rename = "regexp")]
    RegExp,
    Stream,
    Sink,
    Enum {
        labels: Vec<EnumLabel>,
    },
    Optional {
        inner: Box<GrammarType>,
    },
    Set {
        element: Box<GrammarType>,
    },
    Map {
        key: Box<GrammarType>,
        value: Box<GrammarType>,
    },
    Vector {
        element: Box<GrammarType>,
    },
    Struct {
        fields: Vec<StructField>,
    },
    Tuple {
        elements: Vec<TupleElement>,
    },
    Unit(UnitType),
    Named {
        id: QualifiedId,
    },
}

impl GrammarType {
    pub fn typename(&self) -> &'static str {
        match self {
            GrammarType::Address => "addr",
            GrammarType::Bool => "bool",
            GrammarType::Bytes => "bytes",
            GrammarType::String => "string",
            GrammarType::Interval => "interval",
            GrammarType::Port => "port",
            GrammarType::Real => "real",
            GrammarType::SignedInteger => "int",
            GrammarType::UnsignedInteger => "uint",
            GrammarType::Time => "time",
            GrammarType::Void => "void",
            GrammarType::RegExp => "regexp",
            GrammarType::Stream => "stream",
            GrammarType::Sink => "sink",
            GrammarType::Enum { .. } => "enum",
            GrammarType::Optional { .. } => "optional",
            GrammarType::Set { .. } => "set",
            GrammarType::Map { .. } => "map",
            GrammarType::Vector { .. } => "vector",
            GrammarType::Struct { .. } => "struct",
            GrammarType::Tuple { .. } => "tuple",
            GrammarType::Unit(_) => "unit",
            GrammarType::Named { .. } => "named",
        }
    }

    pub fn as_unit(&self) -> Option<&UnitType> {
        match self {
            GrammarType::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn optional(inner: GrammarType) -> Self {
        GrammarType::Optional {
            inner: Box::new(inner),
        }
    }

    pub fn vector(element: GrammarType) -> Self {
        GrammarType::Vector {
            element: Box::new(element),
        }
    }

    pub fn set(element: GrammarType) -> Self {
        GrammarType::Set {
            element: Box::new(element),
        }
    }

    pub fn map(key: GrammarType, value: GrammarType) -> Self {
        GrammarType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn named(id: impl Into<QualifiedId>) -> Self {
        GrammarType::Named { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumLabel {
    pub id: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub id: String,
    #[serde(rename = "type")]
    pub ty: GrammarType,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub ty: GrammarType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitType {
    #[serde(default)]
    pub items: Vec<UnitItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum UnitItem {
    Field {
        #[serde(default)]
        id: Option<String>,
        #[serde(rename = "type")]
        ty: GrammarType,
        #[serde(default)]
        transient: bool,
        /// The field parses into `void`, e.g. a skipped literal.
        #[serde(default)]
        void: bool,
    },
    Variable {
        id: String,
        #[serde(rename = "type")]
        ty: GrammarType,
        #[serde(default)]
        optional: bool,
    },
    Switch {
        #[serde(default)]
        cases: Vec<UnitItem>,
    },
}

/// A declared grammar type and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub id: QualifiedId,
    pub ty: GrammarType,
    pub module_id: QualifiedId,
    pub module_path: PathBuf,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unknown type '{0}'")]
    Unknown(QualifiedId),

    #[error("'{0}' is not a unit type")]
    NotAUnit(QualifiedId),
}

/// Name-based access to declared grammar types.
pub trait TypeLookup {
    fn lookup_type(&self, id: &QualifiedId) -> Result<TypeInfo, LookupError>;

    /// Like `lookup_type`, but the result must be a unit.
    fn lookup_unit(&self, id: &QualifiedId) -> Result<TypeInfo, LookupError> {
        let info = self.lookup_type(id)?;
        if info.ty.as_unit().is_none() {
            return Err(LookupError::NotAUnit(id.clone()));
        }
        Ok(info)
    }
}
