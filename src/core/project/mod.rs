//! Projects grammar types into expressions that build the equivalent host
//! types at start-up.

use indexmap::IndexSet;
use tracing::debug;

use crate::core::codegen::runtime::{TypeTag, rt};
use crate::core::decls::Export;
use crate::core::diag::GlueError;
use crate::core::ids::QualifiedId;
use crate::core::tree::Expr;
use crate::core::tree::builder::{bool_, call, id, integer, null, string, tuple, vector};
use crate::core::types::{GrammarType, TypeInfo, TypeLookup, UnitItem};

mod errors;

pub use errors::ProjectErrorKind;

/// Host enums cannot carry negative values; the grammar's "undefined" label
/// (`-1`) maps to this instead.
pub const ENUM_UNDEF_VALUE: i64 = i32::MAX as i64;

/// A host type definition ready for `register_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedType {
    pub id: QualifiedId,
    pub expr: Expr,
}

pub struct Projector<'a> {
    types: &'a dyn TypeLookup,
    // Named types currently being projected.
    in_progress: IndexSet<QualifiedId>,
}

impl<'a> Projector<'a> {
    pub fn new(types: &'a dyn TypeLookup) -> Self {
        Self {
            types,
            in_progress: IndexSet::new(),
        }
    }

    /// Projects the declared type `id`, which must be namespaced.
    pub fn project_declared(
        &mut self,
        ty: &GrammarType,
        id: &QualifiedId,
    ) -> Result<Expr, ProjectErrorKind> {
        if id.namespace().is_empty() {
            return Err(ProjectErrorKind::MissingNamespace(id.clone()));
        }
        self.project(ty, Some(id))
    }

    pub fn project(
        &mut self,
        ty: &GrammarType,
        id: Option<&QualifiedId>,
    ) -> Result<Expr, ProjectErrorKind> {
        let Some(id) = id else {
            return self.project_type(ty, None);
        };

        if !self.in_progress.insert(id.clone()) {
            return Err(ProjectErrorKind::SelfRecursive);
        }
        let result = self.project_type(ty, Some(id));
        self.in_progress.shift_remove(id);
        result
    }

    fn project_type(
        &mut self,
        ty: &GrammarType,
        id: Option<&QualifiedId>,
    ) -> Result<Expr, ProjectErrorKind> {
        match ty {
            GrammarType::Address => Ok(base_type(TypeTag::Addr)),
            GrammarType::Bool => Ok(base_type(TypeTag::Bool)),
            GrammarType::Bytes | GrammarType::String => Ok(base_type(TypeTag::String)),
            GrammarType::Interval => Ok(base_type(TypeTag::Interval)),
            GrammarType::Port => Ok(base_type(TypeTag::Port)),
            GrammarType::Real => Ok(base_type(TypeTag::Double)),
            GrammarType::SignedInteger => Ok(base_type(TypeTag::Int)),
            GrammarType::UnsignedInteger => Ok(base_type(TypeTag::Count)),
            GrammarType::Time => Ok(base_type(TypeTag::Time)),

            // Optionality is carried by the enclosing record field.
            GrammarType::Optional { inner } => self.project(inner, None),

            GrammarType::Set { element } => {
                let element = self.project(element, None)?;
                Ok(call(rt("create_table_type"), vec![element, null()]))
            }
            GrammarType::Map { key, value } => {
                let key = self.project(key, None)?;
                let value = self.project(value, None)?;
                Ok(call(rt("create_table_type"), vec![key, value]))
            }
            GrammarType::Vector { element } => {
                let element = self.project(element, None)?;
                Ok(call(rt("create_vector_type"), vec![element]))
            }

            GrammarType::Enum { labels } => {
                let id = id.ok_or(ProjectErrorKind::Anonymous("enum"))?;
                let labels = labels
                    .iter()
                    .map(|label| {
                        let value = if label.value == -1 {
                            ENUM_UNDEF_VALUE
                        } else {
                            label.value
                        };
                        tuple(vec![string(label.id.clone()), integer(value)])
                    })
                    .collect();
                Ok(call(rt("create_enum_type"), named_args(id, vector(labels))))
            }

            GrammarType::Struct { fields } => {
                let id = id.ok_or(ProjectErrorKind::Anonymous("struct"))?;
                let mut record = Vec::with_capacity(fields.len());
                for field in fields {
                    record.push(self.record_field(&field.id, &field.ty, field.optional)?);
                }
                Ok(record_type(id, record))
            }

            GrammarType::Tuple { elements } => {
                let id = id.ok_or(ProjectErrorKind::Anonymous("tuple"))?;
                let mut record = Vec::with_capacity(elements.len());
                for element in elements {
                    let name = element
                        .id
                        .as_deref()
                        .ok_or(ProjectErrorKind::UnnamedTupleElement)?;
                    record.push(self.record_field(name, &element.ty, false)?);
                }
                Ok(record_type(id, record))
            }

            GrammarType::Unit(unit) => {
                let id = id.ok_or(ProjectErrorKind::Anonymous("unit"))?;
                let mut record = Vec::new();
                for item in &unit.items {
                    match item {
                        UnitItem::Field {
                            id: Some(name),
                            ty,
                            transient: false,
                            void: false,
                        } if *ty != GrammarType::Void => {
                            record.push(self.record_field(name, ty, true)?);
                        }
                        UnitItem::Field { .. } => {}
                        UnitItem::Variable {
                            id: name,
                            ty,
                            optional,
                        } => {
                            record.push(self.record_field(name, ty, *optional)?);
                        }
                        UnitItem::Switch { .. } => {
                            debug!("Skipping switch item in unit {id} when creating host type");
                        }
                    }
                }
                Ok(record_type(id, record))
            }

            GrammarType::Named { id } => {
                let info = self.types.lookup_type(id)?;
                self.project(&info.ty, Some(&info.id))
            }

            GrammarType::Void
            | GrammarType::RegExp
            | GrammarType::Stream
            | GrammarType::Sink => Err(ProjectErrorKind::Unsupported(ty.typename())),
        }
    }

    /// `(name, type, optional)`
    fn record_field(
        &mut self,
        name: &str,
        ty: &GrammarType,
        optional: bool,
    ) -> Result<Expr, ProjectErrorKind> {
        let ty = self.project(ty, None)?;
        Ok(tuple(vec![string(name), ty, bool_(optional)]))
    }
}

fn base_type(tag: TypeTag) -> Expr {
    call(rt("create_base_type"), vec![id(tag.id())])
}

/// `(namespace, local, rest)`
fn named_args(id: &QualifiedId, rest: Expr) -> Vec<Expr> {
    vec![
        string(id.namespace().as_str()),
        string(id.local()),
        rest,
    ]
}

fn record_type(id: &QualifiedId, fields: Vec<Expr>) -> Expr {
    call(rt("create_record_type"), named_args(id, vector(fields)))
}

/// Projects every exported type and reports exports that matched nothing.
///
/// Types that fail to project are reported and left out; the rest are
/// returned in `exported` order.
pub fn project_exported_types(
    types: &dyn TypeLookup,
    exported: &[TypeInfo],
    exports: &[Export],
) -> (Vec<ProjectedType>, Vec<GlueError>) {
    let mut projector = Projector::new(types);
    let mut projected = Vec::new();
    let mut errors = Vec::new();
    let mut seen = IndexSet::new();

    for info in exported {
        seen.insert(info.id.clone());
        match projector.project_declared(&info.ty, &info.id) {
            Ok(expr) => projected.push(ProjectedType {
                id: info.id.clone(),
                expr,
            }),
            Err(reason) => errors.push(GlueError::from(
                ProjectErrorKind::CannotExport {
                    id: info.id.clone(),
                    reason: Box::new(reason),
                }
                .at(info.location.as_ref()),
            )),
        }
    }

    for export in exports {
        if seen.contains(&export.id) {
            continue;
        }
        let kind = if export.id.namespace().is_empty() {
            ProjectErrorKind::MissingNamespace(export.id.clone())
        } else {
            ProjectErrorKind::UnknownExport(export.id.clone())
        };
        errors.push(GlueError::from(kind.at(Some(&export.location))));
    }

    (projected, errors)
}

#[cfg(test)]
#[path = "../../tests/project/t_project.rs"]
mod tests;
