//! Links event declarations to grammar units and hooks.

use tracing::debug;

use crate::core::decls::{DeclStore, Event, ExpressionAccessor};
use crate::core::diag::{GlueError, Location};
use crate::core::ids::{PERCENT_ESCAPE, QualifiedId};
use crate::core::types::{TypeInfo, TypeLookup};

mod errors;

pub use errors::ResolveErrorKind;

/// The hook every unit runs once parsing completes.
pub fn done_hook(unit: &QualifiedId) -> QualifiedId {
    unit.join(&format!("{PERCENT_ESCAPE}done"))
}

/// Resolves every event in `decls`. Errors are collected per event; an event
/// that fails keeps its unresolved state.
pub fn populate_events(decls: &mut DeclStore, types: &dyn TypeLookup) -> Vec<GlueError> {
    let mut errors = Vec::new();

    for event in &mut decls.events {
        let info = match resolve_unit(event, types) {
            Ok(info) => info,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };

        let Some(module) = decls.spicy_modules.get_mut(&info.module_id) else {
            errors.push(GlueError::Internal(format!(
                "module {} of unit {} has not been registered",
                info.module_id, info.id
            )));
            continue;
        };
        module.evts.insert(event.file.clone());

        event.unit_type = info.ty.as_unit().cloned();
        event.unit_module_id = Some(info.module_id.clone());
        event.unit_module_path = Some(info.module_path.clone());
        event.spicy_module = Some(info.module_id.clone());
        event.expression_accessors = event
            .exprs
            .iter()
            .enumerate()
            .map(|(i, expr)| ExpressionAccessor {
                index: i + 1,
                expression: expr.clone(),
                location: event.location.clone(),
            })
            .collect();

        debug!(
            "Resolved event {} to unit {} (hook {})",
            event.name,
            info.id,
            event.hook.as_ref().map(|h| h.as_str()).unwrap_or_default()
        );
    }

    errors
}

/// Finds the unit `event.path` refers to and fills in `unit` and `hook`.
fn resolve_unit(event: &mut Event, types: &dyn TypeLookup) -> Result<TypeInfo, GlueError> {
    // The path names the unit itself: hook into `%done`.
    if let Ok(info) = types.lookup_unit(&event.path) {
        event.hook = Some(done_hook(&event.path));
        event.unit = Some(event.path.clone());
        return Ok(info);
    }

    let unit = event.path.namespace();
    if unit.is_empty() {
        return Err(ResolveErrorKind::UnitTypeMissing(event.path.clone())
            .at(&event.location)
            .into());
    }

    let info = types.lookup_unit(&unit).map_err(|reason| {
        ResolveErrorKind::UnknownUnit {
            unit: unit.clone(),
            hook: event.path.clone(),
            reason,
        }
        .at(&event.location)
    })?;

    event.hook = Some(event.path.clone());
    event.unit = Some(unit);
    Ok(info)
}

/// Checks that every unit an analyzer parses with is a known unit type.
pub fn check_analyzer_units(decls: &DeclStore, types: &dyn TypeLookup) -> Vec<GlueError> {
    let mut errors = Vec::new();
    let mut check = |kind: &'static str, name: &str, unit: &Option<QualifiedId>, location: &Location| {
        let Some(unit) = unit else {
            return;
        };
        if let Err(reason) = types.lookup_unit(unit) {
            errors.push(GlueError::from(
                ResolveErrorKind::AnalyzerUnit {
                    kind,
                    name: name.to_string(),
                    reason,
                }
                .at(location),
            ));
        }
    };

    for analyzer in &decls.protocol_analyzers {
        check("protocol", &analyzer.name, &analyzer.orig_unit, &analyzer.location);
        if analyzer.resp_unit != analyzer.orig_unit {
            check("protocol", &analyzer.name, &analyzer.resp_unit, &analyzer.location);
        }
    }
    for analyzer in &decls.file_analyzers {
        check("file", &analyzer.name, &analyzer.unit, &analyzer.location);
    }
    for analyzer in &decls.packet_analyzers {
        check("packet", &analyzer.name, &analyzer.unit, &analyzer.location);
    }

    errors
}

#[cfg(test)]
#[path = "../../tests/resolve/t_resolve.rs"]
mod tests;
