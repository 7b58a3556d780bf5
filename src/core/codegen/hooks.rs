use tracing::debug;

use crate::core::decls::{Event, Import as ImportDecl, SpicyModule};
use crate::core::diag::GlueError;
use crate::core::resolve::ResolveErrorKind;
use crate::core::rewrite::wrap_try_members;
use crate::core::tree::builder::{call, id, integer, modulo, move_, not_, string, tuple};
use crate::core::tree::{
    Attribute, Block, Declaration, Engine, Expr, Global, Import, Linkage, Module, Type, UnitHook,
};

use super::runtime::{HOOKS_MODULE_PREFIX, HOST_RT, reserved_accessor, rt};
use super::{CodegenOptions, ExpressionParser};

/// Assembles the hook module for one grammar module.
pub struct HookBuilder<'a> {
    options: &'a CodegenOptions,
    parse: ExpressionParser<'a>,
    module: Module,
}

impl<'a> HookBuilder<'a> {
    pub fn new(
        spicy_module: &SpicyModule,
        imports: &[ImportDecl],
        options: &'a CodegenOptions,
        parse: ExpressionParser<'a>,
    ) -> Self {
        let mut module = Module::new(format!("{HOOKS_MODULE_PREFIX}{}", spicy_module.id));

        let mut own = Import::module(spicy_module.id.clone(), "spicy");
        own.path = Some(spicy_module.file.clone());
        module.add_import(own);
        module.add_import(Import::module(HOST_RT, "hlt"));

        let search_dirs = spicy_module.search_dirs();
        for import in imports {
            let mut directive = Import::module(import.module.clone(), "spicy");
            directive.scope = import.scope.clone();
            directive.search_dirs = search_dirs.clone();
            module.add_import(directive);
        }

        Self {
            options,
            parse,
            module,
        }
    }

    pub fn finish(self) -> Module {
        self.module
    }

    fn parse_expr(&self, text: &str, event: &Event) -> Result<Expr, GlueError> {
        (self.parse)(text, &event.location).map_err(|err| {
            ResolveErrorKind::InvalidExpression {
                expr: text.to_string(),
                reason: err.into_kind(),
            }
            .at(&event.location)
            .into()
        })
    }

    /// Adds the handler global and the hook raising `event`. Nothing is added
    /// if any part of the event fails to translate.
    pub fn add_event(&mut self, event: &Event) -> Result<(), GlueError> {
        let Some(hook) = event.hook.clone() else {
            return Err(GlueError::Internal(format!(
                "event {} has not been resolved",
                event.name
            )));
        };

        let handler = format!("__handler_{}", event.mangled_name());
        let location = event.location.to_string();
        let mut body = Block::new();

        if let Some(condition) = &event.condition {
            let cond = self.parse_expr(condition, event)?;
            body.add_if(not_(cond)).add_return();
        }

        if self.options.debug {
            body.add_expression(self.debug_message(event));
        }

        body.add_if(not_(call(rt("have_handler"), vec![id(handler.as_str())])))
            .add_return();

        body.add_local("args", Type::Vector(Box::new(Type::Named(rt("Val")))), None);

        for accessor in &event.expression_accessors {
            let value = match reserved_accessor(&accessor.expression) {
                Some(helper) => call(rt(helper), vec![string(location.as_str())]),
                None if accessor.is_reserved() => {
                    return Err(ResolveErrorKind::UnknownReservedParameter(
                        accessor.expression.clone(),
                    )
                    .at(&accessor.location)
                    .into());
                }
                None => {
                    let expr = self.parse_expr(&accessor.expression, event)?;
                    let expr = wrap_try_members(&expr, false);
                    let ty = call(
                        rt("event_arg_type"),
                        vec![
                            id(handler.as_str()),
                            integer(accessor.index as i64 - 1),
                            string(location.as_str()),
                        ],
                    );
                    call(rt("to_val"), vec![expr, ty, string(location.as_str())])
                }
            };
            body.add_member_call(id("args"), "push_back", vec![value]);
        }

        body.add_call(
            rt("raise_event"),
            vec![
                id(handler.as_str()),
                move_(id("args")),
                string(location.as_str()),
            ],
        );

        debug!("Adding hook '{}' for event {}", hook, event.name);

        self.module.add(Declaration::Global(Global {
            id: handler,
            init: call(rt("internal_handler"), vec![string(event.name.as_str())]),
            linkage: Linkage::Private,
            location: Some(event.location.clone()),
        }));
        self.module.add(Declaration::UnitHook(UnitHook {
            hook,
            body,
            engine: Engine::All,
            attributes: vec![Attribute::new("&priority", Some(integer(event.priority)))],
            location: Some(event.location.clone()),
        }));
        Ok(())
    }

    /// `debug("-> event %s(%s, ...)" % (name, args...))`. Arguments that fail
    /// to parse print as `<error>`; the failure itself is reported when the
    /// argument is marshalled.
    fn debug_message(&self, event: &Event) -> Expr {
        let placeholders = vec!["%s"; event.expression_accessors.len()].join(", ");
        let format = format!("-> event %s({placeholders})");

        let mut args = vec![string(event.name.as_str())];
        for accessor in &event.expression_accessors {
            let arg = if accessor.is_reserved() {
                string(accessor.expression.as_str())
            } else {
                match (self.parse)(&accessor.expression, &event.location) {
                    Ok(expr) => wrap_try_members(&expr, true),
                    Err(_) => string("<error>"),
                }
            };
            args.push(arg);
        }

        call(rt("debug"), vec![modulo(string(format), tuple(args))])
    }
}
