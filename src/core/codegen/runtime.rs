//! Names of the host runtime symbols generated code refers to.

use enum_display::EnumDisplay;

use crate::core::ids::QualifiedId;

/// The host runtime module every generated module imports.
pub const HOST_RT: &str = "host_rt";

/// The grammar compiler's base module.
pub const HILTI: &str = "hilti";

pub const INIT_MODULE: &str = "host_init";
pub const PREINIT_FUNCTION: &str = "host_preinit";
pub const HOOKS_MODULE_PREFIX: &str = "spicy_hooks_";

/// `host_rt::<name>`
pub fn rt(name: &str) -> QualifiedId {
    QualifiedId::new(HOST_RT).join(name)
}

/// `hilti::<name>`
pub fn hilti(name: &str) -> QualifiedId {
    QualifiedId::new(HILTI).join(name)
}

/// Host type tags understood by `create_base_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum TypeTag {
    #[display("Addr")]
    Addr,
    #[display("Bool")]
    Bool,
    #[display("Count")]
    Count,
    #[display("Double")]
    Double,
    #[display("Int")]
    Int,
    #[display("Interval")]
    Interval,
    #[display("Port")]
    Port,
    #[display("String")]
    String,
    #[display("Time")]
    Time,
}

impl TypeTag {
    /// `host_rt::ZeekTypeTag::<Tag>`
    pub fn id(self) -> QualifiedId {
        rt("ZeekTypeTag").join(&self.to_string())
    }
}

/// Reserved event arguments and the runtime helper producing each.
pub fn reserved_accessor(expression: &str) -> Option<&'static str> {
    match expression {
        "$conn" => Some("current_conn"),
        "$file" => Some("current_file"),
        "$packet" => Some("current_packet"),
        "$is_orig" => Some("current_is_orig"),
        _ => None,
    }
}
