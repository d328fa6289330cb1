use std::fmt::Display;

/// Type Identifier
///
/// Names a registered vector type. Primitive types have dedicated variants;
/// every user-defined type is identified by its class name. Identifiers are
/// totally ordered so that they can be used as stable registry keys.
///
/// ```
/// use vctr::object::TypeId;
///
/// let t: TypeId = "integer".parse().unwrap();
/// assert_eq!(t, TypeId::Integer);
///
/// let t: TypeId = "decimal".parse().unwrap();
/// assert_eq!(t, TypeId::class("decimal"));
/// ```
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TypeId {
    Unspecified,
    Logical,
    Integer,
    Double,
    Character,
    #[strum(default)]
    Class(String),
}

impl TypeId {
    pub fn class(name: &str) -> Self {
        TypeId::Class(name.to_string())
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, TypeId::Unspecified)
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, TypeId::Class(_))
    }

    /// Primitive types that participate in base arithmetic
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeId::Logical | TypeId::Integer | TypeId::Double)
    }

    pub fn name(&self) -> &str {
        match self {
            TypeId::Unspecified => "unspecified",
            TypeId::Logical => "logical",
            TypeId::Integer => "integer",
            TypeId::Double => "double",
            TypeId::Character => "character",
            TypeId::Class(name) => name.as_str(),
        }
    }
}

impl Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
