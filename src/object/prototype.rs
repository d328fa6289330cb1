use super::attrs::{Attr, Attrs};
use super::class::TypeId;
use super::data::Data;
use super::vctr::Vctr;

/// Shape of a type's element storage
///
/// Records describe each field by its own prototype, so that an empty
/// record can be reconstructed without any element data.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Unspecified,
    Logical,
    Integer,
    Double,
    Character,
    Record(Vec<(String, Prototype)>),
}

/// Prototype
///
/// A zero-length exemplar of a type: its class, its attributes and the shape
/// of its storage. Prototypes never hold element data and are the currency
/// of common-type resolution and casting.
///
/// ```
/// use vctr::object::{Prototype, TypeId, Vctr};
///
/// let x = Vctr::from(vec![1.5, 2.5]);
/// assert_eq!(x.header(), Prototype::double());
/// assert_eq!(Prototype::double().class(), &TypeId::Double);
/// ```
///
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    class: TypeId,
    attrs: Attrs,
    storage: Storage,
}

impl Prototype {
    pub fn new(class: TypeId, storage: Storage) -> Self {
        Prototype {
            class,
            attrs: Attrs::new(),
            storage,
        }
    }

    pub fn unspecified() -> Self {
        Prototype::new(TypeId::Unspecified, Storage::Unspecified)
    }

    pub fn logical() -> Self {
        Prototype::new(TypeId::Logical, Storage::Logical)
    }

    pub fn integer() -> Self {
        Prototype::new(TypeId::Integer, Storage::Integer)
    }

    pub fn double() -> Self {
        Prototype::new(TypeId::Double, Storage::Double)
    }

    pub fn character() -> Self {
        Prototype::new(TypeId::Character, Storage::Character)
    }

    /// Prototype of a primitive type
    pub fn primitive(class: &TypeId) -> Option<Self> {
        match class {
            TypeId::Unspecified => Some(Prototype::unspecified()),
            TypeId::Logical => Some(Prototype::logical()),
            TypeId::Integer => Some(Prototype::integer()),
            TypeId::Double => Some(Prototype::double()),
            TypeId::Character => Some(Prototype::character()),
            TypeId::Class(_) => None,
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<Attr>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn class(&self) -> &TypeId {
        &self.class
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.get(name)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Attach element data to this prototype without validation
    ///
    /// This is the low-level constructor. Values that should be checked
    /// against a type's invariants go through the registry instead.
    ///
    pub fn with_data(&self, data: Data) -> Vctr {
        Vctr::from_parts(self.class.clone(), self.attrs.clone(), data)
    }
}

impl std::fmt::Display for Prototype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}", self.class)?;
        if !self.attrs.is_empty() {
            let attrs: Vec<String> = self.attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "[{}]", attrs.join(", "))?;
        }
        if let Storage::Record(fields) = &self.storage {
            let fields: Vec<String> = fields.iter().map(|(k, v)| format!("{k}:{v}")).collect();
            write!(f, "{{{}}}", fields.join(", "))?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prototypes_carry_attributes() {
        let p = Prototype::double()
            .with_attr("digits", 2)
            .with_attr("label", "price");
        assert_eq!(p.attr("digits"), Some(&Attr::Integer(2)));
        assert_eq!(p.to_string(), "<double[digits=2, label=price]>");
    }

    #[test]
    fn primitive_lookup() {
        assert_eq!(
            Prototype::primitive(&TypeId::Integer),
            Some(Prototype::integer())
        );
        assert_eq!(Prototype::primitive(&TypeId::class("x")), None);
    }
}
