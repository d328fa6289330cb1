use std::fmt::Display;

use super::attrs::{Attr, Attrs};
use super::class::TypeId;
use super::data::Data;
use super::na::*;
use super::prototype::Prototype;

/// Vector Instance
///
/// A prototype's class and attributes together with element data. Values
/// are immutable from the outside; combination, assignment and subsetting
/// always produce a new instance.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Vctr {
    class: TypeId,
    attrs: Attrs,
    data: Data,
}

impl Vctr {
    /// Low-level constructor, performs no validation
    pub fn from_parts(class: TypeId, attrs: Attrs, data: Data) -> Self {
        Vctr { class, attrs, data }
    }

    /// A vector of `n` missing values of unknown type
    pub fn unspecified(n: usize) -> Self {
        Vctr::from_parts(TypeId::Unspecified, Attrs::new(), Data::Unspecified(n))
    }

    /// Wrap primitive data as its own primitive type
    pub fn primitive(data: Data) -> Self {
        let class = match &data {
            Data::Unspecified(_) => TypeId::Unspecified,
            Data::Logical(_) => TypeId::Logical,
            Data::Integer(_) => TypeId::Integer,
            Data::Double(_) => TypeId::Double,
            Data::Character(_) => TypeId::Character,
            Data::Record(_) => TypeId::class("record"),
        };
        Vctr::from_parts(class, Attrs::new(), data)
    }

    /// Prototype exactly as stored on this value
    ///
    /// Data-dependent attributes are copied verbatim; use
    /// [`Registry::ptype`](crate::registry::Registry::ptype) for a prototype
    /// that has been through the type's restore hook.
    ///
    pub fn header(&self) -> Prototype {
        Prototype::new(self.class.clone(), self.data.storage()).with_attrs(self.attrs.clone())
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

    pub fn with_attr(mut self, name: &str, value: impl Into<Attr>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn into_data(self) -> Data {
        self.data
    }

    /// Drop class and attributes, keeping the underlying data
    pub fn strip(self) -> Vctr {
        Vctr::primitive(self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fields(&self) -> Option<&[(String, Vctr)]> {
        match &self.data {
            Data::Record(fields) => Some(fields.as_slice()),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Vctr> {
        self.fields()
            .and_then(|fields| fields.iter().find(|(n, _)| n == name))
            .map(|(_, f)| f)
    }

    pub fn as_logicals(&self) -> Option<&[Logical]> {
        match &self.data {
            Data::Logical(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integers(&self) -> Option<&[Integer]> {
        match &self.data {
            Data::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_doubles(&self) -> Option<&[Double]> {
        match &self.data {
            Data::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_characters(&self) -> Option<&[Character]> {
        match &self.data {
            Data::Character(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Vec<f64>> for Vctr {
    fn from(x: Vec<f64>) -> Self {
        Vctr::primitive(Data::Double(x.into_iter().map(OptionNA::Some).collect()))
    }
}

impl From<Vec<Double>> for Vctr {
    fn from(x: Vec<Double>) -> Self {
        Vctr::primitive(Data::Double(x))
    }
}

impl From<Vec<i32>> for Vctr {
    fn from(x: Vec<i32>) -> Self {
        Vctr::primitive(Data::Integer(x.into_iter().map(OptionNA::Some).collect()))
    }
}

impl From<Vec<Integer>> for Vctr {
    fn from(x: Vec<Integer>) -> Self {
        Vctr::primitive(Data::Integer(x))
    }
}

impl From<Vec<bool>> for Vctr {
    fn from(x: Vec<bool>) -> Self {
        Vctr::primitive(Data::Logical(x.into_iter().map(OptionNA::Some).collect()))
    }
}

impl From<Vec<Logical>> for Vctr {
    fn from(x: Vec<Logical>) -> Self {
        Vctr::primitive(Data::Logical(x))
    }
}

impl From<Vec<String>> for Vctr {
    fn from(x: Vec<String>) -> Self {
        Vctr::primitive(Data::Character(x.into_iter().map(OptionNA::Some).collect()))
    }
}

impl From<Vec<&str>> for Vctr {
    fn from(x: Vec<&str>) -> Self {
        Vctr::primitive(Data::Character(
            x.into_iter().map(|s| OptionNA::Some(s.to_string())).collect(),
        ))
    }
}

impl From<Vec<Character>> for Vctr {
    fn from(x: Vec<Character>) -> Self {
        Vctr::primitive(Data::Character(x))
    }
}

impl From<f64> for Vctr {
    fn from(x: f64) -> Self {
        Vctr::from(vec![x])
    }
}

impl From<i32> for Vctr {
    fn from(x: i32) -> Self {
        Vctr::from(vec![x])
    }
}

impl From<bool> for Vctr {
    fn from(x: bool) -> Self {
        Vctr::from(vec![x])
    }
}

impl Vctr {
    fn fmt_element(&self, i: usize, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.data {
            Data::Unspecified(_) => write!(f, "NA"),
            Data::Logical(v) => match v[i] {
                OptionNA::Some(true) => write!(f, "TRUE"),
                OptionNA::Some(false) => write!(f, "FALSE"),
                OptionNA::NA => write!(f, "NA"),
            },
            Data::Integer(v) => write!(f, "{}", v[i]),
            Data::Double(v) => write!(f, "{}", v[i]),
            Data::Character(v) => write!(f, "{:?}", v[i]),
            Data::Record(fields) => {
                write!(f, "(")?;
                for (j, (name, field)) in fields.iter().enumerate() {
                    if j > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}=")?;
                    field.fmt_element(i, f)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Display for Vctr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for i in 0..self.len() {
            if i > 0 {
                write!(f, ", ")?
            }
            self.fmt_element(i, f)?;
        }
        write!(f, "]")
    }
}
