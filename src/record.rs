//! Record Container
//!
//! A record is a vector whose elements are tuples: it is backed by several
//! named fields that all share one length, and that length, not the field
//! count, is the record's size. Field names and order are fixed when the
//! record is built.
//!
//! Records are ordinary registered types. The helpers here implement the
//! field-wise parts of common-type resolution and casting so that record
//! authors only decide what happens to their own class and attributes.
//!
use hashbrown::HashSet;

use crate::cast::CastCtx;
use crate::error::Error;
use crate::object::{Attrs, Data, Prototype, Storage, TypeId, Vctr};
use crate::registry::Registry;

/// Prototype of a record class with the given field prototypes
pub fn record_ptype(class: TypeId, fields: Vec<(String, Prototype)>) -> Prototype {
    Prototype::new(class, Storage::Record(fields))
}

/// Check the structural invariants of a field set
pub fn validate_fields(fields: &[(String, Vctr)]) -> Result<(), Error> {
    let Some((_, first)) = fields.first() else {
        return Err(Error::InvariantViolation(
            "a record must have at least one field".to_string(),
        ));
    };

    let mut seen = HashSet::new();
    for (name, _) in fields {
        if !seen.insert(name.as_str()) {
            return Err(Error::InvariantViolation(format!(
                "record field names must be unique, '{name}' is repeated"
            )));
        }
    }

    let n = first.len();
    if let Some((name, f)) = fields.iter().find(|(_, f)| f.len() != n) {
        return Err(Error::InvariantViolation(format!(
            "record fields must have the same length, field '{name}' has length {} not {n}",
            f.len()
        )));
    }

    Ok(())
}

fn field_names(storage: &Storage) -> Vec<&str> {
    match storage {
        Storage::Record(fields) => fields.iter().map(|(n, _)| n.as_str()).collect(),
        _ => vec![],
    }
}

/// Field-wise common type of two prototypes of record storage
///
/// Both sides must have the same field names in the same order.
///
pub fn common_fields(
    registry: &Registry,
    x: &Prototype,
    y: &Prototype,
) -> Result<Vec<(String, Prototype)>, Error> {
    let (Storage::Record(xf), Storage::Record(yf)) = (x.storage(), y.storage()) else {
        return Err(Error::incompatible_type(x.class(), y.class())
            .with_details("both sides must be records"));
    };

    if field_names(x.storage()) != field_names(y.storage()) {
        return Err(Error::incompatible_type(x.class(), y.class()).with_details(format!(
            "records have different fields: ({}) and ({})",
            field_names(x.storage()).join(", "),
            field_names(y.storage()).join(", ")
        )));
    }

    xf.iter()
        .zip(yf)
        .map(|((name, xp), (_, yp))| Ok((name.clone(), registry.common_type(xp, yp)?)))
        .collect()
}

/// Field-wise cast of a record to a prototype of record storage
pub fn cast_fields(
    ctx: &mut CastCtx<'_>,
    x: &Vctr,
    to: &Prototype,
) -> Result<Vec<(String, Vctr)>, Error> {
    let (Some(fields), Storage::Record(to_fields)) = (x.fields(), to.storage()) else {
        return Err(Error::incompatible_cast(x.class(), to.class())
            .with_details("both sides must be records"));
    };

    if field_names(&x.data().storage()) != field_names(to.storage()) {
        return Err(Error::incompatible_cast(x.class(), to.class())
            .with_details("records have different fields"));
    }

    fields
        .iter()
        .zip(to_fields)
        .map(|((name, f), (_, p))| Ok((name.clone(), ctx.cast(f, p)?)))
        .collect()
}

impl Registry {
    /// Build a record of a registered class
    ///
    /// The class's validation and restore hooks run on the new record.
    ///
    pub fn new_record(
        &self,
        class: TypeId,
        attrs: Attrs,
        fields: Vec<(String, Vctr)>,
    ) -> Result<Vctr, Error> {
        validate_fields(&fields)?;
        let x = Vctr::from_parts(class, attrs, Data::Record(fields));
        let header = x.header();
        let ty = self.vec_type(x.class())?;
        ty.restore(ty.validate(x)?, &header)
    }

    /// Replace one field, keeping the record's length
    pub fn set_field(&self, x: &Vctr, name: &str, value: Vctr) -> Result<Vctr, Error> {
        let Some(fields) = x.fields() else {
            return Err(Error::InvariantViolation(format!(
                "<{}> is not a record",
                x.class()
            )));
        };

        if x.field(name).is_none() {
            return Err(Error::InvariantViolation(format!(
                "<{}> has no field '{name}'",
                x.class()
            )));
        }

        let fields = fields
            .iter()
            .map(|(n, f)| match n == name {
                true => (n.clone(), value.clone()),
                false => (n.clone(), f.clone()),
            })
            .collect();

        self.new_record(x.class().clone(), x.attrs().clone(), fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::OptionNA;
    use crate::types::rational;

    #[test]
    fn record_length_is_field_length() {
        let r = Registry::default();
        let x = rational::rational(&r, vec![1, 2, 3], vec![2, 3, 4]).unwrap();
        assert_eq!(x.len(), 3);
        assert_eq!(x.fields().map(|f| f.len()), Some(2));
    }

    #[test]
    fn unequal_fields_are_rejected() {
        let fields = vec![
            ("a".to_string(), Vctr::from(vec![1, 2])),
            ("b".to_string(), Vctr::from(vec![1])),
        ];
        assert!(matches!(
            validate_fields(&fields),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn duplicate_and_empty_fields_are_rejected() {
        let fields = vec![
            ("a".to_string(), Vctr::from(vec![1])),
            ("a".to_string(), Vctr::from(vec![1])),
        ];
        assert!(validate_fields(&fields).is_err());
        assert!(validate_fields(&[]).is_err());
    }

    #[test]
    fn slicing_subsets_every_field() {
        let r = Registry::default();
        let x = rational::rational(&r, vec![1, 2, 3], vec![2, 3, 4]).unwrap();
        let y = r.slice(&x, &[2, 0]).unwrap();
        assert_eq!(y.len(), 2);
        assert_eq!(y.field("num"), Some(&Vctr::from(vec![3, 1])));
        assert_eq!(y.field("den"), Some(&Vctr::from(vec![4, 2])));
        assert_eq!(y.class(), x.class());
    }

    #[test]
    fn element_access_is_a_tuple() {
        let r = Registry::default();
        let x = rational::rational(&r, vec![1, 2], vec![2, 3]).unwrap();
        let e = r.get(&x, 1).unwrap();
        assert_eq!(e.to_string(), "[(num=2, den=3)]");
    }

    #[test]
    fn set_field_checks_length() {
        let r = Registry::default();
        let x = rational::rational(&r, vec![1, 2], vec![2, 3]).unwrap();
        let y = r.set_field(&x, "num", Vctr::from(vec![5, 6])).unwrap();
        assert_eq!(y.field("num"), Some(&Vctr::from(vec![5, 6])));
        assert!(r.set_field(&x, "num", Vctr::from(vec![5])).is_err());
        assert!(r.set_field(&x, "nope", Vctr::from(vec![5, 6])).is_err());
    }

    #[test]
    fn missing_record_init() {
        let r = Registry::default();
        let x = r.init(&rational::ptype(), 2).unwrap();
        assert_eq!(
            x.field("num"),
            Some(&Vctr::from(vec![OptionNA::<i32>::NA, OptionNA::NA]))
        );
    }
}
