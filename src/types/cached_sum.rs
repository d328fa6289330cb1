//! Doubles carrying their own total
//!
//! The `sum` attribute depends on the data, so it is recomputed by the
//! restore hook after every slice, combination, assignment and cast
//! instead of being copied from the prototype.
//!
use crate::cast::{cast_atomic, cast_construct, CastCtx};
use crate::error::Error;
use crate::object::{Data, Prototype, Storage, TypeId, Vctr};
use crate::registry::{Registry, VecType};

pub const CLASS: &str = "cached_sum";

pub fn class() -> TypeId {
    TypeId::class(CLASS)
}

pub fn ptype() -> Prototype {
    Prototype::new(class(), Storage::Double).with_attr("sum", 0.0)
}

pub fn cached_sum(registry: &Registry, values: Vec<f64>) -> Result<Vctr, Error> {
    registry.construct(&ptype(), Vctr::from(values).into_data())
}

/// The cached total of a value
pub fn total(x: &Vctr) -> Option<f64> {
    x.attr("sum").and_then(|s| s.as_double())
}

pub struct CachedSum;

impl VecType for CachedSum {
    fn class(&self) -> TypeId {
        class()
    }

    fn ptype(&self) -> Prototype {
        ptype()
    }

    fn validate(&self, x: Vctr) -> Result<Vctr, Error> {
        match x.data() {
            Data::Double(_) => Ok(x),
            _ => Err(Error::InvariantViolation(format!(
                "<{CLASS}> must be backed by doubles"
            ))),
        }
    }

    /// Missing elements are left out of the total
    fn restore(&self, x: Vctr, to: &Prototype) -> Result<Vctr, Error> {
        let sum: f64 = x
            .as_doubles()
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.clone().as_option())
            .fold(0.0, |acc, v| acc + v);

        Ok(Vctr::from_parts(to.class().clone(), to.attrs().clone(), x.into_data())
            .with_attr("sum", sum))
    }
}

fn common_self(_: &Registry, _: &Prototype, _: &Prototype) -> Result<Prototype, Error> {
    Ok(ptype())
}

fn cast_self(ctx: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    ctx.registry().restore(x.clone(), to)
}

pub fn register(registry: &mut Registry) {
    registry.define(CachedSum);

    registry.register_common_type(class(), class(), common_self);
    registry.register_common_type(class(), TypeId::Double, common_self);
    registry.register_common_type(TypeId::Double, class(), common_self);

    registry.register_cast(class(), class(), cast_self);
    registry.register_cast(TypeId::Double, class(), cast_construct);
    registry.register_cast(class(), TypeId::Double, cast_atomic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::OptionNA;

    #[test]
    fn construction_computes_the_sum() {
        let r = Registry::default();
        let x = cached_sum(&r, vec![1.0, 2.0, 3.5]).unwrap();
        assert_eq!(total(&x), Some(6.5));
    }

    #[test]
    fn slicing_recomputes_the_sum() {
        let r = Registry::default();
        let x = cached_sum(&r, vec![1.0, 2.0, 3.5]).unwrap();
        assert_eq!(total(&r.slice(&x, &[0, 2]).unwrap()), Some(4.5));
        assert_eq!(r.ptype(&x), Ok(ptype()));
    }

    #[test]
    fn combining_and_assigning_recompute_the_sum() {
        let r = Registry::default();
        let x = cached_sum(&r, vec![1.0, 2.0]).unwrap();

        let y = r.combine(&[x.clone(), Vctr::from(vec![10.0])]).unwrap();
        assert_eq!(y.class(), &class());
        assert_eq!(total(&y), Some(13.0));

        let z = r.assign(&x, &[1], &Vctr::from(vec![5.0])).unwrap();
        assert_eq!(total(&z), Some(6.0));
        assert_eq!(total(&x), Some(3.0));
    }

    #[test]
    fn missing_values_are_skipped() {
        let r = Registry::default();
        let x = r.init(&ptype(), 2).unwrap();
        assert_eq!(total(&x), Some(0.0));

        let y = r.assign(&x, &[0], &Vctr::from(vec![OptionNA::Some(2.5)])).unwrap();
        assert_eq!(total(&y), Some(2.5));
    }
}
