//! Cast Engine
//!
//! Explicit conversion of a value to a target prototype. Dispatch mirrors
//! the common-type resolver: exact `(from, to)` entry, then `unspecified`
//! input (all missing), then the `(from, default)` entry, then
//! [`Error::IncompatibleCast`].
//!
//! Handlers report elements that could not be represented faithfully
//! through [`CastCtx::report_lossy`]. These diagnostics never abort the
//! handler; what happens to them afterwards is decided once per top-level
//! cast by [`LossyPolicy`].
//!
use tracing::{trace, warn};

use crate::error::Error;
use crate::object::coercion::{coerce_all, narrow_all};
use crate::object::{Data, Prototype, Storage, TypeId, Vctr};
use crate::options::LossyPolicy;
use crate::registry::{Family, Handler, Registry, Slot};

/// One element that lost information during a cast
#[derive(Debug, Clone, PartialEq)]
pub struct LossyCast {
    pub from: TypeId,
    pub to: TypeId,
    pub location: usize,
}

/// A cast result together with its lossy-cast diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Casted {
    pub value: Vctr,
    pub lossy: Vec<LossyCast>,
}

impl Casted {
    pub fn is_lossy(&self) -> bool {
        !self.lossy.is_empty()
    }

    pub fn locations(&self) -> Vec<usize> {
        self.lossy.iter().map(|l| l.location).collect()
    }
}

/// State threaded through a cast and any casts nested inside it
pub struct CastCtx<'r> {
    registry: &'r Registry,
    lossy: Vec<LossyCast>,
}

impl<'r> CastCtx<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        CastCtx {
            registry,
            lossy: vec![],
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn report_lossy<I>(&mut self, from: &TypeId, to: &TypeId, locations: I)
    where
        I: IntoIterator<Item = usize>,
    {
        for location in locations {
            self.lossy.push(LossyCast {
                from: from.clone(),
                to: to.clone(),
                location,
            });
        }
    }

    pub fn lossy(&self) -> &[LossyCast] {
        &self.lossy
    }

    pub fn into_lossy(self) -> Vec<LossyCast> {
        self.lossy
    }

    /// Dispatch a cast, accumulating diagnostics in this context
    pub fn cast(&mut self, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
        let registry = self.registry;
        let (from, to_class) = (x.class(), to.class());

        if registry.ptype(x)? == *to {
            return Ok(x.clone());
        }

        if let Some(Handler::Cast(f)) =
            registry.lookup(Family::Cast, from, &Slot::Type(to_class.clone()))
        {
            trace!(from = %from, to = %to_class, "cast via exact entry");
            return f(self, x, to);
        }

        if from.is_unspecified() {
            return registry.init(to, x.len());
        }

        if let Some(Handler::Cast(f)) = registry.lookup(Family::Cast, from, &Slot::Default) {
            trace!(from = %from, to = %to_class, "cast via default entry");
            return f(self, x, to);
        }

        Err(Error::incompatible_cast(from, to_class))
    }

    /// Convert atomic data to another atomic storage
    ///
    /// Widening conversions are exact; narrowing ones report every element
    /// that lost information, attributed to `x`'s and `to`'s classes.
    ///
    pub fn convert(&mut self, x: &Vctr, to: &Prototype) -> Result<Data, Error> {
        let (from, to_class) = (x.class(), to.class());

        let data = match (x.data(), to.storage()) {
            (Data::Unspecified(n), storage) if !matches!(storage, Storage::Record(_)) => {
                Data::missing(storage, *n)?
            }
            (Data::Logical(v), Storage::Logical) => Data::Logical(v.clone()),
            (Data::Logical(v), Storage::Integer) => Data::Integer(coerce_all(v)),
            (Data::Logical(v), Storage::Double) => Data::Double(coerce_all(v)),
            (Data::Integer(v), Storage::Logical) => {
                let (v, lossy) = narrow_all(v);
                self.report_lossy(from, to_class, lossy);
                Data::Logical(v)
            }
            (Data::Integer(v), Storage::Integer) => Data::Integer(v.clone()),
            (Data::Integer(v), Storage::Double) => Data::Double(coerce_all(v)),
            (Data::Double(v), Storage::Logical) => {
                let (v, lossy) = narrow_all(v);
                self.report_lossy(from, to_class, lossy);
                Data::Logical(v)
            }
            (Data::Double(v), Storage::Integer) => {
                let (v, lossy) = narrow_all(v);
                self.report_lossy(from, to_class, lossy);
                Data::Integer(v)
            }
            (Data::Double(v), Storage::Double) => Data::Double(v.clone()),
            (Data::Character(v), Storage::Character) => Data::Character(v.clone()),
            _ => return Err(Error::incompatible_cast(from, to_class)),
        };

        Ok(data)
    }
}

impl Registry {
    /// Cast `x` to `to`, applying the configured lossy policy
    pub fn cast(&self, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
        Ok(self.cast_with_diagnostics(x, to)?.value)
    }

    /// Cast `x` to `to`, returning every lossy-cast diagnostic
    ///
    /// ```
    /// use vctr::object::{Prototype, Vctr};
    /// use vctr::registry::Registry;
    ///
    /// let r = Registry::default();
    /// let x = Vctr::from(vec![1.5, 2.0, 10.5]);
    /// let res = r.cast_with_diagnostics(&x, &Prototype::integer()).unwrap();
    ///
    /// assert_eq!(res.value, Vctr::from(vec![1, 2, 10]));
    /// assert_eq!(res.locations(), vec![0, 2]);
    /// ```
    ///
    pub fn cast_with_diagnostics(&self, x: &Vctr, to: &Prototype) -> Result<Casted, Error> {
        let mut ctx = CastCtx::new(self);
        let value = ctx.cast(x, to)?;
        let lossy = ctx.into_lossy();

        if !lossy.is_empty() {
            let locations: Vec<usize> = lossy.iter().map(|l| l.location).collect();
            match self.options().lossy {
                LossyPolicy::Warn => warn!(
                    from = %x.class(),
                    to = %to.class(),
                    count = lossy.len(),
                    locations = ?&locations[..locations.len().min(5)],
                    "lossy cast"
                ),
                LossyPolicy::Ignore => (),
                LossyPolicy::Error => {
                    return Err(Error::LossyCast {
                        from: x.class().clone(),
                        to: to.class().clone(),
                        locations,
                    })
                }
            }
        }

        Ok(Casted { value, lossy })
    }

    /// Cast every value to the common type of all of them
    pub fn cast_common(&self, xs: &[Vctr]) -> Result<Vec<Vctr>, Error> {
        let ptype = self.common_type_of(xs)?;
        xs.iter().map(|x| self.cast(x, &ptype)).collect()
    }
}

/// Cast handler for any pair of atomic types sharing a conversion
///
/// Data is converted with [`CastCtx::convert`] and wrapped in `to` without
/// validation. Suitable for primitives and for user types back to a
/// primitive.
///
pub fn cast_atomic(ctx: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    let data = ctx.convert(x, to)?;
    ctx.registry().restore(to.with_data(data), to)
}

/// Cast handler that validates the result through `to`'s constructor
///
/// Use for casts from a primitive into a user type.
///
pub fn cast_construct(ctx: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    let data = ctx.convert(x, to)?;
    ctx.registry().construct(to, data)
}

/// A default-entry handler that refuses with an explanation
pub fn refuse_cast(_: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    Err(
        Error::incompatible_cast(x.class(), to.class()).with_details(format!(
            "<{}> only converts to the types it registers",
            x.class()
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::OptionNA;
    use crate::options::Options;

    #[test]
    fn identity_cast_returns_input() {
        let r = Registry::primitives(Options::default());
        let x = Vctr::from(vec![1, 2]);
        assert_eq!(r.cast(&x, &Prototype::integer()), Ok(x));
    }

    #[test]
    fn narrowing_flags_only_lossy_elements() {
        let r = Registry::primitives(Options::default());
        let x = Vctr::from(vec![1.5, 2.0, 10.5]);
        let res = r.cast_with_diagnostics(&x, &Prototype::integer()).unwrap();
        assert_eq!(res.value, Vctr::from(vec![1, 2, 10]));
        assert_eq!(res.locations(), vec![0, 2]);
        assert!(res.lossy.iter().all(|l| l.from == TypeId::Double));
    }

    #[test]
    fn cast_common_promotes_every_value() {
        let r = Registry::primitives(Options::default());
        let xs = [Vctr::from(vec![true]), Vctr::unspecified(1), Vctr::from(vec![0.5])];
        assert_eq!(
            r.cast_common(&xs),
            Ok(vec![
                Vctr::from(vec![1.0]),
                Vctr::from(vec![OptionNA::<f64>::NA]),
                Vctr::from(vec![0.5]),
            ])
        );
    }

    #[test]
    fn widening_is_lossless() {
        let r = Registry::primitives(Options::default());
        let x = Vctr::from(vec![true, false]);
        let res = r.cast_with_diagnostics(&x, &Prototype::double()).unwrap();
        assert_eq!(res.value, Vctr::from(vec![1.0, 0.0]));
        assert!(!res.is_lossy());
    }

    #[test]
    fn unspecified_casts_to_missing() {
        let r = Registry::primitives(Options::default());
        let res = r.cast(&Vctr::unspecified(2), &Prototype::double());
        assert_eq!(res, Ok(Vctr::from(vec![OptionNA::<f64>::NA, OptionNA::NA])));
    }

    #[test]
    fn character_does_not_cast_to_double() {
        let r = Registry::primitives(Options::default());
        let res = r.cast(&Vctr::from(vec!["a"]), &Prototype::double());
        assert_eq!(
            res,
            Err(Error::incompatible_cast(&TypeId::Character, &TypeId::Double))
        );
    }

    #[test]
    fn lossy_policy_error_fails_the_cast() {
        let r = Registry::primitives(Options::default().with_lossy(LossyPolicy::Error));
        let res = r.cast(&Vctr::from(vec![0.5, 1.0]), &Prototype::integer());
        assert_eq!(
            res,
            Err(Error::LossyCast {
                from: TypeId::Double,
                to: TypeId::Integer,
                locations: vec![0]
            })
        );
    }
}
