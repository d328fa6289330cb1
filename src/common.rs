//! Common-Type Resolver
//!
//! Finds the prototype two values must both be cast to before they can be
//! combined. Resolution for a pair `(x, y)` tries, in order:
//!
//! 1. the exact `(x, y)` entry
//! 2. `unspecified` on either side, which yields the other side unchanged
//! 3. the `(x, default)` entry, which authors use to explain a refusal
//! 4. [`Error::IncompatibleType`]
//!
//! Three or more prototypes are folded left to right. The fold is only as
//! associative and commutative as the registered entries make it.
//!
use tracing::trace;

use crate::error::Error;
use crate::object::{Prototype, Vctr};
use crate::registry::{Family, Handler, Registry, Slot};

impl Registry {
    pub fn common_type(&self, x: &Prototype, y: &Prototype) -> Result<Prototype, Error> {
        let (xt, yt) = (x.class(), y.class());

        if let Some(Handler::CommonType(f)) =
            self.lookup(Family::CommonType, xt, &Slot::Type(yt.clone()))
        {
            trace!(x = %xt, y = %yt, "common type via exact entry");
            return f(self, x, y);
        }

        if yt.is_unspecified() {
            return Ok(x.clone());
        }

        if xt.is_unspecified() {
            return Ok(y.clone());
        }

        if let Some(Handler::CommonType(f)) = self.lookup(Family::CommonType, xt, &Slot::Default) {
            trace!(x = %xt, y = %yt, "common type via default entry");
            return f(self, x, y);
        }

        Err(Error::incompatible_type(xt, yt))
    }

    /// Fold any number of prototypes, starting from `unspecified`
    pub fn common_type_all<'a, I>(&self, ptypes: I) -> Result<Prototype, Error>
    where
        I: IntoIterator<Item = &'a Prototype>,
    {
        ptypes
            .into_iter()
            .try_fold(Prototype::unspecified(), |acc, p| self.common_type(&acc, p))
    }

    /// Common type of a set of values
    pub fn common_type_of(&self, xs: &[Vctr]) -> Result<Prototype, Error> {
        let ptypes = xs
            .iter()
            .map(|x| self.ptype(x))
            .collect::<Result<Vec<_>, Error>>()?;
        self.common_type_all(ptypes.iter())
    }
}

/// A default-entry handler that refuses with an explanation
///
/// Registering this as `(T, default)` gives authors a single place to word
/// why `T` does not combine with unlisted types.
///
pub fn refuse_common_type(
    _: &Registry,
    x: &Prototype,
    y: &Prototype,
) -> Result<Prototype, Error> {
    Err(Error::incompatible_type(x.class(), y.class()).with_details(format!(
        "<{}> only combines with the types it registers",
        x.class()
    )))
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::object::{Prototype, TypeId};
    use crate::options::Options;
    use crate::registry::Registry;

    #[test]
    fn primitives_follow_hierarchy() {
        let r = Registry::primitives(Options::default());
        let ptype = r.common_type(&Prototype::logical(), &Prototype::integer());
        assert_eq!(ptype, Ok(Prototype::integer()));

        let ptype = r.common_type(&Prototype::double(), &Prototype::integer());
        assert_eq!(ptype, Ok(Prototype::double()));
    }

    #[test]
    fn unspecified_is_a_placeholder() {
        let r = Registry::primitives(Options::default());
        let ptype = r.common_type(&Prototype::unspecified(), &Prototype::character());
        assert_eq!(ptype, Ok(Prototype::character()));

        let ptype = r.common_type(&Prototype::character(), &Prototype::unspecified());
        assert_eq!(ptype, Ok(Prototype::character()));
    }

    #[test]
    fn character_and_double_are_incompatible() {
        let r = Registry::primitives(Options::default());
        let res = r.common_type(&Prototype::character(), &Prototype::double());
        assert_eq!(
            res,
            Err(Error::incompatible_type(&TypeId::Character, &TypeId::Double))
        );
    }

    #[test]
    fn fold_starts_from_unspecified() {
        let r = Registry::primitives(Options::default());
        let ptypes = vec![
            Prototype::unspecified(),
            Prototype::logical(),
            Prototype::double(),
            Prototype::integer(),
        ];
        assert_eq!(r.common_type_all(ptypes.iter()), Ok(Prototype::double()));
        assert_eq!(r.common_type_all(std::iter::empty()), Ok(Prototype::unspecified()));
    }
}
