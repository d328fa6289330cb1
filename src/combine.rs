//! Combination and replacement
//!
//! Both operations resolve a common type first, cast every operand to it,
//! and only then touch data. Inputs are never modified: a failure at any
//! step leaves nothing half-written.
//!
use crate::error::Error;
use crate::internal_err;
use crate::object::{Data, Prototype, Storage, Vctr};
use crate::registry::Registry;

impl Registry {
    /// Concatenate values of possibly different types
    ///
    /// ```
    /// use vctr::object::{OptionNA, Vctr};
    /// use vctr::registry::Registry;
    ///
    /// let r = Registry::default();
    /// let x = r.combine(&[
    ///     Vctr::from(vec![true]),
    ///     Vctr::from(vec![2]),
    ///     Vctr::unspecified(1),
    /// ]);
    ///
    /// assert_eq!(x, Ok(Vctr::from(vec![OptionNA::Some(1), OptionNA::Some(2), OptionNA::NA])));
    /// ```
    ///
    pub fn combine(&self, xs: &[Vctr]) -> Result<Vctr, Error> {
        let ptype = self.common_type_of(xs)?;
        let parts = xs
            .iter()
            .map(|x| self.cast(x, &ptype))
            .collect::<Result<Vec<_>, Error>>()?;
        self.concat(&ptype, parts)
    }

    /// Concatenate values already cast to `ptype`
    fn concat(&self, ptype: &Prototype, parts: Vec<Vctr>) -> Result<Vctr, Error> {
        let data = match ptype.storage() {
            Storage::Record(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (name, field_ptype) in fields {
                    let columns = parts
                        .iter()
                        .map(|p| -> Result<Vctr, Error> {
                            match p.field(name) {
                                Some(f) => Ok(f.clone()),
                                None => internal_err!(format!("missing record field '{name}'")),
                            }
                        })
                        .collect::<Result<Vec<_>, Error>>()?;
                    out.push((name.clone(), self.concat(field_ptype, columns)?));
                }
                Data::Record(out)
            }
            storage => {
                let mut data = Data::missing(storage, 0)?;
                for part in parts {
                    data.append(part.into_data())?;
                }
                data
            }
        };

        self.restore(ptype.with_data(data), ptype)
    }

    /// Replace the elements of `x` at `indices` with `value`
    ///
    /// `x` and `value` are cast to their common type, so the result may be of
    /// a richer type than `x`. A size-one `value` is recycled over all
    /// indices.
    ///
    pub fn assign(&self, x: &Vctr, indices: &[usize], value: &Vctr) -> Result<Vctr, Error> {
        let ptype = self.common_type(&self.ptype(x)?, &self.ptype(value)?)?;
        let x = self.cast(x, &ptype)?;
        let value = self.recycle(&self.cast(value, &ptype)?, indices.len())?;
        self.overwrite(&x, indices, &value)
    }

    fn overwrite(&self, x: &Vctr, indices: &[usize], value: &Vctr) -> Result<Vctr, Error> {
        let len = x.len();
        if let Some(&index) = indices.iter().find(|i| **i >= len) {
            return Err(Error::OutOfBounds { index, len });
        }

        let data = match x.data() {
            Data::Record(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (name, field) in fields {
                    let Some(replacement) = value.field(name) else {
                        return internal_err!(format!("missing record field '{name}'"));
                    };
                    out.push((name.clone(), self.overwrite(field, indices, replacement)?));
                }
                Data::Record(out)
            }
            data => {
                let mut data = data.clone();
                data.set(indices, value.data().clone())?;
                data
            }
        };

        let raw = Vctr::from_parts(x.class().clone(), x.attrs().clone(), data);
        self.restore(raw, &x.header())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::object::{OptionNA, TypeId, Vctr};
    use crate::registry::Registry;

    #[test]
    fn combine_promotes_to_common_type() {
        let r = Registry::default();
        let x = r.combine(&[Vctr::from(vec![1, 2]), Vctr::from(vec![0.5])]);
        assert_eq!(x, Ok(Vctr::from(vec![1.0, 2.0, 0.5])));
    }

    #[test]
    fn combine_nothing_is_unspecified() {
        let r = Registry::default();
        assert_eq!(r.combine(&[]), Ok(Vctr::unspecified(0)));
    }

    #[test]
    fn combine_incompatible_fails() {
        let r = Registry::default();
        let x = r.combine(&[Vctr::from(vec![1]), Vctr::from(vec!["a"])]);
        assert_eq!(
            x,
            Err(Error::incompatible_type(&TypeId::Integer, &TypeId::Character))
        );
    }

    #[test]
    fn assign_recycles_and_promotes() {
        let r = Registry::default();
        let x = Vctr::from(vec![1, 2, 3]);
        let y = r.assign(&x, &[0, 2], &Vctr::from(vec![0.5])).unwrap();
        assert_eq!(y, Vctr::from(vec![0.5, 2.0, 0.5]));

        // input untouched
        assert_eq!(x, Vctr::from(vec![1, 2, 3]));
    }

    #[test]
    fn assign_missing() {
        let r = Registry::default();
        let x = Vctr::from(vec![1, 2]);
        let y = r.assign(&x, &[1], &Vctr::unspecified(1)).unwrap();
        assert_eq!(y, Vctr::from(vec![OptionNA::Some(1), OptionNA::NA]));
    }

    #[test]
    fn assign_out_of_bounds() {
        let r = Registry::default();
        let x = Vctr::from(vec![1, 2]);
        assert_eq!(
            r.assign(&x, &[5], &Vctr::from(vec![1])),
            Err(Error::OutOfBounds { index: 5, len: 2 })
        );
    }
}
