use crate::error::Error;
use crate::internal_err;

use super::na::*;
use super::prototype::Storage;
use super::vctr::Vctr;

/// Element data of a vector
///
/// Atomic storages hold one sequence of elements. Records hold an
/// insertion-ordered list of named fields, each itself a vector, all sharing
/// one length.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// `n` missing values of not-yet-known type
    Unspecified(usize),
    Logical(Vec<Logical>),
    Integer(Vec<Integer>),
    Double(Vec<Double>),
    Character(Vec<Character>),
    Record(Vec<(String, Vctr)>),
}

impl Data {
    pub fn len(&self) -> usize {
        match self {
            Data::Unspecified(n) => *n,
            Data::Logical(v) => v.len(),
            Data::Integer(v) => v.len(),
            Data::Double(v) => v.len(),
            Data::Character(v) => v.len(),
            Data::Record(fields) => fields.first().map_or(0, |(_, f)| f.len()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape descriptor of this data, without any elements
    pub fn storage(&self) -> Storage {
        match self {
            Data::Unspecified(_) => Storage::Unspecified,
            Data::Logical(_) => Storage::Logical,
            Data::Integer(_) => Storage::Integer,
            Data::Double(_) => Storage::Double,
            Data::Character(_) => Storage::Character,
            Data::Record(fields) => Storage::Record(
                fields
                    .iter()
                    .map(|(name, f)| (name.clone(), f.header()))
                    .collect(),
            ),
        }
    }

    /// `n` missing elements of an atomic storage
    pub fn missing(storage: &Storage, n: usize) -> Result<Data, Error> {
        Ok(match storage {
            Storage::Unspecified => Data::Unspecified(n),
            Storage::Logical => Data::Logical(vec![OptionNA::NA; n]),
            Storage::Integer => Data::Integer(vec![OptionNA::NA; n]),
            Storage::Double => Data::Double(vec![OptionNA::NA; n]),
            Storage::Character => Data::Character(vec![OptionNA::NA; n]),
            Storage::Record(_) => return internal_err!("records are initialized field-wise"),
        })
    }

    /// Select elements of an atomic storage
    ///
    /// A `None` index produces a missing element. Indices past the end are
    /// an error rather than silently producing missing values.
    ///
    pub fn take(&self, indices: &[Option<usize>]) -> Result<Data, Error> {
        let len = self.len();
        if let Some(&Some(index)) = indices.iter().find(|i| matches!(i, Some(i) if *i >= len)) {
            return Err(Error::OutOfBounds { index, len });
        }

        fn pick<T: Clone + Default>(v: &[T], indices: &[Option<usize>]) -> Vec<T> {
            indices
                .iter()
                .map(|i| i.map_or_else(T::default, |i| v[i].clone()))
                .collect()
        }

        Ok(match self {
            Data::Unspecified(_) => Data::Unspecified(indices.len()),
            Data::Logical(v) => Data::Logical(pick(v, indices)),
            Data::Integer(v) => Data::Integer(pick(v, indices)),
            Data::Double(v) => Data::Double(pick(v, indices)),
            Data::Character(v) => Data::Character(pick(v, indices)),
            Data::Record(_) => return internal_err!("records are sliced field-wise"),
        })
    }

    /// Append atomic data of the same storage
    pub fn append(&mut self, other: Data) -> Result<(), Error> {
        match (self, other) {
            (Data::Unspecified(n), Data::Unspecified(m)) => *n += m,
            (Data::Logical(l), Data::Logical(r)) => l.extend(r),
            (Data::Integer(l), Data::Integer(r)) => l.extend(r),
            (Data::Double(l), Data::Double(r)) => l.extend(r),
            (Data::Character(l), Data::Character(r)) => l.extend(r),
            (l, r) => {
                return internal_err!(format!(
                    "can't append {:?} storage to {:?} storage",
                    r.storage(),
                    l.storage()
                ))
            }
        }
        Ok(())
    }

    /// Overwrite positions of atomic data with values of the same storage
    pub fn set(&mut self, indices: &[usize], values: Data) -> Result<(), Error> {
        let len = self.len();
        if let Some(&index) = indices.iter().find(|i| **i >= len) {
            return Err(Error::OutOfBounds { index, len });
        }

        fn put<T: Clone>(v: &mut [T], indices: &[usize], values: Vec<T>) {
            for (i, x) in indices.iter().zip(values) {
                v[*i] = x;
            }
        }

        match (self, values) {
            (Data::Unspecified(_), Data::Unspecified(_)) => (),
            (Data::Logical(l), Data::Logical(r)) => put(l, indices, r),
            (Data::Integer(l), Data::Integer(r)) => put(l, indices, r),
            (Data::Double(l), Data::Double(r)) => put(l, indices, r),
            (Data::Character(l), Data::Character(r)) => put(l, indices, r),
            _ => return internal_err!("assignment values must share the target storage"),
        }
        Ok(())
    }

    /// Whether the element at `i` of atomic data is missing
    pub fn is_missing(&self, i: usize) -> bool {
        match self {
            Data::Unspecified(_) => true,
            Data::Logical(v) => v[i].is_na(),
            Data::Integer(v) => v[i].is_na(),
            Data::Double(v) => v[i].is_missing(),
            Data::Character(v) => v[i].is_na(),
            Data::Record(fields) => fields.iter().all(|(_, f)| f.data().is_missing(i)),
        }
    }
}

impl From<Vec<Logical>> for Data {
    fn from(x: Vec<Logical>) -> Self {
        Data::Logical(x)
    }
}

impl From<Vec<Integer>> for Data {
    fn from(x: Vec<Integer>) -> Self {
        Data::Integer(x)
    }
}

impl From<Vec<Double>> for Data {
    fn from(x: Vec<Double>) -> Self {
        Data::Double(x)
    }
}

impl From<Vec<Character>> for Data {
    fn from(x: Vec<Character>) -> Self {
        Data::Character(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_with_missing_index() {
        let x = Data::Integer(vec![OptionNA::Some(1), OptionNA::Some(2)]);
        let y = x.take(&[Some(1), None]).unwrap();
        assert_eq!(y, Data::Integer(vec![OptionNA::Some(2), OptionNA::NA]));
    }

    #[test]
    fn take_out_of_bounds() {
        let x = Data::Double(vec![OptionNA::Some(1.0)]);
        assert_eq!(
            x.take(&[Some(3)]),
            Err(Error::OutOfBounds { index: 3, len: 1 })
        );
    }

    #[test]
    fn append_requires_same_storage() {
        let mut x = Data::Double(vec![OptionNA::Some(1.0)]);
        assert!(x.append(Data::Integer(vec![OptionNA::Some(1)])).is_err());
        assert!(x.append(Data::Double(vec![OptionNA::NA])).is_ok());
        assert_eq!(x.len(), 2);
    }
}
