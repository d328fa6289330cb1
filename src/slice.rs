//! Subsetting, initialization and the restore step
//!
//! Every structural operation builds raw data first and then hands it to
//! the type's [`VecType::restore`](crate::registry::VecType::restore) hook,
//! so data-dependent attributes never go stale.
//!
use crate::error::Error;
use crate::object::{Data, Prototype, Storage, Vctr};
use crate::registry::Registry;

impl Registry {
    /// Reattach `to`'s class and attributes to raw data through its restore hook
    pub fn restore(&self, x: Vctr, to: &Prototype) -> Result<Vctr, Error> {
        self.vec_type(to.class())?.restore(x, to)
    }

    /// User-facing construction: validate, then restore
    pub fn construct(&self, to: &Prototype, data: Data) -> Result<Vctr, Error> {
        let ty = self.vec_type(to.class())?;
        let x = ty.validate(to.with_data(data))?;
        ty.restore(x, to)
    }

    /// Zero-length prototype of a value
    pub fn ptype(&self, x: &Vctr) -> Result<Prototype, Error> {
        Ok(self.slice(x, &[])?.header())
    }

    pub fn slice(&self, x: &Vctr, indices: &[usize]) -> Result<Vctr, Error> {
        let indices: Vec<Option<usize>> = indices.iter().map(|i| Some(*i)).collect();
        self.take(x, &indices)
    }

    /// Subset with optional indices; `None` selects a missing element
    pub fn take(&self, x: &Vctr, indices: &[Option<usize>]) -> Result<Vctr, Error> {
        let data = match x.data() {
            Data::Record(fields) => {
                let len = x.len();
                if let Some(&Some(index)) = indices.iter().find(|i| matches!(i, Some(i) if *i >= len)) {
                    return Err(Error::OutOfBounds { index, len });
                }

                let fields = fields
                    .iter()
                    .map(|(name, f)| Ok((name.clone(), self.take(f, indices)?)))
                    .collect::<Result<Vec<_>, Error>>()?;
                Data::Record(fields)
            }
            data => data.take(indices)?,
        };

        let raw = Vctr::from_parts(x.class().clone(), x.attrs().clone(), data);
        self.restore(raw, &x.header())
    }

    /// A single element, as a vector of size one
    pub fn get(&self, x: &Vctr, index: usize) -> Result<Vctr, Error> {
        self.slice(x, &[index])
    }

    /// `n` missing values of a prototype's type
    pub fn init(&self, ptype: &Prototype, n: usize) -> Result<Vctr, Error> {
        let data = match ptype.storage() {
            Storage::Record(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, p)| Ok((name.clone(), self.init(p, n)?)))
                    .collect::<Result<Vec<_>, Error>>()?;
                Data::Record(fields)
            }
            storage => Data::missing(storage, n)?,
        };
        self.restore(ptype.with_data(data), ptype)
    }

    /// Broadcast a size-one vector to `n`, or check that it already has size `n`
    pub fn recycle(&self, x: &Vctr, n: usize) -> Result<Vctr, Error> {
        match x.len() {
            len if len == n => Ok(x.clone()),
            1 if self.options().recycle => self.take(x, &vec![Some(0); n]),
            len => Err(Error::IncompatibleSize { x: len, y: n }),
        }
    }

    /// Common size of two vectors under the recycling rules
    pub fn size_common(&self, x: usize, y: usize) -> Result<usize, Error> {
        match (x, y) {
            (x, y) if x == y => Ok(x),
            (1, y) if self.options().recycle => Ok(y),
            (x, 1) if self.options().recycle => Ok(x),
            (x, y) => Err(Error::IncompatibleSize { x, y }),
        }
    }

    /// Recycle a pair of vectors to their common size
    pub fn recycle_pair(&self, x: &Vctr, y: &Vctr) -> Result<(Vctr, Vctr), Error> {
        let n = self.size_common(x.len(), y.len())?;
        Ok((self.recycle(x, n)?, self.recycle(y, n)?))
    }
}
