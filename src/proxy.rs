//! Proxy Comparator
//!
//! Generic equality and ordering never look at a type's native data.
//! Instead a value is mapped to a [`Neutral`] representation: a list of
//! primitive columns compared component by component in field order.
//!
//! Types override the mapping independently for equality and for
//! ordering. Without an override the equality proxy is the value's own
//! data, and the ordering proxy falls back to the equality proxy.
//!
use std::cmp::Ordering;

use hashbrown::HashSet;

use crate::error::Error;
use crate::object::{Data, OptionNA, Vctr};
use crate::registry::{Family, Handler, Registry, Slot};

/// Relational operators
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum RelOp {
    #[strum(to_string = "==")]
    Eq,
    #[strum(to_string = "!=")]
    Ne,
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = "<=")]
    Le,
    #[strum(to_string = ">")]
    Gt,
    #[strum(to_string = ">=")]
    Ge,
}

/// One cell of a neutral row, hashable
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Cell {
    Na,
    // distinct from NA for equality, missing everywhere else
    Nan,
    Logical(bool),
    Integer(i32),
    Double(u64),
    Character(String),
}

impl Cell {
    fn of(column: &Data, i: usize) -> Cell {
        match column {
            Data::Unspecified(_) => Cell::Na,
            Data::Logical(v) => v[i].clone().as_option().map_or(Cell::Na, Cell::Logical),
            Data::Integer(v) => v[i].clone().as_option().map_or(Cell::Na, Cell::Integer),
            Data::Double(v) => match v[i] {
                OptionNA::Some(x) if x.is_nan() => Cell::Nan,
                // -0.0 and 0.0 are the same value
                OptionNA::Some(x) if x == 0.0 => Cell::Double(0f64.to_bits()),
                OptionNA::Some(x) => Cell::Double(x.to_bits()),
                OptionNA::NA => Cell::Na,
            },
            Data::Character(v) => v[i].clone().as_option().map_or(Cell::Na, Cell::Character),
            // records are flattened before cells are read
            Data::Record(_) => Cell::Na,
        }
    }

    fn is_missing(&self) -> bool {
        matches!(self, Cell::Na | Cell::Nan)
    }

    fn partial_cmp(&self, other: &Cell) -> Result<Option<Ordering>, Error> {
        use Cell::*;
        Ok(match (self, other) {
            (l, r) if l.is_missing() || r.is_missing() => None,
            (Logical(l), Logical(r)) => Some(l.cmp(r)),
            (Integer(l), Integer(r)) => Some(l.cmp(r)),
            (Double(l), Double(r)) => f64::from_bits(*l).partial_cmp(&f64::from_bits(*r)),
            (Character(l), Character(r)) => Some(l.cmp(r)),
            (l, r) => {
                return Err(Error::Other(format!(
                    "can't compare proxy cells {l:?} and {r:?}"
                )))
            }
        })
    }

    /// Total order with missing cells last
    fn cmp_na_last(&self, other: &Cell, descending: bool) -> Result<Ordering, Error> {
        Ok(match (self, other) {
            (l, r) if l.is_missing() && r.is_missing() => Ordering::Equal,
            (l, _) if l.is_missing() => Ordering::Greater,
            (_, r) if r.is_missing() => Ordering::Less,
            (l, r) => {
                let ord = l.partial_cmp(r)?.unwrap_or(Ordering::Equal);
                if descending {
                    ord.reverse()
                } else {
                    ord
                }
            }
        })
    }
}

/// Neutral representation of a value: primitive columns of equal length
#[derive(Debug, Clone, PartialEq)]
pub struct Neutral {
    columns: Vec<Data>,
    len: usize,
}

impl Neutral {
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn row(&self, i: usize) -> Vec<Cell> {
        self.columns.iter().map(|c| Cell::of(c, i)).collect()
    }

    /// Missing only when every column is missing
    pub fn is_missing(&self, i: usize) -> bool {
        self.row(i).iter().all(Cell::is_missing)
    }

    /// Any column missing
    pub fn has_missing(&self, i: usize) -> bool {
        self.row(i).iter().any(Cell::is_missing)
    }

    /// Row equality; `None` when a cell needed to decide is missing
    pub fn eq_rows(&self, i: usize, other: &Neutral, j: usize) -> Result<Option<bool>, Error> {
        match self.cmp_rows(i, other, j)? {
            Some(ord) => Ok(Some(ord == Ordering::Equal)),
            None => Ok(None),
        }
    }

    /// Lexicographic row comparison; `None` when a missing cell is reached
    pub fn cmp_rows(&self, i: usize, other: &Neutral, j: usize) -> Result<Option<Ordering>, Error> {
        if self.columns.len() != other.columns.len() {
            return Err(Error::Other(
                "can't compare proxies with different numbers of columns".to_string(),
            ));
        }

        for (l, r) in self.row(i).iter().zip(other.row(j).iter()) {
            match l.partial_cmp(r)? {
                Some(Ordering::Equal) => continue,
                Some(ord) => return Ok(Some(ord)),
                None => return Ok(None),
            }
        }
        Ok(Some(Ordering::Equal))
    }

    fn cmp_rows_na_last(&self, i: usize, j: usize, descending: bool) -> Result<Ordering, Error> {
        for (l, r) in self.row(i).iter().zip(self.row(j).iter()) {
            match l.cmp_na_last(r, descending)? {
                Ordering::Equal => continue,
                ord => return Ok(ord),
            }
        }
        Ok(Ordering::Equal)
    }
}

impl Registry {
    /// The type's equality proxy as a vector, or the value itself
    pub fn proxy_equal(&self, x: &Vctr) -> Result<Vctr, Error> {
        match self.lookup(Family::ProxyEqual, x.class(), &Slot::Absent) {
            Some(Handler::ProxyEqual(f)) => f(self, x),
            _ => Ok(x.clone()),
        }
    }

    /// The type's ordering proxy as a vector, or its equality proxy
    pub fn proxy_compare(&self, x: &Vctr) -> Result<Vctr, Error> {
        match self.lookup(Family::ProxyCompare, x.class(), &Slot::Absent) {
            Some(Handler::ProxyCompare(f)) => f(self, x),
            _ => self.proxy_equal(x),
        }
    }

    pub fn equality_proxy(&self, x: &Vctr) -> Result<Neutral, Error> {
        let mut columns = vec![];
        self.flatten(self.proxy_equal(x)?, Family::ProxyEqual, &mut columns)?;
        Ok(Neutral {
            columns,
            len: x.len(),
        })
    }

    pub fn ordering_proxy(&self, x: &Vctr) -> Result<Neutral, Error> {
        let mut columns = vec![];
        self.flatten(self.proxy_compare(x)?, Family::ProxyCompare, &mut columns)?;
        Ok(Neutral {
            columns,
            len: x.len(),
        })
    }

    fn flatten(&self, proxy: Vctr, family: Family, columns: &mut Vec<Data>) -> Result<(), Error> {
        match proxy.into_data() {
            Data::Record(fields) => {
                for (_, field) in fields {
                    let field = match family {
                        Family::ProxyCompare => self.proxy_compare(&field)?,
                        _ => self.proxy_equal(&field)?,
                    };
                    self.flatten(field, family, columns)?;
                }
            }
            data => columns.push(data),
        }
        Ok(())
    }

    fn common_pair(&self, x: &Vctr, y: &Vctr) -> Result<(Vctr, Vctr), Error> {
        let ptype = self.common_type(&self.ptype(x)?, &self.ptype(y)?)?;
        let (x, y) = (self.cast(x, &ptype)?, self.cast(y, &ptype)?);
        self.recycle_pair(&x, &y)
    }

    /// Element-wise equality, missing where either side is missing
    pub fn equal(&self, x: &Vctr, y: &Vctr) -> Result<Vctr, Error> {
        let (x, y) = self.common_pair(x, y)?;
        let (px, py) = (self.equality_proxy(&x)?, self.equality_proxy(&y)?);
        let out = (0..x.len())
            .map(|i| Ok(px.eq_rows(i, &py, i)?.into()))
            .collect::<Result<Vec<OptionNA<bool>>, Error>>()?;
        Ok(Vctr::from(out))
    }

    /// Element-wise comparison as `-1`, `0`, `1`, missing where undecidable
    pub fn compare(&self, x: &Vctr, y: &Vctr) -> Result<Vctr, Error> {
        let (x, y) = self.common_pair(x, y)?;
        let (px, py) = (self.ordering_proxy(&x)?, self.ordering_proxy(&y)?);
        let out = (0..x.len())
            .map(|i| {
                Ok(match px.cmp_rows(i, &py, i)? {
                    Some(ord) => OptionNA::Some(ord as i32),
                    None => OptionNA::NA,
                })
            })
            .collect::<Result<Vec<OptionNA<i32>>, Error>>()?;
        Ok(Vctr::from(out))
    }

    /// Relational operators: `==`/`!=` use the equality proxy, the rest ordering
    pub fn relate(&self, op: RelOp, x: &Vctr, y: &Vctr) -> Result<Vctr, Error> {
        if matches!(op, RelOp::Eq | RelOp::Ne) {
            let eq = self.equal(x, y)?;
            let out: Vec<OptionNA<bool>> = eq
                .as_logicals()
                .unwrap_or_default()
                .iter()
                .map(|e| match op {
                    RelOp::Ne => !e.clone(),
                    _ => e.clone(),
                })
                .collect();
            return Ok(Vctr::from(out));
        }

        let cmp = self.compare(x, y)?;
        let out: Vec<OptionNA<bool>> = cmp
            .as_integers()
            .unwrap_or_default()
            .iter()
            .map(|c| {
                c.clone().map(|c| match op {
                    RelOp::Lt => c < 0,
                    RelOp::Le => c <= 0,
                    RelOp::Gt => c > 0,
                    _ => c >= 0,
                })
            })
            .collect();
        Ok(Vctr::from(out))
    }

    /// Missing-value detection through the equality proxy
    ///
    /// A record element is missing only when all of its fields are.
    ///
    pub fn detect_missing(&self, x: &Vctr) -> Result<Vec<bool>, Error> {
        let p = self.equality_proxy(x)?;
        Ok((0..p.len()).map(|i| p.is_missing(i)).collect())
    }

    /// Locations of the first occurrence of each distinct element
    pub fn unique_loc(&self, x: &Vctr) -> Result<Vec<usize>, Error> {
        let p = self.equality_proxy(x)?;
        let mut seen = HashSet::new();
        Ok((0..p.len()).filter(|i| seen.insert(p.row(*i))).collect())
    }

    pub fn unique(&self, x: &Vctr) -> Result<Vctr, Error> {
        self.slice(x, &self.unique_loc(x)?)
    }

    /// Whether each element repeats an earlier one
    pub fn duplicated(&self, x: &Vctr) -> Result<Vec<bool>, Error> {
        let p = self.equality_proxy(x)?;
        let mut seen = HashSet::new();
        Ok((0..p.len()).map(|i| !seen.insert(p.row(i))).collect())
    }

    /// Stable ordering permutation, missing values last
    pub fn order(&self, x: &Vctr, descending: bool) -> Result<Vec<usize>, Error> {
        let p = self.ordering_proxy(x)?;
        let mut idx: Vec<usize> = (0..p.len()).collect();

        // surface comparison failures after the sort rather than panicking
        let mut failure = None;
        idx.sort_by(|&i, &j| match p.cmp_rows_na_last(i, j, descending) {
            Ok(ord) => ord,
            Err(e) => {
                failure.get_or_insert(e);
                Ordering::Equal
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(idx),
        }
    }

    pub fn sort(&self, x: &Vctr, descending: bool) -> Result<Vctr, Error> {
        self.slice(x, &self.order(x, descending)?)
    }

    /// Smallest non-missing element, or an empty vector
    pub fn min(&self, x: &Vctr) -> Result<Vctr, Error> {
        self.extreme(x, false)
    }

    /// Largest non-missing element, or an empty vector
    pub fn max(&self, x: &Vctr) -> Result<Vctr, Error> {
        self.extreme(x, true)
    }

    fn extreme(&self, x: &Vctr, descending: bool) -> Result<Vctr, Error> {
        let p = self.ordering_proxy(x)?;
        let first = self
            .order(x, descending)?
            .into_iter()
            .find(|i| !p.has_missing(*i));
        match first {
            Some(i) => self.slice(x, &[i]),
            None => self.slice(x, &[]),
        }
    }
}
