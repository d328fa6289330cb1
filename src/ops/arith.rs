use crate::error::Error;
use crate::object::{OptionNA, Vctr};
use crate::registry::Registry;

use super::{ArithOp, Numeric};

fn int_op(op: ArithOp, l: i32, r: i32) -> Option<i32> {
    match op {
        ArithOp::Add => l.checked_add(r),
        ArithOp::Sub => l.checked_sub(r),
        ArithOp::Mul => l.checked_mul(r),
        ArithOp::Rem => {
            let m = l.checked_rem(r)?;
            Some(if m != 0 && (m < 0) != (r < 0) { m + r } else { m })
        }
        ArithOp::IntDiv => {
            let q = l.checked_div(r)?;
            Some(if l % r != 0 && (l < 0) != (r < 0) { q - 1 } else { q })
        }
        // always computed as doubles
        ArithOp::Div | ArithOp::Pow => None,
    }
}

fn dbl_op(op: ArithOp, l: OptionNA<f64>, r: OptionNA<f64>) -> OptionNA<f64> {
    use OptionNA::*;
    match (op, l, r) {
        // 1^y and x^0 are 1 even when the other side is missing
        (ArithOp::Pow, Some(l), _) if l == 1.0 => Some(1.0),
        (ArithOp::Pow, _, Some(r)) if r == 0.0 => Some(1.0),
        (op, Some(l), Some(r)) => Some(match op {
            ArithOp::Add => l + r,
            ArithOp::Sub => l - r,
            ArithOp::Mul => l * r,
            ArithOp::Div => l / r,
            ArithOp::Pow => l.powf(r),
            ArithOp::Rem => l - (l / r).floor() * r,
            ArithOp::IntDiv => (l / r).floor(),
        }),
        _ => NA,
    }
}

/// Element `i` of a vector recycled to a common size
#[inline]
fn at<T: Clone>(v: &[T], i: usize) -> T {
    match v.len() {
        1 => v[0].clone(),
        _ => v[i].clone(),
    }
}

/// Ordinary numeric arithmetic on logical, integer and double data
///
/// Operands are read through their data alone, so extension types can
/// delegate the operators they do not handle themselves. Logical and
/// integer operands compute as integers, with overflow and integer
/// division by zero producing missing values. `/` and `^`, or any double
/// operand, compute as doubles.
///
/// ```
/// use vctr::object::{OptionNA, Vctr};
/// use vctr::ops::ArithOp;
/// use vctr::registry::Registry;
///
/// let r = Registry::default();
/// let x = Vctr::from(vec![-5, 5, 1]);
/// let y = Vctr::from(vec![2, -2, 0]);
///
/// assert_eq!(
///     r.arith(ArithOp::IntDiv, &x, Some(&y)),
///     Ok(Vctr::from(vec![OptionNA::Some(-3), OptionNA::Some(-3), OptionNA::NA]))
/// );
/// ```
///
pub fn arith_base(
    registry: &Registry,
    op: ArithOp,
    x: &Vctr,
    y: Option<&Vctr>,
) -> Result<Vctr, Error> {
    let refuse = || Error::incompatible_op(op, x.class(), y.map(|y| y.class()));
    let lhs = Numeric::of(x.data()).ok_or_else(refuse)?;

    let Some(rhs) = y else {
        return match (op, lhs) {
            (ArithOp::Add, lhs) => Ok(lhs.into()),
            (ArithOp::Sub, Numeric::Integer(v)) => Ok(Vctr::from(
                v.into_iter()
                    .map(|x| x.and_then(|x| OptionNA::from(x.checked_neg())))
                    .collect::<Vec<OptionNA<i32>>>(),
            )),
            (ArithOp::Sub, Numeric::Double(v)) => {
                Ok(Vctr::from(v.into_iter().map(|x| -x).collect::<Vec<OptionNA<f64>>>()))
            }
            _ => Err(refuse()),
        };
    };

    let rhs = Numeric::of(rhs.data()).ok_or_else(refuse)?;
    let n = registry.size_common(lhs.len(), rhs.len())?;

    let out = match (lhs, rhs) {
        (Numeric::Integer(l), Numeric::Integer(r)) if !matches!(op, ArithOp::Div | ArithOp::Pow) => {
            Numeric::Integer(
                (0..n)
                    .map(|i| match (at(&l, i), at(&r, i)) {
                        (OptionNA::Some(l), OptionNA::Some(r)) => OptionNA::from(int_op(op, l, r)),
                        _ => OptionNA::NA,
                    })
                    .collect(),
            )
        }
        (l, r) => {
            let (l, r) = (l.into_doubles(), r.into_doubles());
            Numeric::Double((0..n).map(|i| dbl_op(op, at(&l, i), at(&r, i))).collect())
        }
    };

    Ok(out.into())
}
