use crate::error::Error;
use crate::object::{OptionNA, Vctr};
use crate::registry::Registry;

use super::{MathOp, Numeric};

/// Fold to a single element; missing as soon as any element or step is
fn reduce<T: Copy>(v: &[OptionNA<T>], init: T, f: impl Fn(T, T) -> Option<T>) -> OptionNA<T> {
    v.iter()
        .try_fold(init, |acc, x| match x {
            OptionNA::Some(x) => f(acc, *x),
            OptionNA::NA => None,
        })
        .into()
}

/// Running fold; missing from the first missing element or step onward
fn accumulate<T: Copy>(v: &[OptionNA<T>], f: impl Fn(T, T) -> Option<T>) -> Vec<OptionNA<T>> {
    let mut acc: Option<T> = None;
    let mut broken = false;
    v.iter()
        .map(|x| {
            if broken {
                return OptionNA::NA;
            }

            let next = match (acc, x) {
                (_, OptionNA::NA) => None,
                (None, OptionNA::Some(x)) => Some(*x),
                (Some(a), OptionNA::Some(x)) => f(a, *x),
            };

            match next {
                Some(n) => {
                    acc = Some(n);
                    OptionNA::Some(n)
                }
                None => {
                    broken = true;
                    OptionNA::NA
                }
            }
        })
        .collect()
}

fn predicate(values: Numeric, int: fn(i32) -> bool, dbl: fn(f64) -> bool) -> Vctr {
    let out: Vec<bool> = match values {
        Numeric::Integer(v) => v
            .into_iter()
            .map(|x| x.as_option().map_or(false, int))
            .collect(),
        Numeric::Double(v) => v
            .into_iter()
            .map(|x| x.as_option().map_or(false, dbl))
            .collect(),
    };
    Vctr::from(out)
}

fn map_doubles(v: Vec<OptionNA<f64>>, f: fn(f64) -> f64) -> Numeric {
    Numeric::Double(v.into_iter().map(|x| x.map(f)).collect())
}

/// Ordinary numeric math on logical, integer and double data
///
/// `sum` and `cumsum` keep integers for logical and integer input, with
/// overflow producing a missing value, as do `abs` and `sign`. Every other
/// function computes in doubles, except the `is_*` predicates which return
/// logicals. Missing elements propagate through reductions.
///
pub fn math_base(_: &Registry, op: MathOp, x: &Vctr) -> Result<Vctr, Error> {
    let Some(values) = Numeric::of(x.data()) else {
        return Err(Error::incompatible_op(op, x.class(), None));
    };

    let out = match (op, values) {
        (MathOp::IsNan, v) => return Ok(predicate(v, |_| false, f64::is_nan)),
        (MathOp::IsFinite, v) => return Ok(predicate(v, |_| true, f64::is_finite)),
        (MathOp::IsInfinite, v) => return Ok(predicate(v, |_| false, f64::is_infinite)),

        (MathOp::Sum, Numeric::Integer(v)) => {
            Numeric::Integer(vec![reduce(&v, 0, i32::checked_add)])
        }
        (MathOp::Cumsum, Numeric::Integer(v)) => {
            Numeric::Integer(accumulate(&v, i32::checked_add))
        }
        (MathOp::Abs, Numeric::Integer(v)) => Numeric::Integer(
            v.into_iter()
                .map(|x| x.and_then(|x| OptionNA::from(x.checked_abs())))
                .collect(),
        ),
        (MathOp::Sign, Numeric::Integer(v)) => {
            Numeric::Integer(v.into_iter().map(|x| x.map(i32::signum)).collect())
        }

        (op, values) => {
            let v = values.into_doubles();
            match op {
                MathOp::Sum => Numeric::Double(vec![reduce(&v, 0.0, |a, b| Some(a + b))]),
                MathOp::Prod => Numeric::Double(vec![reduce(&v, 1.0, |a, b| Some(a * b))]),
                MathOp::Mean => {
                    let n = v.len() as f64;
                    let total = reduce(&v, 0.0, |a, b| Some(a + b));
                    Numeric::Double(vec![total.map(|t| t / n)])
                }
                MathOp::Cumsum => Numeric::Double(accumulate(&v, |a, b| Some(a + b))),
                MathOp::Cumprod => Numeric::Double(accumulate(&v, |a, b| Some(a * b))),
                MathOp::Abs => map_doubles(v, f64::abs),
                // sign(0) is 0, unlike f64::signum
                MathOp::Sign => map_doubles(v, |x| if x == 0.0 { 0.0 } else { x.signum() }),
                MathOp::Sqrt => map_doubles(v, f64::sqrt),
                MathOp::Exp => map_doubles(v, f64::exp),
                MathOp::Log => map_doubles(v, f64::ln),
                MathOp::Floor => map_doubles(v, f64::floor),
                MathOp::Ceiling => map_doubles(v, f64::ceil),
                MathOp::IsNan | MathOp::IsFinite | MathOp::IsInfinite => {
                    return Err(Error::incompatible_op(op, x.class(), None))
                }
            }
        }
    };

    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use OptionNA::*;

    fn math(op: MathOp, x: Vctr) -> Result<Vctr, Error> {
        Registry::primitives(Options::default()).math(op, &x)
    }

    #[test]
    fn integer_sums_stay_integer() {
        assert_eq!(math(MathOp::Sum, Vctr::from(vec![1, 2, 3])), Ok(Vctr::from(vec![6])));
        assert_eq!(
            math(MathOp::Sum, Vctr::from(vec![true, true, false])),
            Ok(Vctr::from(vec![2]))
        );
        assert_eq!(
            math(MathOp::Sum, Vctr::from(vec![i32::MAX, 1])),
            Ok(Vctr::from(vec![NA::<i32>]))
        );
    }

    #[test]
    fn products_are_double() {
        assert_eq!(math(MathOp::Prod, Vctr::from(vec![2, 3])), Ok(Vctr::from(vec![6.0])));
        assert_eq!(
            math(MathOp::Cumprod, Vctr::from(vec![2, 3])),
            Ok(Vctr::from(vec![2.0, 6.0]))
        );
    }

    #[test]
    fn missing_propagates_through_reductions() {
        let x = Vctr::from(vec![Some(1.0), NA, Some(2.0)]);
        assert_eq!(math(MathOp::Sum, x.clone()), Ok(Vctr::from(vec![NA::<f64>])));
        assert_eq!(
            math(MathOp::Cumsum, x),
            Ok(Vctr::from(vec![Some(1.0), NA, NA]))
        );
    }

    #[test]
    fn mean_of_integers_is_double() {
        assert_eq!(math(MathOp::Mean, Vctr::from(vec![1, 2])), Ok(Vctr::from(vec![1.5])));
    }

    #[test]
    fn sign_of_zero() {
        assert_eq!(
            math(MathOp::Sign, Vctr::from(vec![-2.5, 0.0, 3.0])),
            Ok(Vctr::from(vec![-1.0, 0.0, 1.0]))
        );
        assert_eq!(
            math(MathOp::Sign, Vctr::from(vec![-2, 0])),
            Ok(Vctr::from(vec![-1, 0]))
        );
    }

    #[test]
    fn predicates_treat_missing_as_false() {
        let x = Vctr::from(vec![Some(f64::NAN), NA, Some(f64::INFINITY), Some(1.0)]);
        assert_eq!(
            math(MathOp::IsNan, x.clone()),
            Ok(Vctr::from(vec![true, false, false, false]))
        );
        assert_eq!(
            math(MathOp::IsFinite, x.clone()),
            Ok(Vctr::from(vec![false, false, false, true]))
        );
        assert_eq!(
            math(MathOp::IsInfinite, x),
            Ok(Vctr::from(vec![false, false, true, false]))
        );
    }
}
