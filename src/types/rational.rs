//! Rational numbers
//!
//! A record of integer numerators and denominators. Values are stored as
//! given, so `2/4` and `1/2` have different fields; equality compares them
//! in lowest terms while ordering compares their quotients.
//!
use crate::cast::{refuse_cast, CastCtx};
use crate::common::refuse_common_type;
use crate::error::Error;
use crate::object::{Attrs, Data, OptionNA, Prototype, TypeId, Vctr};
use crate::ops::ArithOp;
use crate::record::{cast_fields, common_fields, record_ptype};
use crate::registry::{Registry, Slot, VecType};

pub const CLASS: &str = "rational";

pub fn class() -> TypeId {
    TypeId::class(CLASS)
}

pub fn ptype() -> Prototype {
    record_ptype(
        class(),
        vec![
            ("num".to_string(), Prototype::integer()),
            ("den".to_string(), Prototype::integer()),
        ],
    )
}

/// Build a rational vector from numerators and denominators
///
/// ```
/// use vctr::registry::Registry;
/// use vctr::types::rational::rational;
///
/// let r = Registry::default();
/// let x = rational(&r, vec![1, 2], vec![2, 4]).unwrap();
/// assert_eq!(x.to_string(), "[(num=1, den=2), (num=2, den=4)]");
///
/// assert!(rational(&r, vec![1], vec![0]).is_err());
/// ```
///
pub fn rational(registry: &Registry, num: Vec<i32>, den: Vec<i32>) -> Result<Vctr, Error> {
    registry.new_record(
        class(),
        Attrs::new(),
        vec![
            ("num".to_string(), Vctr::from(num)),
            ("den".to_string(), Vctr::from(den)),
        ],
    )
}

pub struct Rational;

impl VecType for Rational {
    fn class(&self) -> TypeId {
        class()
    }

    fn ptype(&self) -> Prototype {
        ptype()
    }

    fn validate(&self, x: Vctr) -> Result<Vctr, Error> {
        let names: Vec<&str> = x
            .fields()
            .unwrap_or_default()
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();

        if names != ["num", "den"] {
            return Err(Error::InvariantViolation(format!(
                "<{CLASS}> must have fields (num, den), found ({})",
                names.join(", ")
            )));
        }

        let (Some(_), Some(den)) = (integers(&x, "num"), integers(&x, "den")) else {
            return Err(Error::InvariantViolation(format!(
                "<{CLASS}> fields must be integers"
            )));
        };

        if let Some(i) = den.iter().position(|d| *d == OptionNA::Some(0)) {
            return Err(Error::InvariantViolation(format!(
                "<{CLASS}> denominators must be non-zero, element {i} is zero"
            )));
        }

        Ok(x)
    }
}

fn integers<'a>(x: &'a Vctr, name: &str) -> Option<&'a [OptionNA<i32>]> {
    x.field(name).filter(|f| f.class() == &TypeId::Integer)?.as_integers()
}

/// Element-wise `(num, den)`, `None` where either is missing
fn pairs(x: &Vctr) -> Result<Vec<Option<(i128, i128)>>, Error> {
    let (Some(num), Some(den)) = (integers(x, "num"), integers(x, "den")) else {
        return Err(Error::InvariantViolation(format!(
            "<{}> is not a valid <{CLASS}>",
            x.class()
        )));
    };

    Ok(num
        .iter()
        .zip(den)
        .map(|(n, d)| match (n, d) {
            (OptionNA::Some(n), OptionNA::Some(d)) => Some((*n as i128, *d as i128)),
            _ => None,
        })
        .collect())
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Lowest terms with a positive denominator; `None` if zero or out of range
fn reduce(num: i128, den: i128) -> Option<(i32, i32)> {
    if den == 0 {
        return None;
    }

    let g = gcd(num, den);
    let (num, den) = match den < 0 {
        true => (-num / g, -den / g),
        false => (num / g, den / g),
    };

    Some((i32::try_from(num).ok()?, i32::try_from(den).ok()?))
}

fn split(values: impl Iterator<Item = Option<(i32, i32)>>) -> (Vctr, Vctr) {
    let (num, den): (Vec<OptionNA<i32>>, Vec<OptionNA<i32>>) = values
        .map(|p| match p {
            Some((n, d)) => (OptionNA::Some(n), OptionNA::Some(d)),
            None => (OptionNA::NA, OptionNA::NA),
        })
        .unzip();
    (Vctr::from(num), Vctr::from(den))
}

fn from_reduced(
    registry: &Registry,
    values: impl Iterator<Item = Option<(i32, i32)>>,
) -> Result<Vctr, Error> {
    let (num, den) = split(values);
    registry.new_record(
        class(),
        Attrs::new(),
        vec![("num".to_string(), num), ("den".to_string(), den)],
    )
}

fn proxy_equal(_: &Registry, x: &Vctr) -> Result<Vctr, Error> {
    let (num, den) = split(
        pairs(x)?
            .into_iter()
            // keep the stored pair when lowest terms leave the i32 range
            .map(|p| p.map(|(n, d)| reduce(n, d).unwrap_or((n as i32, d as i32)))),
    );
    Ok(Vctr::primitive(Data::Record(vec![
        ("num".to_string(), num),
        ("den".to_string(), den),
    ])))
}

fn quotients(x: &Vctr) -> Result<Vec<OptionNA<f64>>, Error> {
    Ok(pairs(x)?
        .into_iter()
        .map(|p| OptionNA::from(p.map(|(n, d)| n as f64 / d as f64)))
        .collect())
}

fn proxy_compare(_: &Registry, x: &Vctr) -> Result<Vctr, Error> {
    Ok(Vctr::from(quotients(x)?))
}

fn common_self(registry: &Registry, x: &Prototype, y: &Prototype) -> Result<Prototype, Error> {
    Ok(record_ptype(class(), common_fields(registry, x, y)?))
}

fn common_rational(_: &Registry, _: &Prototype, _: &Prototype) -> Result<Prototype, Error> {
    Ok(ptype())
}

fn common_double(_: &Registry, _: &Prototype, _: &Prototype) -> Result<Prototype, Error> {
    Ok(Prototype::double())
}

fn cast_self(ctx: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    let fields = cast_fields(ctx, x, to)?;
    ctx.registry()
        .new_record(to.class().clone(), to.attrs().clone(), fields)
}

fn cast_from_integer(ctx: &mut CastCtx<'_>, x: &Vctr, _: &Prototype) -> Result<Vctr, Error> {
    let values: Vec<Option<(i32, i32)>> = x
        .as_integers()
        .unwrap_or_default()
        .iter()
        .map(|n| n.clone().as_option().map(|n| (n, 1)))
        .collect();
    from_reduced(ctx.registry(), values.into_iter())
}

fn cast_to_double(ctx: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    ctx.registry().restore(to.with_data(Data::Double(quotients(x)?)), to)
}

/// Truncates toward zero, reporting quotients that were not whole
fn cast_to_integer(ctx: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    let mut lossy = vec![];
    let out: Vec<OptionNA<i32>> = pairs(x)?
        .into_iter()
        .enumerate()
        .map(|(i, p)| match p {
            Some((n, d)) if d != 0 => {
                if n % d != 0 {
                    lossy.push(i);
                }
                OptionNA::from(i32::try_from(n / d).ok())
            }
            _ => OptionNA::NA,
        })
        .collect();

    ctx.report_lossy(x.class(), to.class(), lossy);
    ctx.registry().restore(to.with_data(Data::Integer(out)), to)
}

fn refuse_double(_: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    Err(Error::incompatible_cast(x.class(), to.class())
        .with_details("doubles have no exact rational representation"))
}

fn arith(registry: &Registry, op: ArithOp, x: &Vctr, y: Option<&Vctr>) -> Result<Vctr, Error> {
    let refuse = || Error::incompatible_op(op, x.class(), y.map(|y| y.class()));

    let Some(y) = y else {
        return match op {
            ArithOp::Add => Ok(x.clone()),
            ArithOp::Sub => from_reduced(
                registry,
                pairs(x)?
                    .into_iter()
                    .map(|p| p.and_then(|(n, d)| reduce(-n, d))),
            ),
            _ => Err(refuse()),
        };
    };

    if !matches!(op, ArithOp::Add | ArithOp::Sub | ArithOp::Mul | ArithOp::Div) {
        return Err(refuse());
    }

    let (lhs, rhs) = (registry.cast(x, &ptype())?, registry.cast(y, &ptype())?);
    let (lhs, rhs) = registry.recycle_pair(&lhs, &rhs)?;
    let values = pairs(&lhs)?
        .into_iter()
        .zip(pairs(&rhs)?)
        .map(|(l, r)| {
            let ((a, b), (c, d)) = (l?, r?);
            match op {
                ArithOp::Add => reduce(a * d + c * b, b * d),
                ArithOp::Sub => reduce(a * d - c * b, b * d),
                ArithOp::Mul => reduce(a * c, b * d),
                _ => reduce(a * d, b * c),
            }
        });

    from_reduced(registry, values)
}

pub fn register(registry: &mut Registry) {
    registry.define(Rational);

    registry.register_common_type(class(), class(), common_self);
    registry.register_common_type(class(), TypeId::Integer, common_rational);
    registry.register_common_type(TypeId::Integer, class(), common_rational);
    registry.register_common_type(class(), TypeId::Double, common_double);
    registry.register_common_type(TypeId::Double, class(), common_double);
    registry.register_common_type(class(), Slot::Default, refuse_common_type);

    registry.register_cast(class(), class(), cast_self);
    registry.register_cast(TypeId::Integer, class(), cast_from_integer);
    registry.register_cast(TypeId::Double, class(), refuse_double);
    registry.register_cast(class(), TypeId::Double, cast_to_double);
    registry.register_cast(class(), TypeId::Integer, cast_to_integer);
    registry.register_cast(class(), Slot::Default, refuse_cast);

    registry.register_proxy_equal(class(), proxy_equal);
    registry.register_proxy_compare(class(), proxy_compare);

    registry.register_arith(class(), class(), arith);
    registry.register_arith(class(), TypeId::Integer, arith);
    registry.register_arith(TypeId::Integer, class(), arith);
    registry.register_arith(class(), Slot::Absent, arith);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::RelOp;

    #[test]
    fn equal_in_lowest_terms() {
        let r = Registry::default();
        let x = rational(&r, vec![1], vec![2]).unwrap();
        let y = rational(&r, vec![2], vec![4]).unwrap();

        // field by field they differ
        assert_ne!(x.field("num"), y.field("num"));
        assert_eq!(r.equal(&x, &y), Ok(Vctr::from(vec![true])));
    }

    #[test]
    fn unique_uses_the_equality_proxy() {
        let r = Registry::default();
        let x = rational(&r, vec![1, 2, -3, 3], vec![2, 4, 6, -6]).unwrap();
        assert_eq!(r.unique_loc(&x), Ok(vec![0, 2]));
    }

    #[test]
    fn ordering_uses_quotients() {
        let r = Registry::default();
        let x = rational(&r, vec![1, 1, 2], vec![2, 3, 4]).unwrap();
        assert_eq!(r.order(&x, false), Ok(vec![1, 0, 2]));
        assert_eq!(
            r.relate(RelOp::Lt, &x, &rational(&r, vec![1], vec![2]).unwrap()),
            Ok(Vctr::from(vec![false, true, false]))
        );
    }

    #[test]
    fn combines_with_integer_and_double() {
        let r = Registry::default();
        let x = rational(&r, vec![1], vec![2]).unwrap();

        let res = r.combine(&[x.clone(), Vctr::from(vec![3])]).unwrap();
        assert_eq!(res, rational(&r, vec![1, 3], vec![2, 1]).unwrap());

        let res = r.combine(&[Vctr::from(vec![0.25]), x]).unwrap();
        assert_eq!(res, Vctr::from(vec![0.25, 0.5]));
    }

    #[test]
    fn double_casts_are_refused() {
        let r = Registry::default();
        let res = r.cast(&Vctr::from(vec![0.5]), &ptype());
        assert!(matches!(
            res,
            Err(Error::IncompatibleCast { details: Some(_), .. })
        ));
    }

    #[test]
    fn narrowing_to_integer_is_lossy() {
        let r = Registry::default();
        let x = rational(&r, vec![4, 3], vec![2, 2]).unwrap();
        let res = r.cast_with_diagnostics(&x, &Prototype::integer()).unwrap();
        assert_eq!(res.value, Vctr::from(vec![2, 1]));
        assert_eq!(res.locations(), vec![1]);
    }

    #[test]
    fn arithmetic_reduces() {
        let r = Registry::default();
        let x = rational(&r, vec![1, 1], vec![2, 3]).unwrap();
        let y = rational(&r, vec![1], vec![6]).unwrap();

        assert_eq!(
            r.arith(ArithOp::Add, &x, Some(&y)),
            rational(&r, vec![2, 1], vec![3, 2])
        );
        assert_eq!(
            r.arith(ArithOp::Mul, &x, Some(&Vctr::from(vec![2]))),
            rational(&r, vec![1, 2], vec![1, 3])
        );
        assert_eq!(
            r.arith(ArithOp::Sub, &x, None),
            rational(&r, vec![-1, -1], vec![2, 3])
        );
        assert!(matches!(
            r.arith(ArithOp::Pow, &x, Some(&y)),
            Err(Error::IncompatibleOperation { .. })
        ));
    }

    #[test]
    fn division_by_zero_is_missing() {
        let r = Registry::default();
        let x = rational(&r, vec![1], vec![2]).unwrap();
        let res = r.arith(ArithOp::Div, &x, Some(&Vctr::from(vec![0]))).unwrap();
        assert_eq!(r.detect_missing(&res), Ok(vec![true]));
    }

    #[test]
    fn unrepresentable_lowest_terms_are_not_missing() {
        let r = Registry::default();
        let x = rational(&r, vec![i32::MIN, 1], vec![-1, 2]).unwrap();
        assert_eq!(r.detect_missing(&x), Ok(vec![false, false]));
        assert_eq!(r.equal(&x, &x), Ok(Vctr::from(vec![true, true])));
        assert_eq!(r.unique_loc(&x), Ok(vec![0, 1]));
    }
}
