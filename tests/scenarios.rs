use vctr::error::Error;
use vctr::object::{Attrs, Prototype, TypeId, Vctr};
use vctr::ops::ArithOp;
use vctr::options::{LossyPolicy, Options};
use vctr::record::{common_fields, record_ptype};
use vctr::registry::{Registry, VecType};
use vctr::types::{decimal, distance, rational};
use vctr::v;

/// A two-field record type that keeps the default proxies
struct Fraction;

fn fraction_class() -> TypeId {
    TypeId::class("fraction")
}

impl VecType for Fraction {
    fn class(&self) -> TypeId {
        fraction_class()
    }

    fn ptype(&self) -> Prototype {
        record_ptype(
            fraction_class(),
            vec![
                ("num".to_string(), Prototype::integer()),
                ("den".to_string(), Prototype::integer()),
            ],
        )
    }
}

fn fraction(r: &Registry, num: Vec<i32>, den: Vec<i32>) -> Result<Vctr, Error> {
    r.new_record(
        fraction_class(),
        Attrs::new(),
        vec![
            ("num".to_string(), Vctr::from(num)),
            ("den".to_string(), Vctr::from(den)),
        ],
    )
}

#[test]
fn fractions_equal_in_lowest_terms_only_with_a_custom_proxy() {
    let mut r = Registry::default();
    r.define(Fraction);
    r.register_common_type(fraction_class(), fraction_class(), |r, x, y| {
        Ok(record_ptype(fraction_class(), common_fields(r, x, y)?))
    });

    let half = rational::rational(&r, vec![1], vec![2]).unwrap();
    let two_quarters = rational::rational(&r, vec![2], vec![4]).unwrap();
    assert_eq!(r.equal(&half, &two_quarters), Ok(Vctr::from(vec![true])));

    let half = fraction(&r, vec![1], vec![2]).unwrap();
    let two_quarters = fraction(&r, vec![2], vec![4]).unwrap();
    assert_eq!(r.equal(&half, &two_quarters), Ok(Vctr::from(vec![false])));
}

#[test]
fn sorting_equal_records_is_stable() {
    let r = Registry::default();
    let x = rational::rational(&r, vec![1, 2, 1, 3], vec![2, 4, 3, 6]).unwrap();
    assert_eq!(r.order(&x, false), Ok(vec![2, 0, 1, 3]));
    assert_eq!(r.order(&x, true), Ok(vec![0, 1, 3, 2]));
}

#[test]
fn precision_reconciles_to_the_maximum() {
    let r = Registry::default();
    let x = decimal::decimal(&r, vec![1.5], 1).unwrap();
    let y = decimal::decimal(&r, vec![1.125], 3).unwrap();

    let common = r.common_type(&r.ptype(&x).unwrap(), &r.ptype(&y).unwrap());
    assert_eq!(common, Ok(decimal::ptype(3)));

    let res = r.cast_with_diagnostics(&x, &decimal::ptype(3)).unwrap();
    assert!(!res.is_lossy());
    assert_eq!(res.value, decimal::decimal(&r, vec![1.5], 3).unwrap());
}

#[test]
fn narrowing_doubles_flags_only_fractional_elements() {
    let r = Registry::default();
    let res = r
        .cast_with_diagnostics(&v!("c(1.5, 2.0, 10.5)").unwrap(), &Prototype::integer())
        .unwrap();
    assert_eq!(res.value, v!("c(1L, 2L, 10L)").unwrap());
    assert_eq!(res.locations(), vec![0, 2]);

    let strict = Registry::with_options(Options::default().with_lossy(LossyPolicy::Error));
    assert_eq!(
        strict.cast(&Vctr::from(vec![1.5, 2.0, 10.5]), &Prototype::integer()),
        Err(Error::LossyCast {
            from: TypeId::Double,
            to: TypeId::Integer,
            locations: vec![0, 2],
        })
    );
}

#[test]
fn distance_arithmetic() {
    let r = Registry::default();
    let x = v!("c(1, 2) as distance(unit = 'm')").unwrap();
    let y = v!("c(50) as distance(unit = 'cm')").unwrap();
    let n = v!("2").unwrap();

    assert_eq!(
        r.arith(ArithOp::Add, &x, Some(&y)),
        distance::distance(&r, vec![150.0, 250.0], distance::Unit::Cm)
    );
    assert_eq!(
        r.arith(ArithOp::Sub, &x, Some(&x)),
        distance::distance(&r, vec![0.0, 0.0], distance::Unit::M)
    );
    assert_eq!(r.arith(ArithOp::Div, &x, Some(&y)), Ok(Vctr::from(vec![2.0, 4.0])));
    assert!(matches!(
        r.arith(ArithOp::Mul, &x, Some(&y)),
        Err(Error::IncompatibleOperation { .. })
    ));

    for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div] {
        assert_eq!(r.arith(op, &x, Some(&n)).unwrap().class(), &distance::class());
    }
    for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul] {
        assert_eq!(r.arith(op, &n, Some(&x)).unwrap().class(), &distance::class());
    }
    assert!(matches!(
        r.arith(ArithOp::Div, &n, Some(&x)),
        Err(Error::IncompatibleOperation { .. })
    ));
}

#[test]
fn combining_refuses_unrelated_types() {
    let err = v!("c(1L, 'a')").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error: can't combine <integer> and <character>"
    );
}
