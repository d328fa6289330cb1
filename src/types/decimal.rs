//! Decimal numbers with a fixed number of digits
//!
//! Stored as doubles with an integer `digits` attribute. Combining two
//! decimals keeps the larger number of digits, so precision only ever
//! grows implicitly; casting to fewer digits rounds and reports each
//! element that changed. Digits are capped at [`MAX_DIGITS`], the most a
//! double can carry after the decimal point without its scaled value
//! losing integer precision.
//!
use crate::cast::{cast_atomic, refuse_cast, CastCtx};
use crate::common::refuse_common_type;
use crate::error::Error;
use crate::object::{Attrs, Data, Prototype, Storage, TypeId, Vctr};
use crate::ops::{arith_base, math_base, ArithOp, MathOp};
use crate::registry::{Registry, Slot, VecType};

pub const CLASS: &str = "decimal";
pub const DEFAULT_DIGITS: i32 = 2;
pub const MAX_DIGITS: i32 = 15;

pub fn class() -> TypeId {
    TypeId::class(CLASS)
}

pub fn ptype(digits: i32) -> Prototype {
    Prototype::new(class(), Storage::Double).with_attr("digits", digits)
}

/// Number of digits carried by a decimal prototype or value
pub fn digits(attrs: &Attrs) -> i32 {
    attrs
        .get("digits")
        .and_then(|d| d.as_integer())
        .unwrap_or(DEFAULT_DIGITS)
}

/// Build a decimal vector through validation
pub fn decimal(registry: &Registry, values: Vec<f64>, digits: i32) -> Result<Vctr, Error> {
    registry.construct(&ptype(digits), Vctr::from(values).into_data())
}

pub struct Decimal;

impl VecType for Decimal {
    fn class(&self) -> TypeId {
        class()
    }

    fn ptype(&self) -> Prototype {
        ptype(DEFAULT_DIGITS)
    }

    fn validate(&self, x: Vctr) -> Result<Vctr, Error> {
        if !matches!(x.data(), Data::Double(_)) {
            return Err(Error::InvariantViolation(format!(
                "<{CLASS}> must be backed by doubles"
            )));
        }

        match x.attr("digits").and_then(|d| d.as_integer()) {
            Some(d) if (0..=MAX_DIGITS).contains(&d) => Ok(x),
            _ => Err(Error::InvariantViolation(format!(
                "<{CLASS}> requires an integer 'digits' attribute between 0 and {MAX_DIGITS}"
            ))),
        }
    }
}

/// `x` rounded to `digits`, or `None` when rounding would only move it
/// within float error
fn round_to(x: f64, digits: i32) -> Option<f64> {
    let scale = 10f64.powi(digits);
    let scaled = x * scale;
    if !scaled.is_finite() {
        return None;
    }

    let r = scaled.round();
    match (r - scaled).abs() <= scaled.abs() * f64::EPSILON {
        true => None,
        false => Some(r / scale),
    }
}

/// Round to the target's digits, reporting elements that changed
fn rounded(ctx: &mut CastCtx<'_>, from: &TypeId, data: Data, to: &Prototype) -> Data {
    let Data::Double(v) = data else {
        return data;
    };

    let d = digits(to.attrs());
    let mut lossy = vec![];
    let out = v
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            x.map(|x| match round_to(x, d) {
                Some(r) => {
                    lossy.push(i);
                    r
                }
                None => x,
            })
        })
        .collect();

    ctx.report_lossy(from, to.class(), lossy);
    Data::Double(out)
}

fn common_self(_: &Registry, x: &Prototype, y: &Prototype) -> Result<Prototype, Error> {
    Ok(ptype(digits(x.attrs()).max(digits(y.attrs()))))
}

fn common_left(_: &Registry, x: &Prototype, _: &Prototype) -> Result<Prototype, Error> {
    Ok(x.clone())
}

fn common_right(_: &Registry, _: &Prototype, y: &Prototype) -> Result<Prototype, Error> {
    Ok(y.clone())
}

/// Decimal to decimal, or a numeric primitive into a decimal
fn cast_into(ctx: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    let data = ctx.convert(x, to)?;
    let widening = x.class() == &class() && digits(x.attrs()) <= digits(to.attrs());
    let data = match widening {
        true => data,
        false => rounded(ctx, x.class(), data, to),
    };
    ctx.registry().construct(to, data)
}

fn result_digits(x: &Vctr, y: Option<&Vctr>) -> i32 {
    let dx = digits(x.attrs());
    match y {
        Some(y) if y.class() == x.class() => dx.max(digits(y.attrs())),
        _ => dx,
    }
}

fn arith(registry: &Registry, op: ArithOp, x: &Vctr, y: Option<&Vctr>) -> Result<Vctr, Error> {
    let d = match (x.class() == &class(), y) {
        (true, _) => result_digits(x, y),
        (false, Some(y)) => result_digits(y, Some(x)),
        (false, None) => DEFAULT_DIGITS,
    };

    let out = arith_base(registry, op, x, y)?;
    if !matches!(op, ArithOp::Add | ArithOp::Sub) {
        return Ok(out);
    }

    // a primitive operand may carry more digits than the result keeps
    let data = match out.into_data() {
        Data::Double(v) => Data::Double(
            v.into_iter()
                .map(|e| e.map(|e| round_to(e, d).unwrap_or(e)))
                .collect(),
        ),
        data => data,
    };
    registry.construct(&ptype(d), data)
}

fn math(registry: &Registry, op: MathOp, x: &Vctr) -> Result<Vctr, Error> {
    let out = math_base(registry, op, x)?;
    match op {
        MathOp::Abs | MathOp::Sum | MathOp::Cumsum => {
            registry.construct(&ptype(digits(x.attrs())), out.into_data())
        }
        _ => Ok(out),
    }
}

pub fn register(registry: &mut Registry) {
    registry.define(Decimal);

    registry.register_common_type(class(), class(), common_self);
    for primitive in [TypeId::Logical, TypeId::Integer, TypeId::Double] {
        registry.register_common_type(class(), primitive.clone(), common_left);
        registry.register_common_type(primitive.clone(), class(), common_right);

        registry.register_cast(primitive.clone(), class(), cast_into);
        registry.register_cast(class(), primitive.clone(), cast_atomic);

        registry.register_arith(primitive.clone(), class(), arith);
        registry.register_arith(class(), primitive, arith);
    }
    registry.register_common_type(class(), Slot::Default, refuse_common_type);

    registry.register_cast(class(), class(), cast_into);
    registry.register_cast(class(), Slot::Default, refuse_cast);

    registry.register_arith(class(), class(), arith);
    registry.register_arith(class(), Slot::Absent, arith);
    registry.register_math(class(), math);
}
