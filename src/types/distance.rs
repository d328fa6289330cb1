//! Physical lengths
//!
//! Stored as doubles with a `unit` attribute. Distances in different units
//! combine in the finer of the two. They never combine implicitly with
//! plain numbers, though an explicit cast either way is allowed.
//!
use crate::cast::{cast_atomic, cast_construct, refuse_cast, CastCtx};
use crate::common::refuse_common_type;
use crate::error::Error;
use crate::object::{Attrs, Data, Prototype, Storage, TypeId, Vctr};
use crate::ops::{arith_base, math_base, ArithOp, MathOp};
use crate::registry::{Registry, Slot, VecType};

pub const CLASS: &str = "distance";

/// Length units, ordered from finest to coarsest
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Unit {
    Mm,
    Cm,
    M,
    Km,
}

impl Unit {
    fn millimetres(&self) -> f64 {
        match self {
            Unit::Mm => 1.0,
            Unit::Cm => 10.0,
            Unit::M => 1_000.0,
            Unit::Km => 1_000_000.0,
        }
    }

    pub fn convert(&self, x: f64, to: Unit) -> f64 {
        x * self.millimetres() / to.millimetres()
    }
}

pub fn class() -> TypeId {
    TypeId::class(CLASS)
}

pub fn ptype(unit: Unit) -> Prototype {
    Prototype::new(class(), Storage::Double).with_attr("unit", unit.to_string())
}

/// Unit carried by a distance prototype or value
pub fn unit(attrs: &Attrs) -> Result<Unit, Error> {
    let Some(name) = attrs.get("unit").and_then(|u| u.as_str()) else {
        return Err(Error::InvariantViolation(format!(
            "<{CLASS}> requires a 'unit' attribute"
        )));
    };

    name.parse().map_err(|_| {
        Error::InvariantViolation(format!(
            "<{CLASS}> unit must be one of mm, cm, m or km, found '{name}'"
        ))
    })
}

pub fn distance(registry: &Registry, values: Vec<f64>, unit: Unit) -> Result<Vctr, Error> {
    registry.construct(&ptype(unit), Vctr::from(values).into_data())
}

pub struct Distance;

impl VecType for Distance {
    fn class(&self) -> TypeId {
        class()
    }

    fn ptype(&self) -> Prototype {
        ptype(Unit::M)
    }

    fn validate(&self, x: Vctr) -> Result<Vctr, Error> {
        if !matches!(x.data(), Data::Double(_)) {
            return Err(Error::InvariantViolation(format!(
                "<{CLASS}> must be backed by doubles"
            )));
        }
        unit(x.attrs())?;
        Ok(x)
    }
}

fn common_self(_: &Registry, x: &Prototype, y: &Prototype) -> Result<Prototype, Error> {
    Ok(ptype(unit(x.attrs())?.min(unit(y.attrs())?)))
}

fn cast_self(ctx: &mut CastCtx<'_>, x: &Vctr, to: &Prototype) -> Result<Vctr, Error> {
    let (from, to_unit) = (unit(x.attrs())?, unit(to.attrs())?);
    let data = match x.data() {
        Data::Double(v) => Data::Double(
            v.iter()
                .map(|x| x.clone().map(|x| from.convert(x, to_unit)))
                .collect(),
        ),
        _ => return Err(Error::incompatible_cast(x.class(), to.class())),
    };
    ctx.registry().construct(to, data)
}

/// Express a distance in another unit
fn in_unit(registry: &Registry, x: &Vctr, to: Unit) -> Result<Vctr, Error> {
    registry.cast(x, &ptype(to))
}

fn arith(registry: &Registry, op: ArithOp, x: &Vctr, y: Option<&Vctr>) -> Result<Vctr, Error> {
    let refuse = || Error::incompatible_op(op, x.class(), y.map(|y| y.class()));
    let is_distance = |v: &Vctr| v.class() == &class();

    let Some(y) = y else {
        return match op {
            ArithOp::Add => Ok(x.clone()),
            ArithOp::Sub => {
                let out = arith_base(registry, op, x, None)?;
                registry.construct(&ptype(unit(x.attrs())?), out.into_data())
            }
            _ => Err(refuse()),
        };
    };

    match (is_distance(x), is_distance(y)) {
        (true, true) => {
            let u = unit(x.attrs())?.min(unit(y.attrs())?);
            let (x, y) = (in_unit(registry, x, u)?, in_unit(registry, y, u)?);
            match op {
                ArithOp::Add | ArithOp::Sub => {
                    let out = arith_base(registry, op, &x, Some(&y))?;
                    registry.construct(&ptype(u), out.into_data())
                }
                // a ratio of lengths has no unit
                ArithOp::Div => arith_base(registry, op, &x, Some(&y)),
                _ => Err(refuse()),
            }
        }
        (true, false) if y.class().is_numeric() => match op {
            ArithOp::Add | ArithOp::Sub | ArithOp::Mul | ArithOp::Div => {
                let out = arith_base(registry, op, x, Some(y))?;
                registry.construct(&ptype(unit(x.attrs())?), out.into_data())
            }
            _ => Err(refuse()),
        },
        (false, true) if x.class().is_numeric() => match op {
            ArithOp::Add | ArithOp::Sub | ArithOp::Mul => {
                let out = arith_base(registry, op, x, Some(y))?;
                registry.construct(&ptype(unit(y.attrs())?), out.into_data())
            }
            _ => Err(refuse()),
        },
        _ => Err(refuse()),
    }
}

fn math(registry: &Registry, op: MathOp, x: &Vctr) -> Result<Vctr, Error> {
    match op {
        MathOp::Abs | MathOp::Sum | MathOp::Mean | MathOp::Cumsum => {
            let out = math_base(registry, op, x)?;
            registry.construct(&ptype(unit(x.attrs())?), out.into_data())
        }
        _ => Err(Error::incompatible_op(op, x.class(), None)),
    }
}

pub fn register(registry: &mut Registry) {
    registry.define(Distance);

    registry.register_common_type(class(), class(), common_self);
    registry.register_common_type(class(), Slot::Default, refuse_common_type);

    registry.register_cast(class(), class(), cast_self);
    registry.register_cast(TypeId::Integer, class(), cast_construct);
    registry.register_cast(TypeId::Double, class(), cast_construct);
    registry.register_cast(class(), TypeId::Double, cast_atomic);
    registry.register_cast(class(), Slot::Default, refuse_cast);

    registry.register_arith(class(), class(), arith);
    registry.register_arith(class(), Slot::Default, arith);
    registry.register_arith(class(), Slot::Absent, arith);
    for number in [TypeId::Logical, TypeId::Integer, TypeId::Double] {
        registry.register_arith(number, class(), arith);
    }

    registry.register_math(class(), math);
}
