//! Arithmetic/Math Dispatcher
//!
//! Binary operators dispatch on `(left, right)` like casts do, unary
//! operators on `(left, absent)`, and math functions on the single operand
//! type. When no entry matches and every operand is a numeric primitive,
//! [`arith_base`] or [`math_base`] computes the result; anything else is an
//! [`Error::IncompatibleOperation`].
//!
use tracing::trace;

use crate::error::Error;
use crate::object::coercion::coerce_all;
use crate::object::{Data, Double, Integer, OptionNA, TypeId, Vctr};
use crate::registry::{Family, Handler, Registry, Slot};

mod arith;
pub use arith::*;

mod math;
pub use math::*;

/// Binary and unary arithmetic operators
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum ArithOp {
    #[strum(to_string = "+")]
    Add,
    #[strum(to_string = "-")]
    Sub,
    #[strum(to_string = "*")]
    Mul,
    #[strum(to_string = "/")]
    Div,
    #[strum(to_string = "^")]
    Pow,
    #[strum(to_string = "%%")]
    Rem,
    #[strum(to_string = "%/%")]
    IntDiv,
}

/// Math functions, both reducing and element-wise
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum MathOp {
    Sum,
    Prod,
    Mean,
    Cumsum,
    Cumprod,
    Abs,
    Sign,
    Sqrt,
    Exp,
    Log,
    Floor,
    Ceiling,
    IsNan,
    IsFinite,
    IsInfinite,
}

/// Numeric view of base data
///
/// Logical values compute as integers; `unspecified` computes as missing
/// integers.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Integer(Vec<Integer>),
    Double(Vec<Double>),
}

impl Numeric {
    pub fn of(data: &Data) -> Option<Numeric> {
        match data {
            Data::Unspecified(n) => Some(Numeric::Integer(vec![OptionNA::NA; *n])),
            Data::Logical(v) => Some(Numeric::Integer(coerce_all(v))),
            Data::Integer(v) => Some(Numeric::Integer(v.clone())),
            Data::Double(v) => Some(Numeric::Double(v.clone())),
            Data::Character(_) | Data::Record(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Numeric::Integer(v) => v.len(),
            Numeric::Double(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_doubles(self) -> Vec<Double> {
        match self {
            Numeric::Integer(v) => coerce_all(&v),
            Numeric::Double(v) => v,
        }
    }
}

impl From<Numeric> for Vctr {
    fn from(value: Numeric) -> Self {
        match value {
            Numeric::Integer(v) => Vctr::from(v),
            Numeric::Double(v) => Vctr::from(v),
        }
    }
}

fn is_base(class: &TypeId) -> bool {
    class.is_numeric() || class.is_unspecified()
}

impl Registry {
    /// Apply an arithmetic operator; `y` is `None` for unary operators
    pub fn arith(&self, op: ArithOp, x: &Vctr, y: Option<&Vctr>) -> Result<Vctr, Error> {
        let handler = match y {
            Some(y) => self.resolve(Family::Arith, x.class(), y.class()),
            None => self.lookup(Family::Arith, x.class(), &Slot::Absent),
        };

        if let Some(Handler::Arith(f)) = handler {
            trace!(op = %op, x = %x.class(), y = ?y.map(|y| y.class().to_string()), "arith via entry");
            return f(self, op, x, y);
        }

        if is_base(x.class()) && y.map_or(true, |y| is_base(y.class())) {
            return arith_base(self, op, x, y);
        }

        Err(Error::incompatible_op(op, x.class(), y.map(|y| y.class())))
    }

    /// Apply a math function
    pub fn math(&self, op: MathOp, x: &Vctr) -> Result<Vctr, Error> {
        if let Some(Handler::Math(f)) = self.lookup(Family::Math, x.class(), &Slot::Absent) {
            trace!(op = %op, x = %x.class(), "math via entry");
            return f(self, op, x);
        }

        if is_base(x.class()) {
            return math_base(self, op, x);
        }

        Err(Error::incompatible_op(op, x.class(), None))
    }
}
