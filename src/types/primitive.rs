//! Primitive types
//!
//! `logical < integer < double` form the widening hierarchy; `character`
//! only combines with itself. `unspecified` is defined so that values of
//! it can be sliced and restored like any other, but it needs no entries:
//! the resolver and the cast engine treat it specially.
//!
use crate::cast::cast_atomic;
use crate::object::{Prototype, TypeId};
use crate::registry::{Registry, VecType};

#[derive(Debug, Clone)]
pub struct Primitive(Prototype);

impl VecType for Primitive {
    fn class(&self) -> TypeId {
        self.0.class().clone()
    }

    fn ptype(&self) -> Prototype {
        self.0.clone()
    }
}

/// Register a common type for a pair of primitives, in both directions
macro_rules! register {
    ($registry:ident, ($l:ident, $r:ident) => $target:ident) => {
        $registry.register_common_type(TypeId::$l, TypeId::$r, |_, _, _| Ok(Prototype::$target()));
        $registry.register_common_type(TypeId::$r, TypeId::$l, |_, _, _| Ok(Prototype::$target()));
    };
    ($registry:ident, $t:ident => $target:ident) => {
        $registry.register_common_type(TypeId::$t, TypeId::$t, |_, _, _| Ok(Prototype::$target()));
    };
}

pub fn register(registry: &mut Registry) {
    for ptype in [
        Prototype::unspecified(),
        Prototype::logical(),
        Prototype::integer(),
        Prototype::double(),
        Prototype::character(),
    ] {
        registry.define(Primitive(ptype));
    }

    register!(registry, Logical => logical);
    register!(registry, Integer => integer);
    register!(registry, Double => double);
    register!(registry, Character => character);
    register!(registry, (Logical, Integer) => integer);
    register!(registry, (Logical, Double) => double);
    register!(registry, (Integer, Double) => double);

    let numeric = [TypeId::Logical, TypeId::Integer, TypeId::Double];
    for from in &numeric {
        for to in &numeric {
            registry.register_cast(from.clone(), to.clone(), cast_atomic);
        }
    }
    registry.register_cast(TypeId::Character, TypeId::Character, cast_atomic);
}
