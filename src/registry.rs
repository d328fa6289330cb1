//! Type Registry
//!
//! A table from `(family, left type, right slot)` to a handler, plus one
//! capability object per registered type. The registry is populated once,
//! then installed process-wide with [`install`] and only ever read through
//! a shared reference afterwards.
//!
//! Lookups never mirror a pair: registering `(A, B)` says nothing about
//! `(B, A)`. Use [`Registry::check_symmetry`] to audit common-type entries.
//!
//! Registration is last-write-wins. Two type modules registering the same
//! key overwrite each other in registration order; populate the registry
//! before resolving anything with it.
//!
use std::fmt::{Debug, Display};

use hashbrown::HashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::cast::CastCtx;
use crate::error::Error;
use crate::object::{Prototype, TypeId, Vctr};
use crate::ops::{ArithOp, MathOp};
use crate::options::Options;

pub type CommonTypeFn = fn(&Registry, &Prototype, &Prototype) -> Result<Prototype, Error>;
pub type CastFn = fn(&mut CastCtx<'_>, &Vctr, &Prototype) -> Result<Vctr, Error>;
pub type ProxyFn = fn(&Registry, &Vctr) -> Result<Vctr, Error>;
pub type ArithFn = fn(&Registry, ArithOp, &Vctr, Option<&Vctr>) -> Result<Vctr, Error>;
pub type MathFn = fn(&Registry, MathOp, &Vctr) -> Result<Vctr, Error>;

/// Independent operation families, each with its own table entries
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Family {
    CommonType,
    Cast,
    ProxyEqual,
    ProxyCompare,
    Arith,
    Math,
}

/// Right-hand key of a registry entry
///
/// `Default` is consulted after an exact miss. `Absent` keys operations
/// with no right operand (unary arithmetic, math, proxies) and never
/// matches a concrete type.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    Type(TypeId),
    Default,
    Absent,
}

impl From<TypeId> for Slot {
    fn from(value: TypeId) -> Self {
        Slot::Type(value)
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Type(t) => write!(f, "{t}"),
            Slot::Default => write!(f, "default"),
            Slot::Absent => write!(f, "absent"),
        }
    }
}

#[derive(Clone, Copy)]
pub enum Handler {
    CommonType(CommonTypeFn),
    Cast(CastFn),
    ProxyEqual(ProxyFn),
    ProxyCompare(ProxyFn),
    Arith(ArithFn),
    Math(MathFn),
}

impl Handler {
    pub fn family(&self) -> Family {
        match self {
            Handler::CommonType(_) => Family::CommonType,
            Handler::Cast(_) => Family::Cast,
            Handler::ProxyEqual(_) => Family::ProxyEqual,
            Handler::ProxyCompare(_) => Family::ProxyCompare,
            Handler::Arith(_) => Family::Arith,
            Handler::Math(_) => Family::Math,
        }
    }
}

impl Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handler::{:?}", self.family())
    }
}

/// Capabilities every registered type provides
///
/// Pairwise behavior (common type, cast, arithmetic) lives in the handler
/// table; this trait covers what depends on one type alone.
///
pub trait VecType: Send + Sync {
    fn class(&self) -> TypeId;

    /// Prototype used when the type is named without attributes
    fn ptype(&self) -> Prototype;

    /// Checks applied by the user-facing constructor
    ///
    /// Casts into this type route through here, so invalid input is
    /// rejected exactly as it would be on direct construction.
    ///
    fn validate(&self, x: Vctr) -> Result<Vctr, Error> {
        Ok(x)
    }

    /// Reattach attributes after a structural mutation
    ///
    /// Called after every slice, combination, assignment and cast result
    /// built by the engine. The default copies `to`'s attributes verbatim;
    /// types with data-dependent attributes must recompute them here.
    ///
    fn restore(&self, x: Vctr, to: &Prototype) -> Result<Vctr, Error> {
        Ok(restore_verbatim(x, to))
    }
}

/// Default restore: class and attributes of `to`, data of `x`
pub fn restore_verbatim(x: Vctr, to: &Prototype) -> Vctr {
    Vctr::from_parts(to.class().clone(), to.attrs().clone(), x.into_data())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Key {
    family: Family,
    left: TypeId,
    right: Slot,
}

pub struct Registry {
    options: Options,
    types: HashMap<TypeId, Box<dyn VecType>>,
    handlers: HashMap<Key, Handler>,
}

impl Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&TypeId> = self.types.keys().collect();
        types.sort();
        f.debug_struct("Registry")
            .field("options", &self.options)
            .field("types", &types)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Default for Registry {
    /// Primitives plus every bundled extension type
    fn default() -> Self {
        Registry::with_options(Options::default())
    }
}

impl Registry {
    /// An empty registry, without even the primitive types
    pub fn new(options: Options) -> Self {
        Registry {
            options,
            types: HashMap::new(),
            handlers: HashMap::new(),
        }
    }

    /// Primitive types only
    pub fn primitives(options: Options) -> Self {
        let mut registry = Registry::new(options);
        crate::types::primitive::register(&mut registry);
        registry
    }

    /// Primitives plus every bundled extension type
    pub fn with_options(options: Options) -> Self {
        let mut registry = Registry::primitives(options);
        crate::types::register_bundled(&mut registry);
        registry
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Add a type's capability object
    pub fn define(&mut self, ty: impl VecType + 'static) {
        let class = ty.class();
        debug!(class = %class, "defined type");
        self.types.insert(class, Box::new(ty));
    }

    pub fn vec_type(&self, class: &TypeId) -> Result<&dyn VecType, Error> {
        self.types
            .get(class)
            .map(|t| t.as_ref())
            .ok_or_else(|| Error::Unregistered(class.clone()))
    }

    /// Insert or overwrite a handler
    ///
    /// Fails if the handler belongs to a different family than the key.
    ///
    pub fn register(
        &mut self,
        family: Family,
        left: TypeId,
        right: Slot,
        handler: Handler,
    ) -> Result<(), Error> {
        if handler.family() != family {
            return Err(Error::InvariantViolation(format!(
                "a {} handler can't be registered as {family}",
                handler.family()
            )));
        }

        let key = Key {
            family,
            left,
            right,
        };

        if self.handlers.contains_key(&key) {
            debug!(family = %key.family, left = %key.left, right = %key.right, "replaced handler");
        } else {
            debug!(family = %key.family, left = %key.left, right = %key.right, "registered handler");
        }

        self.handlers.insert(key, handler);
        Ok(())
    }

    fn insert(&mut self, left: TypeId, right: Slot, handler: Handler) {
        let family = handler.family();
        // family is derived from the handler, so this can't mismatch
        let _ = self.register(family, left, right, handler);
    }

    pub fn register_common_type(&mut self, left: TypeId, right: impl Into<Slot>, f: CommonTypeFn) {
        self.insert(left, right.into(), Handler::CommonType(f))
    }

    pub fn register_cast(&mut self, from: TypeId, to: impl Into<Slot>, f: CastFn) {
        self.insert(from, to.into(), Handler::Cast(f))
    }

    pub fn register_proxy_equal(&mut self, class: TypeId, f: ProxyFn) {
        self.insert(class, Slot::Absent, Handler::ProxyEqual(f))
    }

    pub fn register_proxy_compare(&mut self, class: TypeId, f: ProxyFn) {
        self.insert(class, Slot::Absent, Handler::ProxyCompare(f))
    }

    pub fn register_arith(&mut self, left: TypeId, right: impl Into<Slot>, f: ArithFn) {
        self.insert(left, right.into(), Handler::Arith(f))
    }

    pub fn register_math(&mut self, class: TypeId, f: MathFn) {
        self.insert(class, Slot::Absent, Handler::Math(f))
    }

    /// Exact lookup, no fallback
    pub fn lookup(&self, family: Family, left: &TypeId, right: &Slot) -> Option<Handler> {
        let key = Key {
            family,
            left: left.clone(),
            right: right.clone(),
        };
        let found = self.handlers.get(&key).copied();
        trace!(family = %family, left = %left, right = %right, found = found.is_some(), "lookup");
        found
    }

    /// Lookup with the `(left, default)` fallback
    pub fn resolve(&self, family: Family, left: &TypeId, right: &TypeId) -> Option<Handler> {
        self.lookup(family, left, &Slot::Type(right.clone()))
            .or_else(|| self.lookup(family, left, &Slot::Default))
    }

    /// Pairs `(A, B)` whose common type disagrees with `(B, A)`
    ///
    /// Each registered common-type entry between two defined types is
    /// resolved in both directions using the types' default prototypes. A
    /// pair is reported when the mirror fails or produces a different
    /// class.
    ///
    pub fn check_symmetry(&self) -> Vec<(TypeId, TypeId)> {
        let mut pairs: Vec<(TypeId, TypeId)> = self
            .handlers
            .keys()
            .filter(|k| k.family == Family::CommonType)
            .filter_map(|k| match &k.right {
                Slot::Type(right) => Some((k.left.clone(), right.clone())),
                _ => None,
            })
            .collect();
        pairs.sort();

        pairs
            .into_iter()
            .filter(|(a, b)| {
                let (Ok(pa), Ok(pb)) = (self.vec_type(a), self.vec_type(b)) else {
                    return true;
                };
                let (pa, pb) = (pa.ptype(), pb.ptype());
                match (self.common_type(&pa, &pb), self.common_type(&pb, &pa)) {
                    (Ok(ab), Ok(ba)) => ab.class() != ba.class(),
                    (Err(_), Err(_)) => false,
                    _ => true,
                }
            })
            .collect()
    }
}

static REGISTRY: OnceCell<Registry> = OnceCell::new();

/// Install a fully populated registry as the process-wide registry
///
/// May only succeed once. Afterwards the registry is reachable only
/// through [`global`] as a shared reference.
///
pub fn install(registry: Registry) -> Result<&'static Registry, Error> {
    REGISTRY
        .set(registry)
        .map_err(|_| Error::AlreadyInitialized)?;
    debug!("installed type registry");
    Ok(global())
}

/// The process-wide registry, installing the default one if needed
pub fn global() -> &'static Registry {
    REGISTRY.get_or_init(Registry::default)
}
