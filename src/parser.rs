/// Literal Parser
///
/// Parses literal vectors such as `c(1L, 2.5, NA)` into values. Each
/// element becomes a vector of size one and the elements are combined
/// through the registry, so a literal's type is the common type of its
/// elements: `c(TRUE, 2L)` is an integer vector, `c(1L, "a")` fails to
/// combine.
///
/// A literal may be followed by `as <type>` to cast the result, where a
/// type is a registered class name with optional attributes, as in
/// `decimal(digits = 1)`.
///
use crate::error::Error;
use crate::internal_err;
use crate::object::{Attr, Attrs, Prototype, TypeId, Vctr};
use crate::registry::Registry;

use pest::iterators::Pair;
use pest::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct LiteralParser;

/// Parse a literal, optionally cast with `as <type>`
///
/// ```
/// use vctr::object::{OptionNA, Vctr};
/// use vctr::parser::parse;
/// use vctr::registry::Registry;
///
/// let r = Registry::default();
/// let x = parse(&r, "c(TRUE, 2L, NA)").unwrap();
/// assert_eq!(x, Vctr::from(vec![OptionNA::Some(1), OptionNA::Some(2), OptionNA::NA]));
/// ```
///
pub fn parse(registry: &Registry, s: &str) -> Result<Vctr, Error> {
    let Some(input) = LiteralParser::parse(Rule::input, s)?.next() else {
        return internal_err!("empty parse");
    };

    let mut elements = vec![];
    let mut ptype = None;

    for pair in input.into_inner() {
        match pair.as_rule() {
            Rule::vec => {
                for element in pair.into_inner() {
                    elements.push(parse_element(element)?);
                }
            }
            Rule::ptype => ptype = Some(parse_ptype_pair(registry, pair)?),
            Rule::kw_as | Rule::EOI => (),
            _ => elements.push(parse_element(pair)?),
        }
    }

    let value = registry.combine(&elements)?;
    match ptype {
        Some(ptype) => registry.cast(&value, &ptype),
        None => Ok(value),
    }
}

/// Parse a type such as `integer` or `distance(unit = "km")`
///
/// Attributes not given take the values of the type's default prototype.
///
pub fn parse_ptype(registry: &Registry, s: &str) -> Result<Prototype, Error> {
    let Some(input) = LiteralParser::parse(Rule::ptype_input, s)?.next() else {
        return internal_err!("empty parse");
    };

    for pair in input.into_inner() {
        if pair.as_rule() == Rule::ptype {
            return parse_ptype_pair(registry, pair);
        }
    }

    internal_err!("type not found in parse")
}

fn parse_ptype_pair(registry: &Registry, pair: Pair<Rule>) -> Result<Prototype, Error> {
    let mut inner = pair.into_inner();
    let Some(name) = inner.next() else {
        return internal_err!("type without a name");
    };

    let class: TypeId = match name.as_str().parse() {
        Ok(class) => class,
        Err(_) => TypeId::class(name.as_str()),
    };

    let ptype = registry.vec_type(&class)?.ptype();
    let mut attrs: Attrs = ptype.attrs().clone();

    for attr in inner {
        let mut kv = attr.into_inner();
        let (Some(key), Some(value)) = (kv.next(), kv.next()) else {
            return internal_err!("malformed attribute");
        };
        attrs.insert(key.as_str().to_string(), parse_attr(value)?);
    }

    Ok(ptype.with_attrs(attrs))
}

fn parse_attr(pair: Pair<Rule>) -> Result<Attr, Error> {
    Ok(match pair.as_rule() {
        Rule::val_true => Attr::Logical(true),
        Rule::val_false => Attr::Logical(false),
        Rule::single_quoted_string | Rule::double_quoted_string => {
            Attr::Character(parse_string(pair))
        }
        Rule::integer => Attr::Integer(parse_integer(pair.as_str())?),
        // whole numbers are taken as integers: `digits = 2`
        Rule::number => match pair.as_str().parse::<i32>() {
            Ok(i) => Attr::Integer(i),
            Err(_) => Attr::Double(parse_number(pair.as_str())?),
        },
        rule => return Err(Error::ParseUnexpected(rule)),
    })
}

fn parse_element(pair: Pair<Rule>) -> Result<Vctr, Error> {
    Ok(match pair.as_rule() {
        Rule::val_na => Vctr::unspecified(1),
        Rule::val_true => Vctr::from(true),
        Rule::val_false => Vctr::from(false),
        Rule::val_inf => match pair.as_str().starts_with('-') {
            true => Vctr::from(f64::NEG_INFINITY),
            false => Vctr::from(f64::INFINITY),
        },
        Rule::integer => Vctr::from(parse_integer(pair.as_str())?),
        Rule::number => Vctr::from(parse_number(pair.as_str())?),
        Rule::single_quoted_string | Rule::double_quoted_string => {
            Vctr::from(vec![parse_string(pair)])
        }
        rule => return Err(Error::ParseUnexpected(rule)),
    })
}

fn parse_integer(s: &str) -> Result<i32, Error> {
    s.trim_end_matches('L')
        .parse::<i32>()
        .map_err(|_| Error::Other(format!("integer literal '{s}' is out of range")))
}

fn parse_number(s: &str) -> Result<f64, Error> {
    s.parse::<f64>().map_or(internal_err!(), Ok)
}

fn parse_string(pair: Pair<Rule>) -> String {
    let raw = pair.into_inner().next().map_or("", |p| p.as_str());
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match (c, c == '\\') {
            (_, true) => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(c) => out.push(c),
                None => out.push('\\'),
            },
            (c, false) => out.push(c),
        }
    }
    out
}

/// Parse a literal with the default registry, for tests and examples
#[macro_export]
macro_rules! v {
    ($s:expr) => {
        $crate::parser::parse(&$crate::registry::Registry::default(), $s)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::OptionNA;
    use crate::types::{decimal, distance};

    #[test]
    fn scalars_and_vectors() {
        assert_eq!(v!("1L"), Ok(Vctr::from(vec![1])));
        assert_eq!(v!("c(1.5, -2)"), Ok(Vctr::from(vec![1.5, -2.0])));
        assert_eq!(v!("c()"), Ok(Vctr::unspecified(0)));
        assert_eq!(v!("NA"), Ok(Vctr::unspecified(1)));
        assert_eq!(
            v!("c('a', \"b\\\"c\")"),
            Ok(Vctr::from(vec!["a", "b\"c"]))
        );
    }

    #[test]
    fn elements_combine_to_their_common_type() {
        assert_eq!(
            v!("c(TRUE, NA, 3L)"),
            Ok(Vctr::from(vec![OptionNA::Some(1), OptionNA::NA, OptionNA::Some(3)]))
        );
        assert_eq!(v!("c(1L, 0.5)"), Ok(Vctr::from(vec![1.0, 0.5])));
        assert!(matches!(
            v!("c(1L, 'a')"),
            Err(Error::IncompatibleType { .. })
        ));
    }

    #[test]
    fn infinities() {
        assert_eq!(
            v!("c(Inf, -Inf)"),
            Ok(Vctr::from(vec![f64::INFINITY, f64::NEG_INFINITY]))
        );
    }

    #[test]
    fn cast_with_as() {
        let r = Registry::default();
        assert_eq!(
            parse(&r, "c(1, 2) as distance(unit = 'km')"),
            distance::distance(&r, vec![1.0, 2.0], distance::Unit::Km)
        );
        assert_eq!(
            parse(&r, "c(0.5) as decimal(digits = 1)"),
            decimal::decimal(&r, vec![0.5], 1)
        );
        assert_eq!(parse(&r, "c(2.0) as integer"), Ok(Vctr::from(vec![2])));
    }

    #[test]
    fn types_default_their_attributes() {
        let r = Registry::default();
        assert_eq!(
            parse_ptype(&r, "decimal"),
            Ok(decimal::ptype(decimal::DEFAULT_DIGITS))
        );
        assert_eq!(parse_ptype(&r, "double"), Ok(Prototype::double()));
        assert_eq!(
            parse_ptype(&r, "widget"),
            Err(Error::Unregistered(TypeId::class("widget")))
        );
    }

    #[test]
    fn malformed_literals_fail() {
        assert!(matches!(v!("c(1,"), Err(Error::ParseFailure(_))));
        assert!(matches!(v!("c(1) as"), Err(Error::ParseFailure(_))));
        assert!(matches!(v!("99999999999L"), Err(Error::Other(_))));
    }
}
