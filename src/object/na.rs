use std::fmt::{Debug, Display};

/// A vector element that may be missing
///
/// Every primitive storage holds `OptionNA` elements so that a missing value
/// survives casts and arithmetic without a separate validity mask.
///
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub enum OptionNA<T> {
    #[default]
    NA,
    Some(T),
}

pub type Logical = OptionNA<bool>;
pub type Integer = OptionNA<i32>;
pub type Double = OptionNA<f64>;
pub type Character = OptionNA<String>;

impl<T> PartialOrd for OptionNA<T>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (OptionNA::Some(l), OptionNA::Some(r)) => l.partial_cmp(r),
            _ => None,
        }
    }
}

impl<T> OptionNA<T> {
    pub fn map<F, U>(self, f: F) -> OptionNA<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            OptionNA::Some(x) => OptionNA::Some(f(x)),
            OptionNA::NA => OptionNA::NA,
        }
    }

    pub fn and_then<F, U>(self, f: F) -> OptionNA<U>
    where
        F: FnOnce(T) -> OptionNA<U>,
    {
        match self {
            OptionNA::Some(x) => f(x),
            OptionNA::NA => OptionNA::NA,
        }
    }

    pub fn as_option(self) -> Option<T> {
        match self {
            OptionNA::Some(x) => Option::Some(x),
            OptionNA::NA => Option::None,
        }
    }

    pub fn is_na(&self) -> bool {
        matches!(self, OptionNA::NA)
    }
}

impl OptionNA<f64> {
    /// Missing for both `NA` and `NaN`
    pub fn is_missing(&self) -> bool {
        match self {
            OptionNA::Some(x) => x.is_nan(),
            OptionNA::NA => true,
        }
    }
}

impl<T> From<Option<T>> for OptionNA<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(x) => OptionNA::Some(x),
            None => OptionNA::NA,
        }
    }
}

impl<T> Display for OptionNA<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionNA::Some(x) => write!(f, "{}", x),
            OptionNA::NA => write!(f, "NA"),
        }
    }
}

pub trait DefaultDebug {}
impl DefaultDebug for bool {}
impl DefaultDebug for i32 {}
impl DefaultDebug for f64 {}

impl<T> Debug for OptionNA<T>
where
    T: DefaultDebug + Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionNA::Some(x) => write!(f, "{}", x),
            OptionNA::NA => write!(f, "NA"),
        }
    }
}

impl Debug for OptionNA<String> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionNA::Some(x) => write!(f, "\"{}\"", x),
            OptionNA::NA => write!(f, "NA"),
        }
    }
}

impl<T> std::ops::Neg for OptionNA<T>
where
    T: std::ops::Neg<Output = T>,
{
    type Output = OptionNA<T>;
    fn neg(self) -> Self::Output {
        self.map(|x| x.neg())
    }
}

impl std::ops::Not for Logical {
    type Output = Logical;
    fn not(self) -> Self::Output {
        self.map(|x| !x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_propagates_through_map() {
        let x: Integer = OptionNA::NA;
        assert_eq!(x.map(|i| i + 1), OptionNA::NA);
        assert_eq!(OptionNA::Some(1).map(|i| i + 1), OptionNA::Some(2));
    }

    #[test]
    fn na_is_unordered() {
        assert_eq!(OptionNA::Some(1).partial_cmp(&OptionNA::NA), None);
        assert!(OptionNA::Some(1) < OptionNA::Some(2));
    }

    #[test]
    fn nan_counts_as_missing() {
        assert!(OptionNA::Some(f64::NAN).is_missing());
        assert!(!OptionNA::Some(1.0).is_missing());
    }
}
