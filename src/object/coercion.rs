use super::na::OptionNA;

/// Lossless element conversion
///
/// Implemented only for widening conversions along the primitive hierarchy
/// `logical < integer < double`. Narrowing conversions go through
/// [`NarrowInto`], which reports whether information was lost.
///
pub trait CoercibleInto<T>: Sized {
    fn coerce_into(self) -> T;
}

impl CoercibleInto<bool> for bool {
    #[inline]
    fn coerce_into(self) -> bool {
        self
    }
}

impl CoercibleInto<i32> for bool {
    #[inline]
    fn coerce_into(self) -> i32 {
        self as i32
    }
}

impl CoercibleInto<f64> for bool {
    #[inline]
    fn coerce_into(self) -> f64 {
        self as i32 as f64
    }
}

impl CoercibleInto<i32> for i32 {
    #[inline]
    fn coerce_into(self) -> i32 {
        self
    }
}

impl CoercibleInto<f64> for i32 {
    #[inline]
    fn coerce_into(self) -> f64 {
        self as f64
    }
}

impl CoercibleInto<f64> for f64 {
    #[inline]
    fn coerce_into(self) -> f64 {
        self
    }
}

impl<T, U> CoercibleInto<OptionNA<U>> for OptionNA<T>
where
    T: CoercibleInto<U>,
{
    #[inline]
    fn coerce_into(self) -> OptionNA<U> {
        self.map(|i| i.coerce_into())
    }
}

/// Result of a narrowing element conversion
///
/// Both variants carry a best-effort value; `Lossy` marks that the value
/// could not be represented faithfully in the target.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Narrowed<T> {
    Exact(T),
    Lossy(T),
}

impl<T> Narrowed<T> {
    pub fn is_lossy(&self) -> bool {
        matches!(self, Narrowed::Lossy(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Narrowed::Exact(x) | Narrowed::Lossy(x) => x,
        }
    }
}

/// Potentially lossy element conversion
pub trait NarrowInto<T>: Sized {
    fn narrow_into(self) -> Narrowed<T>;
}

impl NarrowInto<OptionNA<i32>> for OptionNA<f64> {
    fn narrow_into(self) -> Narrowed<OptionNA<i32>> {
        use Narrowed::*;
        match self {
            OptionNA::NA => Exact(OptionNA::NA),
            OptionNA::Some(x) if x.is_nan() => Exact(OptionNA::NA),
            OptionNA::Some(x) if !x.is_finite() => Lossy(OptionNA::NA),
            OptionNA::Some(x) if x < i32::MIN as f64 || x > i32::MAX as f64 => {
                Lossy(OptionNA::NA)
            }
            OptionNA::Some(x) if x.fract() != 0.0 => Lossy(OptionNA::Some(x.trunc() as i32)),
            OptionNA::Some(x) => Exact(OptionNA::Some(x as i32)),
        }
    }
}

impl NarrowInto<OptionNA<bool>> for OptionNA<f64> {
    fn narrow_into(self) -> Narrowed<OptionNA<bool>> {
        use Narrowed::*;
        match self {
            OptionNA::NA => Exact(OptionNA::NA),
            OptionNA::Some(x) if x.is_nan() => Exact(OptionNA::NA),
            OptionNA::Some(x) if x == 0.0 => Exact(OptionNA::Some(false)),
            OptionNA::Some(x) if x == 1.0 => Exact(OptionNA::Some(true)),
            OptionNA::Some(_) => Lossy(OptionNA::Some(true)),
        }
    }
}

impl NarrowInto<OptionNA<bool>> for OptionNA<i32> {
    fn narrow_into(self) -> Narrowed<OptionNA<bool>> {
        use Narrowed::*;
        match self {
            OptionNA::NA => Exact(OptionNA::NA),
            OptionNA::Some(0) => Exact(OptionNA::Some(false)),
            OptionNA::Some(1) => Exact(OptionNA::Some(true)),
            OptionNA::Some(_) => Lossy(OptionNA::Some(true)),
        }
    }
}

/// Narrow every element, returning the converted values and the positions
/// that lost information
pub fn narrow_all<T, U>(values: &[T]) -> (Vec<U>, Vec<usize>)
where
    T: NarrowInto<U> + Clone,
{
    let mut lossy = vec![];
    let out = values
        .iter()
        .enumerate()
        .map(|(i, x)| {
            let n = x.clone().narrow_into();
            if n.is_lossy() {
                lossy.push(i);
            }
            n.into_inner()
        })
        .collect();

    (out, lossy)
}

/// Widen every element
pub fn coerce_all<T, U>(values: &[T]) -> Vec<U>
where
    T: CoercibleInto<U> + Clone,
{
    values.iter().map(|x| x.clone().coerce_into()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Double, Integer, Logical};

    #[test]
    fn widening_keeps_missing() {
        let x: Vec<Logical> = vec![OptionNA::Some(true), OptionNA::NA];
        let y: Vec<Double> = coerce_all(&x);
        assert_eq!(y, vec![OptionNA::Some(1.0), OptionNA::NA]);
    }

    #[test]
    fn fractional_doubles_are_lossy_integers() {
        let x: Vec<Double> = vec![
            OptionNA::Some(1.5),
            OptionNA::Some(2.0),
            OptionNA::Some(10.5),
        ];
        let (y, lossy): (Vec<Integer>, _) = narrow_all(&x);
        assert_eq!(
            y,
            vec![OptionNA::Some(1), OptionNA::Some(2), OptionNA::Some(10)]
        );
        assert_eq!(lossy, vec![0, 2]);
    }

    #[test]
    fn out_of_range_doubles_become_missing() {
        let x: Vec<Double> = vec![OptionNA::Some(1e12), OptionNA::Some(f64::NAN)];
        let (y, lossy): (Vec<Integer>, _) = narrow_all(&x);
        assert_eq!(y, vec![OptionNA::NA, OptionNA::NA]);
        assert_eq!(lossy, vec![0]);
    }

    #[test]
    fn only_zero_and_one_narrow_to_logical() {
        let x: Vec<Integer> = vec![OptionNA::Some(0), OptionNA::Some(1), OptionNA::Some(2)];
        let (y, lossy): (Vec<Logical>, _) = narrow_all(&x);
        assert_eq!(
            y,
            vec![
                OptionNA::Some(false),
                OptionNA::Some(true),
                OptionNA::Some(true)
            ]
        );
        assert_eq!(lossy, vec![2]);
    }
}
