use proptest::prelude::*;

use vctr::object::{Integer, OptionNA, Prototype, Vctr};
use vctr::registry::Registry;
use vctr::types::{cached_sum, decimal, distance, rational};

fn any_ptype() -> impl Strategy<Value = Prototype> {
    let units = prop::sample::select(vec![
        distance::Unit::Mm,
        distance::Unit::Cm,
        distance::Unit::M,
        distance::Unit::Km,
    ]);

    prop_oneof![
        Just(Prototype::unspecified()),
        Just(Prototype::logical()),
        Just(Prototype::integer()),
        Just(Prototype::double()),
        Just(Prototype::character()),
        (0..6i32).prop_map(decimal::ptype),
        units.prop_map(distance::ptype),
        Just(rational::ptype()),
        Just(cached_sum::ptype()),
    ]
}

fn integers() -> impl Strategy<Value = Vec<Integer>> {
    prop::collection::vec(prop::option::of(any::<i32>()), 0..32)
        .prop_map(|v| v.into_iter().map(OptionNA::from).collect())
}

#[test]
fn bundled_common_types_are_symmetric() {
    assert_eq!(Registry::default().check_symmetry(), vec![]);
}

proptest! {
    #[test]
    fn common_type_is_commutative(x in any_ptype(), y in any_ptype()) {
        let r = Registry::default();
        match (r.common_type(&x, &y), r.common_type(&y, &x)) {
            (Ok(xy), Ok(yx)) => prop_assert_eq!(xy, yx),
            (Err(_), Err(_)) => (),
            (xy, yx) => prop_assert!(false, "{x} and {y} disagree: {xy:?} vs {yx:?}"),
        }
    }

    #[test]
    fn common_type_is_reflexive(x in any_ptype()) {
        let r = Registry::default();
        prop_assert_eq!(r.common_type(&x, &x), Ok(x));
    }

    #[test]
    fn casting_to_own_type_is_identity(v in integers(), digits in 0..4i32) {
        let r = Registry::default();

        let x = Vctr::from(v.clone());
        prop_assert_eq!(r.cast(&x, &r.ptype(&x)?), Ok(x));

        let doubles: Vec<f64> = v.iter().filter_map(|i| i.clone().as_option()).map(f64::from).collect();
        let x = decimal::decimal(&r, doubles, digits)?;
        prop_assert_eq!(r.cast(&x, &r.ptype(&x)?), Ok(x));
    }

    #[test]
    fn integers_round_trip_through_doubles(v in integers()) {
        let r = Registry::default();
        let x = Vctr::from(v);

        let there = r.cast_with_diagnostics(&x, &Prototype::double())?;
        prop_assert!(!there.is_lossy());

        let back = r.cast_with_diagnostics(&there.value, &Prototype::integer())?;
        prop_assert!(!back.is_lossy());
        prop_assert_eq!(back.value, x);
    }

    #[test]
    fn narrowing_flags_exactly_the_elements_that_change(
        v in prop::collection::vec(prop_oneof![-1e9f64..1e9, (-1000..1000i32).prop_map(f64::from)], 0..32),
    ) {
        let r = Registry::default();
        let x = Vctr::from(v.clone());

        let there = r.cast_with_diagnostics(&x, &Prototype::integer())?;
        let back = r.cast(&there.value, &Prototype::double())?;
        let back = back.as_doubles().unwrap_or_default();
        prop_assert_eq!(back.len(), v.len());

        let flagged = there.locations();
        for (i, (before, after)) in v.iter().zip(back).enumerate() {
            let changed = *after != OptionNA::Some(*before);
            prop_assert_eq!(changed, flagged.contains(&i), "element {} ({})", i, before);
        }
    }

    #[test]
    fn record_length_follows_slicing(
        pairs in prop::collection::vec((any::<i32>(), 1..100i32), 1..16),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..16),
    ) {
        let r = Registry::default();
        let (num, den): (Vec<i32>, Vec<i32>) = pairs.into_iter().unzip();
        let x = rational::rational(&r, num, den)?;

        let indices: Vec<usize> = picks.iter().map(|i| i.index(x.len())).collect();
        let y = r.slice(&x, &indices)?;

        prop_assert_eq!(y.len(), indices.len());
        for (_, field) in y.fields().unwrap_or_default() {
            prop_assert_eq!(field.len(), indices.len());
        }
    }

    #[test]
    fn order_is_stable_with_missing_last(v in integers()) {
        let r = Registry::default();
        let order = r.order(&Vctr::from(v.clone()), false)?;
        prop_assert_eq!(order.len(), v.len());

        for w in order.windows(2) {
            let (i, j) = (w[0], w[1]);
            match (v[i].clone().as_option(), v[j].clone().as_option()) {
                (Some(a), Some(b)) => prop_assert!(a < b || (a == b && i < j)),
                (Some(_), None) => (),
                (None, None) => prop_assert!(i < j),
                (None, Some(_)) => prop_assert!(false, "missing sorted before a value"),
            }
        }
    }

    #[test]
    fn unique_values_are_pairwise_distinct(v in integers()) {
        let r = Registry::default();
        let x = Vctr::from(v);
        let u = r.unique(&x)?;
        prop_assert!(r.duplicated(&u)?.iter().all(|d| !d));
        prop_assert_eq!(r.unique(&r.combine(&[x.clone(), x])?)?, u);
    }
}
