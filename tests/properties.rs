use paddock::{
    CarClassCar, CategoryCode, Facet, FacetValue, FilterEngine, Mode, RelationshipGraph, Relationships,
    SeriesCarClass, SeriesCategory, Selection, Visibility, expand, intersect,
};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

const CATEGORIES: [&str; 3] = ["oval", "formula", "sports_car"];

fn arb_relationships() -> impl Strategy<Value = Relationships> {
    (
        prop::collection::vec((0i64..6, 0usize..CATEGORIES.len()), 0..8),
        prop::collection::vec((0i64..6, 0i64..6), 0..12),
        prop::collection::vec((0i64..6, 0i64..8), 0..12),
    )
        .prop_map(|(categories, classes, cars)| Relationships {
            series_categories: categories
                .into_iter()
                .filter_map(|(series_id, idx)| {
                    CategoryCode::parse(CATEGORIES[idx]).ok().map(|category| SeriesCategory { series_id, category })
                })
                .collect(),
            series_car_classes: classes
                .into_iter()
                .map(|(series_id, car_class_id)| SeriesCarClass { series_id, car_class_id })
                .collect(),
            car_class_cars: cars
                .into_iter()
                .map(|(car_class_id, car_id)| CarClassCar { car_class_id, car_id })
                .collect(),
        })
}

fn arb_value() -> impl Strategy<Value = FacetValue> {
    prop_oneof![
        (0usize..CATEGORIES.len()).prop_map(|idx| FacetValue::category(CATEGORIES[idx]).unwrap()),
        (0i64..6).prop_map(FacetValue::Series),
        (0i64..6).prop_map(FacetValue::CarClass),
        (0i64..8).prop_map(FacetValue::Car),
        (0i64..4).prop_map(FacetValue::Track),
    ]
}

fn arb_selection() -> impl Strategy<Value = Selection> {
    prop::collection::vec(arb_value(), 0..6).prop_map(Selection::from_iter)
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Normal), Just(Mode::Event)]
}

fn arb_set() -> impl Strategy<Value = BTreeSet<u8>> {
    prop::collection::btree_set(0u8..16, 0..8)
}

fn arb_map() -> impl Strategy<Value = HashMap<u8, BTreeSet<u8>>> {
    prop::collection::hash_map(0u8..16, arb_set(), 0..8)
}

proptest! {
    #[test]
    fn graph_build_ignores_record_order(rels in arb_relationships(), mode in arb_mode()) {
        let mut reversed = rels.clone();
        reversed.series_categories.reverse();
        reversed.series_car_classes.reverse();
        reversed.car_class_cars.reverse();

        let graph = RelationshipGraph::build(&rels, mode);
        prop_assert_eq!(&graph, &RelationshipGraph::build(&rels, mode));
        prop_assert_eq!(&graph, &RelationshipGraph::build(&reversed, mode));
    }

    #[test]
    fn intersect_is_commutative_and_associative(a in arb_set(), b in arb_set(), c in arb_set()) {
        prop_assert_eq!(intersect(&a, &b), intersect(&b, &a));
        prop_assert_eq!(intersect(&intersect(&a, &b), &c), intersect(&a, &intersect(&b, &c)));
    }

    #[test]
    fn expand_distributes_over_union(a in arb_set(), b in arb_set(), map in arb_map()) {
        let union: BTreeSet<u8> = a.union(&b).copied().collect();
        let separately: BTreeSet<u8> = expand(&a, &map).union(&expand(&b, &map)).copied().collect();
        prop_assert_eq!(expand(&union, &map), separately);
    }

    #[test]
    fn settled_selections_are_visible(rels in arb_relationships(), mode in arb_mode(), mut sel in arb_selection()) {
        let engine = FilterEngine::from_relationships(&rels, mode);
        let settled = engine.settle(&mut sel);

        for value in sel.iter() {
            prop_assert!(settled.visibility.allows(value), "{} selected but hidden", value);
            prop_assert!(mode.facets().has(value.facet()));
        }
        prop_assert_eq!(settled.visibility.get(Facet::Track), Some(&Visibility::Unconstrained));

        let stable = sel.clone();
        let again = engine.settle(&mut sel);
        prop_assert_eq!(&sel, &stable);
        prop_assert_eq!(again.visibility, settled.visibility);
        prop_assert_eq!(again.metrics.pruned(), 0);
    }

    #[test]
    fn settling_only_removes(rels in arb_relationships(), mode in arb_mode(), sel in arb_selection()) {
        let engine = FilterEngine::from_relationships(&rels, mode);
        let mut settled = sel.clone();
        engine.settle(&mut settled);
        prop_assert!(settled.iter().all(|value| sel.contains(value)));
    }
}
