use fitpick::core::{RawItem, UnitType};
use fitpick::search::{AntiDominance, SearchOptions, SearchRequest, search, search_with_stats};
use fitpick::test_utils::{scenario_items, synthetic_items};

fn sizes_by_type(result: &fitpick::search::SearchResult) -> Vec<(UnitType, f64)> {
    result.picks.iter().map(|p| (p.unit_type, p.size)).collect()
}

#[test]
fn best_three_unit_fit_comes_first() {
    let results = search(&scenario_items(), &SearchRequest::new(40.0, "secondary", 5)).unwrap();

    let best = &results[0];
    assert_eq!(best.sum, 33.0);
    assert_eq!(best.gap, 7.0);
    assert_eq!(best.item_count, 3);
    assert_eq!(
        sizes_by_type(best),
        vec![(UnitType::A, 20.0), (UnitType::B, 5.0), (UnitType::C, 8.0)]
    );
    assert_eq!(best.picks[1].label, "B/secondary");

    // {10, 20, 5, 8} would be 43 and must never appear.
    assert!(results.iter().all(|r| r.sum <= 40.0));
    assert!(results.iter().all(|r| r.item_count == 3));
}

#[test]
fn smaller_closing_units_rank_below() {
    let results = search(&scenario_items(), &SearchRequest::new(40.0, "secondary", 5)).unwrap();
    let sums: Vec<f64> = results.iter().map(|r| r.sum).collect();
    assert_eq!(sums, vec![33.0, 23.0]);
    assert_eq!(results[1].rank, 2);
}

#[test]
fn decimal_sizes_hit_the_target_exactly() {
    let items = vec![
        RawItem::new(60.0, "A", "secondary"),
        RawItem::new(72.3, "B", "secondary"),
        RawItem::new(64.3, "C", "secondary"),
    ];
    let results = search(&items, &SearchRequest::new(196.6, "secondary", 3)).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].sum, 196.6);
    assert_eq!(results[0].gap, 0.0);
    assert!(results[0].gap.is_sign_positive());
}

#[test]
fn target_below_smallest_combination_is_empty() {
    let results = search(&scenario_items(), &SearchRequest::new(20.0, "secondary", 5)).unwrap();
    assert!(results.is_empty());
}

#[test]
fn k_one_keeps_first_of_equal_sums() {
    let items = vec![
        RawItem::new(10.0, "A", "primary"),
        RawItem::new(11.0, "A", "primary"),
        RawItem::new(5.0, "B", "secondary"),
        RawItem::new(7.0, "C", "primary"),
        RawItem::new(8.0, "C", "primary"),
    ];
    let request = SearchRequest::new(23.0, "secondary", 1);
    let results = search(&items, &request).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].sum, 23.0);
    assert_eq!(
        sizes_by_type(&results[0]),
        vec![(UnitType::A, 11.0), (UnitType::B, 5.0), (UnitType::C, 7.0)]
    );

    let wider = search(&items, &SearchRequest::new(23.0, "secondary", 2)).unwrap();
    assert_eq!(wider.len(), 2);
    assert_eq!(wider[0], results[0]);
    assert_eq!(wider[1].sum, 23.0);
}

#[test]
fn anti_dominance_rejects_one_large_unit() {
    let items = vec![
        RawItem::new(120.0, "A", "secondary"),
        RawItem::new(80.0, "A", "secondary"),
        RawItem::new(30.0, "B", "primary"),
        RawItem::new(20.0, "C", "primary"),
    ];
    let plain = search(&items, &SearchRequest::new(200.0, "secondary", 5)).unwrap();
    assert_eq!(plain[0].sum, 170.0);

    let guarded = SearchRequest::new(200.0, "secondary", 5).with_options(SearchOptions {
        anti_dominance: Some(AntiDominance::new(100.0, 70.0)),
        ..SearchOptions::default()
    });
    let outcome = search_with_stats(&items, &guarded).unwrap();
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].sum, 130.0);
    assert_eq!(outcome.stats.rejected.get("anti_dominance"), Some(&1));
}

#[test]
fn disabled_anti_dominance_is_inert() {
    let items = vec![
        RawItem::new(120.0, "A", "secondary"),
        RawItem::new(30.0, "B", "primary"),
        RawItem::new(20.0, "C", "primary"),
    ];
    let request = SearchRequest::new(200.0, "secondary", 5).with_options(SearchOptions {
        anti_dominance: Some(AntiDominance {
            enabled: false,
            ..AntiDominance::new(100.0, 70.0)
        }),
        ..SearchOptions::default()
    });
    assert_eq!(search(&items, &request).unwrap()[0].sum, 170.0);
}

#[test]
fn missing_type_gives_empty_result_not_error() {
    let items: Vec<RawItem> = scenario_items()
        .into_iter()
        .filter(|item| item.category_label != "C")
        .collect();
    let outcome = search_with_stats(&items, &SearchRequest::new(40.0, "secondary", 5)).unwrap();
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.stats.generated, 0);
}

#[test]
fn noisy_rows_are_dropped_and_counted() {
    let mut items = scenario_items();
    items.push(RawItem::new(f64::NAN, "A", "primary"));
    items.push(RawItem::new(-3.0, "B", "primary"));
    items.push(RawItem::new(6.0, "E", "primary"));
    items.push(RawItem::new(6.0, "D", "primary"));
    let outcome = search_with_stats(&items, &SearchRequest::new(40.0, "secondary", 5)).unwrap();

    assert_eq!(outcome.pool.invalid_size, 2);
    assert_eq!(outcome.pool.unrecognized_type, 1);
    assert_eq!(outcome.pool.unsearchable_type, 1);
    assert_eq!(outcome.results[0].sum, 33.0);
}

#[test]
fn duplicated_type_fills_the_gap() {
    let items = vec![
        RawItem::new(30.0, "A", "primary"),
        RawItem::new(31.0, "A", "primary"),
        RawItem::new(20.0, "B", "secondary"),
        RawItem::new(15.0, "C", "primary"),
    ];
    let results = search(&items, &SearchRequest::new(100.0, "secondary", 3)).unwrap();
    assert_eq!(results[0].sum, 96.0);
    assert_eq!(results[0].item_count, 4);
    assert_eq!(
        sizes_by_type(&results[0]),
        vec![
            (UnitType::A, 30.0),
            (UnitType::A, 31.0),
            (UnitType::B, 20.0),
            (UnitType::C, 15.0)
        ]
    );
}

#[test]
fn repeated_runs_are_identical() {
    let items = synthetic_items(60, 11);
    let request = SearchRequest::new(300.0, "secondary", 8);
    let first = search(&items, &request).unwrap();
    for _ in 0..3 {
        assert_eq!(search(&items, &request).unwrap(), first);
    }
    assert_eq!(first.len(), 8);
}
