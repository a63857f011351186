//! Property-based invariants for the combination search.

use std::collections::HashSet;

use fitpick::core::{CandidatePool, RawItem, UnitType};
use fitpick::search::{Enumerator, SearchRequest, SearchResult, format_results, search};
use proptest::prelude::*;

const LABELS: [&str; 5] = ["A", "B", "C", "D", "X"];
const SOURCES: [&str; 2] = ["primary", "secondary"];

fn item_strategy() -> impl Strategy<Value = RawItem> {
    (1u32..60, 0usize..LABELS.len(), 0usize..SOURCES.len())
        .prop_map(|(size, label, source)| RawItem::new(f64::from(size), LABELS[label], SOURCES[source]))
}

fn items_strategy(max: usize) -> impl Strategy<Value = Vec<RawItem>> {
    prop::collection::vec(item_strategy(), 0..max)
}

fn type_counts(result: &SearchResult) -> [usize; 3] {
    let mut counts = [0; 3];
    for pick in &result.picks {
        if let Some(idx) = pick.unit_type.group_index() {
            counts[idx] += 1;
        }
    }
    counts
}

/// Best reachable sum by checking every 3- and 4-item subset.
fn brute_force_best(items: &[RawItem], target: f64) -> Option<f64> {
    let usable: Vec<(f64, usize)> = items
        .iter()
        .filter_map(|item| {
            let unit = fitpick::core::normalize_type(&item.category_label)?;
            Some((item.size, unit.group_index()?))
        })
        .collect();
    let n = usable.len();
    let mut best: Option<f64> = None;
    let mut check = |members: &[usize]| {
        let mut counts = [0; 3];
        let mut sum = 0.0;
        for &m in members {
            counts[usable[m].1] += 1;
            sum += usable[m].0;
        }
        if counts.iter().all(|&c| c >= 1) && sum <= target {
            best = Some(best.map_or(sum, |b: f64| b.max(sum)));
        }
    };
    for i in 0..n {
        for j in i + 1..n {
            for l in j + 1..n {
                check(&[i, j, l]);
                for m in l + 1..n {
                    check(&[i, j, l, m]);
                }
            }
        }
    }
    best
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn results_respect_every_constraint(
        items in items_strategy(30),
        target in 10u32..150,
        k in 1usize..8,
    ) {
        let target = f64::from(target);
        let results = search(&items, &SearchRequest::new(target, "secondary", k)).unwrap();

        prop_assert!(results.len() <= k);
        for (idx, result) in results.iter().enumerate() {
            prop_assert_eq!(result.rank, idx + 1);
            prop_assert!(result.sum <= target);
            prop_assert!(result.gap >= 0.0);
            prop_assert!(result.item_count == 3 || result.item_count == 4);
            prop_assert_eq!(result.item_count, result.picks.len());

            let counts = type_counts(result);
            prop_assert!(counts.iter().all(|&c| c >= 1));
            prop_assert_eq!(counts.iter().sum::<usize>(), result.item_count);
            prop_assert!(result.picks.iter().all(|p| p.unit_type != UnitType::D));
            prop_assert!(result.picks.iter().any(|p| p.provenance == "secondary"));

            let total: f64 = result.picks.iter().map(|p| p.size).sum();
            prop_assert_eq!(total, result.sum);
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].sum >= pair[1].sum);
        }
    }

    #[test]
    fn no_combination_is_reported_twice(
        items in items_strategy(30),
        target in 10u32..150,
    ) {
        let results = search(&items, &SearchRequest::new(f64::from(target), "secondary", 20)).unwrap();
        let mut seen = HashSet::new();
        for result in &results {
            let key: Vec<(u64, UnitType, String)> = result
                .picks
                .iter()
                .map(|p| (p.size.to_bits(), p.unit_type, p.provenance.clone()))
                .collect();
            prop_assert!(seen.insert(key), "duplicate at rank {}", result.rank);
        }
    }

    #[test]
    fn pruning_never_changes_results(
        items in items_strategy(40),
        target in 10u32..150,
        k in 1usize..10,
    ) {
        let request = SearchRequest::new(f64::from(target), "secondary", k);
        let rules = request.rules();
        let pool = CandidatePool::build(&items, &request.pool_filter());

        let (pruned, _) = Enumerator::new(&pool, &rules, request.target).run(k);
        let (full, _) = Enumerator::new(&pool, &rules, request.target).exhaustive().run(k);
        prop_assert_eq!(
            format_results(pruned.into_sorted_vec(), request.target),
            format_results(full.into_sorted_vec(), request.target)
        );
    }

    #[test]
    fn search_is_deterministic(
        items in items_strategy(30),
        target in 10u32..150,
    ) {
        let request = SearchRequest::new(f64::from(target), "secondary", 5);
        prop_assert_eq!(search(&items, &request).unwrap(), search(&items, &request).unwrap());
    }

    #[test]
    fn first_result_is_the_best_reachable_sum(
        sizes in prop::collection::vec((1u32..40, 0usize..3), 0..12),
        target in 10u32..120,
    ) {
        let items: Vec<RawItem> = sizes
            .into_iter()
            .map(|(size, label)| RawItem::new(f64::from(size), LABELS[label], "secondary"))
            .collect();
        let target = f64::from(target);
        let results = search(&items, &SearchRequest::new(target, "secondary", 1)).unwrap();
        let expected = brute_force_best(&items, target);
        prop_assert_eq!(results.first().map(|r| r.sum), expected);
    }
}
