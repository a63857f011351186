use std::sync::Arc;

use fitpick::core::{CandidatePool, PoolFilter, RawItem};
use fitpick::dispatch::{DispatchOptions, Dispatcher, JobOutcome};
use fitpick::export::{export_to_path, render_tsv};
use fitpick::import::{ColumnMap, load_sources};
use fitpick::search::{
    Enumerator, SearchOptions, SearchRequest, SourceOversizeCap, format_results, search,
};
use fitpick::test_utils::{SourceFixture, synthetic_items};
use serde_json::json;

fn scenario_fixture() -> (SourceFixture, Vec<fitpick::import::SourceSpec>) {
    let fixture = SourceFixture::new().unwrap();
    let primary = fixture
        .write_source(
            "primary",
            &json!([[10, "A"], ["20", "a型"], [8, "C"], [30, "C", "tower 2"], ["n/a", "B"]]),
        )
        .unwrap();
    let secondary = fixture
        .write_source("secondary", &json!([{"area": 5, "category": "B"}, {"size": 7, "type": "D"}]))
        .unwrap();
    (fixture, vec![primary, secondary])
}

#[test]
fn files_to_tsv() {
    let (_fixture, sources) = scenario_fixture();
    let loaded = load_sources(&sources, &ColumnMap::default()).unwrap();
    assert_eq!(loaded.items.len(), 7);
    assert_eq!(loaded.reports[0].unparsed_sizes, 1);
    assert_eq!(loaded.reports[1].loaded, 2);

    let results = search(&loaded.items, &SearchRequest::new(40.0, "secondary", 5)).unwrap();
    let tsv = render_tsv(&results);
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines[0], "rank\tsum\ttarget\tgap\titem_count\tpicks");
    assert_eq!(lines[1], "1\t33\t40\t7\t3\t20(A/primary) 5(B/secondary) 8(C/primary)");
    assert_eq!(lines.len(), 3);
}

#[test]
fn metadata_travels_with_picks() {
    let (_fixture, sources) = scenario_fixture();
    let loaded = load_sources(&sources, &ColumnMap::default()).unwrap();
    let results = search(&loaded.items, &SearchRequest::new(100.0, "secondary", 1)).unwrap();

    let tower = results[0]
        .picks
        .iter()
        .find(|pick| pick.size == 30.0)
        .expect("the 30-unit should be picked at target 100");
    assert_eq!(tower.metadata, json!(["tower 2"]));
    assert_eq!(tower.category_label, "C");
}

#[test]
fn export_writes_the_same_table() {
    let (fixture, sources) = scenario_fixture();
    let loaded = load_sources(&sources, &ColumnMap::default()).unwrap();
    let results = search(&loaded.items, &SearchRequest::new(40.0, "secondary", 5)).unwrap();

    let out = fixture.path("out/results.tsv");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();
    export_to_path(&out, &results).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), render_tsv(&results));
}

#[test]
fn oversize_cap_limits_one_source() {
    let items = vec![
        RawItem::new(95.0, "A", "secondary"),
        RawItem::new(60.0, "A", "primary"),
        RawItem::new(90.0, "B", "secondary"),
        RawItem::new(40.0, "B", "primary"),
        RawItem::new(30.0, "C", "primary"),
    ];
    let capped = SearchRequest::new(250.0, "secondary", 10).with_options(SearchOptions {
        oversize_caps: vec![SourceOversizeCap {
            source: "secondary".to_string(),
            size_threshold: 80.0,
            max_count: 1,
        }],
        ..SearchOptions::default()
    });
    let results = search(&items, &capped).unwrap();
    assert!(!results.is_empty());
    for result in &results {
        let oversized = result
            .picks
            .iter()
            .filter(|p| p.provenance == "secondary" && p.size > 80.0)
            .count();
        assert!(oversized <= 1, "rank {} breaks the cap", result.rank);
    }
}

#[test]
fn large_pool_pruning_matches_exhaustive() {
    let items = synthetic_items(80, 21);
    let request = SearchRequest::new(320.0, "secondary", 25);
    let rules = request.rules();
    let pool = CandidatePool::build(&items, &request.pool_filter());

    let (pruned, pruned_stats) = Enumerator::new(&pool, &rules, request.target).run(request.k);
    let (full, full_stats) = Enumerator::new(&pool, &rules, request.target)
        .exhaustive()
        .run(request.k);

    assert_eq!(
        format_results(pruned.into_sorted_vec(), request.target),
        format_results(full.into_sorted_vec(), request.target)
    );
    assert!(pruned_stats.pruned > 0);
    assert_eq!(full_stats.pruned, 0);
    assert!(pruned_stats.generated <= full_stats.generated);
}

#[test]
fn accepted_sources_shrink_the_pool() {
    let items = synthetic_items(30, 5);
    let accepted = vec!["secondary".to_string()];
    let pool = CandidatePool::build(
        &items,
        &PoolFilter {
            target: 1_000.0,
            accepted_sources: &accepted,
            ..PoolFilter::default()
        },
    );
    let stats = pool.stats();
    assert_eq!(stats.eligible + stats.rejected_source, items.len());
    assert!(
        pool.group(fitpick::core::UnitType::A)
            .iter()
            .all(|item| item.provenance() == "secondary")
    );
}

#[test]
fn batch_over_loaded_sources() {
    let (_fixture, sources) = scenario_fixture();
    let loaded = load_sources(&sources, &ColumnMap::default()).unwrap();
    let items: Arc<[RawItem]> = loaded.items.into();

    let dispatcher = Dispatcher::start(DispatchOptions {
        workers: 2,
        ..DispatchOptions::default()
    })
    .unwrap();
    let report = dispatcher
        .run_batch(
            &items,
            vec![
                SearchRequest::new(40.0, "secondary", 5),
                SearchRequest::new(20.0, "secondary", 5),
                SearchRequest::new(-1.0, "secondary", 5),
            ],
        )
        .unwrap();
    dispatcher.shutdown();

    assert_eq!(report.completed, 2);
    assert_eq!(report.failed, 1);
    match &report.outcomes[0] {
        JobOutcome::Completed { outcome } => assert_eq!(outcome.results[0].sum, 33.0),
        other => panic!("unexpected outcome: {other:?}"),
    }
    match &report.outcomes[1] {
        JobOutcome::Completed { outcome } => assert!(outcome.results.is_empty()),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(matches!(report.outcomes[2], JobOutcome::Failed { .. }));
}
