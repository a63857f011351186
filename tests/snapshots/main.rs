//! Inline snapshots of the external result shapes.

use fitpick::core::{CandidatePool, PoolFilter, RawItem, normalize_type};
use fitpick::dispatch::JobOutcome;
use fitpick::export::{TSV_HEADERS, render_row};
use fitpick::search::{SearchRequest, search};
use fitpick::test_utils::scenario_items;
use insta::assert_snapshot;

fn scenario_results() -> Vec<fitpick::search::SearchResult> {
    search(&scenario_items(), &SearchRequest::new(40.0, "secondary", 5)).unwrap()
}

#[test]
fn tsv_header() {
    assert_snapshot!(TSV_HEADERS.join(" | "), @"rank | sum | target | gap | item_count | picks");
}

#[test]
fn tsv_rows() {
    let rows: Vec<String> = scenario_results()
        .iter()
        .map(|result| render_row(result).join(" | "))
        .collect();
    assert_snapshot!(&rows[0], @"1 | 33 | 40 | 7 | 3 | 20(A/primary) 5(B/secondary) 8(C/primary)");
    assert_snapshot!(&rows[1], @"2 | 23 | 40 | 17 | 3 | 10(A/primary) 5(B/secondary) 8(C/primary)");
}

#[test]
fn normalized_labels() {
    let labels = ["A", "b", " c型 ", "D", "AB", "型", "", "E"];
    let rendered: Vec<String> = labels
        .iter()
        .map(|label| normalize_type(label).map_or_else(|| "-".to_string(), |t| t.to_string()))
        .collect();
    assert_snapshot!(rendered.join(","), @"A,B,C,D,-,-,-,-");
}

#[test]
fn top_result_json() {
    let results = scenario_results();
    let json = serde_json::to_string(&results[0]).unwrap();
    assert_snapshot!(json, @r#"{"rank":1,"item_count":3,"sum":33.0,"target":40.0,"gap":7.0,"picks":[{"size":20.0,"unit_type":"A","category_label":"A","provenance":"primary","label":"A/primary"},{"size":5.0,"unit_type":"B","category_label":"B","provenance":"secondary","label":"B/secondary"},{"size":8.0,"unit_type":"C","category_label":"C","provenance":"primary","label":"C/primary"}]}"#);
}

#[test]
fn pool_stats_json() {
    let mut items = scenario_items();
    items.push(RawItem::new(f64::NAN, "A", "primary"));
    items.push(RawItem::new(6.0, "D", "primary"));
    items.push(RawItem::new(90.0, "C", "primary"));
    let pool = CandidatePool::build(
        &items,
        &PoolFilter {
            target: 40.0,
            ..PoolFilter::default()
        },
    );
    let json = serde_json::to_string(pool.stats()).unwrap();
    assert_snapshot!(json, @r#"{"total_rows":8,"eligible":5,"invalid_size":1,"unrecognized_type":0,"unsearchable_type":1,"rejected_source":0,"out_of_bounds":0,"over_target":1}"#);
}

#[test]
fn timed_out_outcome_json() {
    let json = serde_json::to_string(&JobOutcome::TimedOut).unwrap();
    assert_snapshot!(json, @r#"{"status":"timed_out"}"#);
}
