use std::collections::BTreeMap;

use chrono::NaiveDate;
use mm_core::entities::{
    DeckComparisonResult, InsightEntry, MatchupSummary, MetaSnapshot, Rationale,
};
use mm_core::ids::{ArchetypeName, ComparisonId, SnapshotId};
use mm_report::{build_model, render_html, render_json, ReportError};

fn arch(s: &str) -> ArchetypeName {
    s.parse().unwrap()
}

fn sample_result() -> DeckComparisonResult {
    let mut matchups = BTreeMap::new();
    matchups.insert(
        arch("<Gardevoir>"),
        MatchupSummary {
            win_rate: 0.6,
            confidence: 1.0,
            rationale: Rationale::Observed,
            notes: "60.0% observed win rate against <Gardevoir>.".into(),
        },
    );
    matchups.insert(
        arch("Charizard ex"),
        MatchupSummary {
            win_rate: 0.3,
            confidence: 0.5,
            rationale: Rationale::Heuristic,
            notes: "Fire attackers hit this deck for weakness.".into(),
        },
    );
    DeckComparisonResult {
        id: ComparisonId::from_hex(&"ab".repeat(32)).unwrap(),
        snapshot_id: "2024-06-regionals".parse::<SnapshotId>().unwrap(),
        snapshot_sha256: "cd".repeat(32),
        archetype: Some(arch("Lost Box")),
        similarity: 0.8,
        position: Some(2),
        overall_meta_score: 0.45,
        matchups,
        strengths: vec![InsightEntry {
            opponent: arch("<Gardevoir>"),
            win_rate: 0.6,
            meta_share: 0.2,
            weighted: 0.12,
            rationale: Rationale::Observed,
        }],
        weaknesses: vec![InsightEntry {
            opponent: arch("Charizard ex"),
            win_rate: 0.3,
            meta_share: 0.25,
            weighted: 0.075,
            rationale: Rationale::Heuristic,
        }],
        suggestions: vec!["Unfavored against Charizard ex: add answers to Fire attackers.".into()],
    }
}

fn sample_snapshot(id: &str) -> MetaSnapshot {
    MetaSnapshot {
        id: id.parse().unwrap(),
        captured_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        source: Some("regionals & cups".into()),
        total_players: 1200,
        decks: Vec::new(),
        cards: Default::default(),
    }
}

#[test]
fn model_formats_summary_and_counts() {
    let model = build_model(&sample_result(), None).unwrap();
    assert_eq!(model.cover.archetype, "Lost Box");
    assert_eq!(model.cover.similarity_pct, "80.0%");
    assert_eq!(model.summary.overall_meta_score_pct, "45.0%");
    assert_eq!(model.summary.position, "#2");
    assert_eq!(model.summary.opponents, 2);
    assert_eq!(model.summary.observed, 1);
    assert_eq!(model.summary.heuristic, 1);
    assert_eq!(model.summary.baseline, 0);
    assert_eq!(model.snapshot.items.len(), 1);
}

#[test]
fn unclassified_without_position_reads_na() {
    let mut r = sample_result();
    r.archetype = None;
    r.position = None;
    let model = build_model(&r, None).unwrap();
    assert_eq!(model.cover.archetype, "Unclassified");
    assert_eq!(model.summary.position, "n/a");
}

#[test]
fn snapshot_details_are_added_when_ids_match() {
    let snap = sample_snapshot("2024-06-regionals");
    let model = build_model(&sample_result(), Some(&snap)).unwrap();
    let keys: Vec<&str> = model.snapshot.items.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(keys, ["Snapshot", "Captured on", "Source", "Players", "Archetypes"]);
    assert_eq!(model.snapshot.items[1].value, "2024-06-01");
}

#[test]
fn mismatched_snapshot_is_rejected() {
    let snap = sample_snapshot("2024-07-worlds");
    let err = build_model(&sample_result(), Some(&snap)).unwrap_err();
    assert!(matches!(err, ReportError::Inconsistent(_)));
}

#[test]
fn html_is_escaped_and_self_contained() {
    let snap = sample_snapshot("2024-06-regionals");
    let model = build_model(&sample_result(), Some(&snap)).unwrap();
    let html = render_html(&model);

    assert!(html.starts_with("<!doctype html>"));
    assert!(html.ends_with("</body></html>"));
    assert!(html.contains("&lt;Gardevoir&gt;"));
    assert!(!html.contains("<Gardevoir>"));
    assert!(html.contains("regionals &amp; cups"));
    assert!(!html.contains("<script"));
    assert!(!html.contains("http://") && !html.contains("https://"));

    let order = ["Matchups", "Strengths", "Weaknesses", "Suggestions", "Integrity"];
    let positions: Vec<usize> = order.iter().map(|h| html.find(&format!("<h3>{h}</h3>")).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn json_report_has_sections_in_order() {
    let model = build_model(&sample_result(), None).unwrap();
    let text = render_json(&model).unwrap();
    assert!(text.ends_with('\n'));

    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["summary"]["position"], "#2");
    assert_eq!(v["matchups"][0]["opponent"], "<Gardevoir>");
    assert_eq!(v["weaknesses"][0]["rationale"], "heuristic");
    assert_eq!(v["integrity"]["comparison_id"], format!("CMP:{}", "ab".repeat(32)));

    let idx = |k: &str| text.find(&format!("\"{k}\"")).unwrap();
    assert!(idx("cover") < idx("summary"));
    assert!(idx("summary") < idx("integrity"));
}

#[test]
fn rendering_is_repeatable() {
    let model = build_model(&sample_result(), None).unwrap();
    assert_eq!(render_html(&model), render_html(&model));
    assert_eq!(render_json(&model).unwrap(), render_json(&model).unwrap());
}
