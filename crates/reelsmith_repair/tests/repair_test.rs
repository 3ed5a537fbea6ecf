//! Recovery behavior of the tolerant parser on realistic model replies.

use reelsmith_repair::{RepairConfig, RepairStrategy, TolerantParser};
use serde::Deserialize;
use serde_json::json;

const MALFORMED_REPLIES: &[&str] = &[
    r#"{"title": "Rain", "estimatedEpisodes": 6}"#,
    "```json\n{\"title\": \"Rain\"}\n```",
    "```\n[{\"d1\": \"Lin\"}]\n```",
    "{\"summary\": \"she walked\nout\tinto the rain\"}",
    r#"{"events": [{"id": "E01"}, {"id": "E02"},],}"#,
    r#"{title: "Rain", estimatedEpisodes: 6}"#,
    r#"Here is the architecture: {"episodes": [{"number": 1}]} Let me know!"#,
    r#"{"events": [{"id": "E01", "summary": "Lin returns"#,
    r#"{"title": "Rain", "estimatedEpisodes": 9, "events": [{"id": "E01" "summary": "x"}], "characters": [{"name": "Lin"}]"#,
];

#[test]
fn recovery_is_idempotent() {
    let parser = TolerantParser::default();
    for reply in MALFORMED_REPLIES {
        let first = parser
            .parse(reply)
            .unwrap_or_else(|| panic!("unrecoverable: {reply}"));
        let second = parser.parse(&first.to_string()).expect("re-parse");
        assert_eq!(first, second, "not idempotent for {reply}");
    }
}

#[test]
fn serialized_values_parse_back_unchanged() {
    let parser = TolerantParser::default();
    let values = [
        json!({}),
        json!([]),
        json!({"a": {}, "b": [[], {}]}),
        json!({
            "title": "雨夜 · 第1集",
            "clapper": "🎬",
            "quote": "she said \"no\"",
            "path": "C:\\reels\\one",
            "lines": "one\ntwo\tthree",
            "fence": "``` not a fence"
        }),
        json!({
            "ints": [0, -7, 9007199254740991u64],
            "floats": [0.5, -0.00125, 1e21],
            "flags": [true, false, null]
        }),
        json!([{"nested": [{"deeper": [{"id": "E01", "dependsOn": []}]}]}]),
        json!("a bare string"),
        json!(42),
    ];
    for value in values {
        assert_eq!(parser.parse(&value.to_string()).as_ref(), Some(&value));
        let pretty = serde_json::to_string_pretty(&value).unwrap();
        assert_eq!(parser.parse(&pretty).as_ref(), Some(&value));
    }
}

#[test]
fn backticks_inside_fenced_string_survive() {
    let repaired = TolerantParser::default()
        .repair("```json\n{\"visual\": \"sign reads ``` here\", \"b\": 1}\n```")
        .unwrap();
    assert_eq!(repaired.strategy, RepairStrategy::Fence);
    assert_eq!(repaired.value, json!({"visual": "sign reads ``` here", "b": 1}));
}

#[test]
fn backticks_inside_unfenced_string_survive() {
    let repaired = TolerantParser::default()
        .repair(r#"Result: {"visual": "a ``` mark", "b": 1} done"#)
        .unwrap();
    assert_eq!(repaired.strategy, RepairStrategy::Balanced);
    assert_eq!(repaired.value, json!({"visual": "a ``` mark", "b": 1}));
}

#[test]
fn fence_cut_inside_string_falls_back_to_whole_reply() {
    let repaired = TolerantParser::default()
        .repair("Note:\n{\"visual\": \"x\n```\ny\", \"b\": 1}")
        .unwrap();
    assert_eq!(repaired.value, json!({"visual": "x\n```\ny", "b": 1}));
}

#[test]
fn fenced_reply_equals_bare_reply() {
    let parser = TolerantParser::default();
    let bare = r#"[{"d1": "Lin", "d2": "rainy street"}]"#;
    for fenced in [
        format!("```json\n{bare}\n```"),
        format!("```\n{bare}\n```"),
        format!("```JSON\n{bare}"),
        format!("Sure:\n```json\n{bare}\n```\nAnything else?"),
    ] {
        assert_eq!(parser.parse(&fenced), parser.parse(bare), "{fenced}");
    }
}

#[test]
fn raw_newline_inside_string_is_preserved() {
    let repaired = TolerantParser::default()
        .repair("{\"narration\": \"line one\nline two\"}")
        .unwrap();
    assert_eq!(repaired.strategy, RepairStrategy::ControlChars);
    assert_eq!(repaired.value["narration"], "line one\nline two");
}

#[test]
fn string_contents_are_never_rewritten() {
    let value = TolerantParser::default()
        .parse("{key: \"a, } b\", \"other\": \"x: y,]\",}")
        .unwrap();
    assert_eq!(value, json!({"key": "a, } b", "other": "x: y,]"}));
}

#[test]
fn partial_extraction_marks_result() {
    let reply = r#"{"title": "Rain", "estimatedEpisodes": 9, "events": [{"id": "E01" "summary": "x"}], "characters": [{"name": "Lin"}]"#;
    let repaired = TolerantParser::default().repair(reply).unwrap();

    assert_eq!(repaired.strategy, RepairStrategy::Partial);
    let value = repaired.value;
    assert_eq!(value["_parseError"], true);
    assert_eq!(value["title"], "Rain");
    assert_eq!(value["estimatedEpisodes"], 9);
    assert_eq!(value["characters"], json!([{"name": "Lin"}]));
    assert_eq!(value["events"], json!([]));
    assert!(value["_rawContent"].as_str().unwrap().starts_with("{\"title\""));
}

#[test]
fn raw_preview_length_is_configurable() {
    let parser = TolerantParser::new(RepairConfig::default().with_raw_preview_len(10));
    let value = parser
        .parse(r#"{"title": "Rain" "estimatedEpisodes": 3"#)
        .unwrap();
    assert_eq!(value["_rawContent"].as_str().unwrap().chars().count(), 10);
}

#[test]
fn partial_fields_are_configurable() {
    let parser =
        TolerantParser::new(RepairConfig::default().with_partial_fields(vec!["mood".to_string()]));
    let value = parser.parse(r#"{"mood": "tense" "title": "x""#).unwrap();
    assert_eq!(value["mood"], "tense");
    assert!(value.get("title").is_none());
}

#[derive(Debug, Deserialize, PartialEq)]
struct Description {
    d1: String,
}

#[test]
fn parse_as_deserializes_recovered_value() {
    let parser = TolerantParser::default();
    let parsed: Vec<Description> = parser.parse_as("```json\n[{\"d1\": \"Lin\"},]\n```").unwrap();
    assert_eq!(parsed, vec![Description { d1: "Lin".to_string() }]);
}

#[test]
fn parse_as_reports_unrecoverable_and_mistyped() {
    let parser = TolerantParser::default();
    let err = parser.parse_as::<Vec<Description>>("no json at all").unwrap_err();
    assert!(format!("{err}").contains("No JSON could be recovered"));

    let err = parser.parse_as::<Vec<Description>>(r#"{"d1": 3}"#).unwrap_err();
    assert!(format!("{err}").contains("unexpected shape"));
}

#[test]
fn config_defaults_from_empty_toml() {
    let config: RepairConfig = toml::from_str("").unwrap();
    assert_eq!(config, RepairConfig::default());
    assert_eq!(*config.raw_preview_len(), 1000);
}
