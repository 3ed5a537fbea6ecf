//! Tolerant JSON recovery for untrusted model replies.

use crate::RepairConfig;
use crate::scan::{self, preview};
use regex::Regex;
use reelsmith_error::{JsonError, ReelsmithResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Repair step whose output first parsed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategy {
    /// Input was valid JSON after trimming
    #[display("direct")]
    Direct,
    /// Fenced code block removed
    #[display("fence")]
    Fence,
    /// Raw control characters escaped inside strings
    #[display("control_chars")]
    ControlChars,
    /// Trailing commas removed
    #[display("trailing_commas")]
    TrailingCommas,
    /// Bare keys quoted
    #[display("bare_keys")]
    BareKeys,
    /// Balanced object or array extracted from surrounding text
    #[display("balanced")]
    Balanced,
    /// Missing closers appended to a truncated document
    #[display("closed")]
    Closed,
    /// Known top-level fields salvaged individually
    #[display("partial")]
    Partial,
}

/// A recovered document and the step that recovered it.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    /// Recovered value
    pub value: Value,
    /// Step that produced it
    pub strategy: RepairStrategy,
}

/// Recovers JSON from model replies that are almost, but not quite, JSON.
///
/// Steps run in a fixed order, each receiving the previous step's output, and
/// the first output that parses wins. Recovery never fails loudly: when
/// nothing can be salvaged the result is `None`.
///
/// # Examples
///
/// ```
/// use reelsmith_repair::{RepairStrategy, TolerantParser};
///
/// let parser = TolerantParser::default();
/// let reply = "```json\n{title: \"Rain\", \"events\": [1, 2,],}\n```";
/// let repaired = parser.repair(reply).unwrap();
///
/// assert_eq!(repaired.value["title"], "Rain");
/// assert_eq!(repaired.value["events"], serde_json::json!([1, 2]));
/// assert_eq!(repaired.strategy, RepairStrategy::BareKeys);
/// ```
#[derive(Debug, Clone, Default, derive_getters::Getters)]
pub struct TolerantParser {
    config: RepairConfig,
}

fn try_parse(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

fn found(value: Value, strategy: RepairStrategy) -> Option<Repaired> {
    Some(Repaired { value, strategy })
}

/// Rewrite, extract and close `text` until something parses.
///
/// On failure returns the rewritten text for partial salvage.
fn recover(text: &str) -> Result<Repaired, String> {
    let mut text = text.to_string();
    let rewrites: [(RepairStrategy, fn(&str) -> String); 3] = [
        (RepairStrategy::ControlChars, scan::escape_control_chars),
        (RepairStrategy::TrailingCommas, scan::remove_trailing_commas),
        (RepairStrategy::BareKeys, scan::quote_bare_keys),
    ];
    for (strategy, rewrite) in rewrites {
        let next = rewrite(&text);
        if next == text {
            continue;
        }
        text = next;
        if let Some(value) = try_parse(&text) {
            return Ok(Repaired { value, strategy });
        }
    }

    let mut candidates = scan::balanced_candidates(&text);
    candidates.sort_by_key(|c| std::cmp::Reverse(c.len()));
    if let Some(value) = candidates.into_iter().find_map(try_parse) {
        return Ok(Repaired {
            value,
            strategy: RepairStrategy::Balanced,
        });
    }

    if let Some(start) = text.find(['{', '[']) {
        let tail = &text[start..];
        let closed = std::iter::once(scan::close_unbalanced(tail))
            .chain(scan::cut_after_last_closer(tail).map(scan::close_unbalanced));
        for candidate in closed {
            if let Some(value) = try_parse(&candidate) {
                return Ok(Repaired {
                    value,
                    strategy: RepairStrategy::Closed,
                });
            }
        }
    }
    Err(text)
}

fn preprocess(input: &str) -> &str {
    input.trim().trim_start_matches('\u{feff}').trim_start()
}

impl TolerantParser {
    /// Parser with the given configuration.
    pub fn new(config: RepairConfig) -> Self {
        Self { config }
    }

    /// Recover a JSON value, or `None` when nothing is salvageable.
    pub fn parse(&self, input: &str) -> Option<Value> {
        self.repair(input).map(|repaired| repaired.value)
    }

    /// Recover a JSON value and report which step succeeded.
    #[tracing::instrument(skip_all, fields(input_len = input.len()))]
    pub fn repair(&self, input: &str) -> Option<Repaired> {
        let raw = preprocess(input);
        if raw.is_empty() {
            tracing::debug!("Empty reply, nothing to recover");
            return None;
        }

        let repaired = self.run_steps(raw);
        match &repaired {
            Some(r) => tracing::debug!(strategy = %r.strategy, "Recovered JSON"),
            None => tracing::warn!(preview = %preview(raw, 200), "No JSON recoverable from reply"),
        }
        repaired
    }

    /// Recover a value and deserialize it into `T`.
    ///
    /// Unlike [`parse`](Self::parse), this reports failure as a `JsonError`.
    pub fn parse_as<T: DeserializeOwned>(&self, input: &str) -> ReelsmithResult<T> {
        let value = self.parse(input).ok_or_else(|| {
            JsonError::new(format!(
                "No JSON could be recovered from reply: {}",
                preview(input.trim(), 200)
            ))
        })?;
        serde_json::from_value(value).map_err(|e| {
            JsonError::new(format!("Recovered JSON has an unexpected shape: {}", e)).into()
        })
    }

    fn run_steps(&self, raw: &str) -> Option<Repaired> {
        if let Some(value) = try_parse(raw) {
            return found(value, RepairStrategy::Direct);
        }

        let rewritten = match scan::strip_fences(raw) {
            Some(fenced) => {
                if let Some(value) = try_parse(&fenced.body) {
                    return found(value, RepairStrategy::Fence);
                }
                match recover(&fenced.body) {
                    Ok(repaired) => return Some(repaired),
                    // The block was cut out of surrounding text; the cut may
                    // have landed inside a string value.
                    Err(_) if !fenced.enclosing => match recover(raw) {
                        Ok(repaired) => return Some(repaired),
                        Err(rewritten) => rewritten,
                    },
                    Err(rewritten) => rewritten,
                }
            }
            None => match recover(raw) {
                Ok(repaired) => return Some(repaired),
                Err(rewritten) => rewritten,
            },
        };

        self.extract_partial(&rewritten, raw).map(|value| Repaired {
            value,
            strategy: RepairStrategy::Partial,
        })
    }

    /// Salvage configured top-level fields from an unrecoverable document.
    fn extract_partial(&self, text: &str, raw: &str) -> Option<Value> {
        let mut object = Map::new();
        for field in self.config.partial_fields() {
            if let Some(value) = extract_field(text, field) {
                object.insert(field.clone(), value);
            }
        }
        if object.is_empty() {
            return None;
        }

        tracing::warn!(
            fields = ?object.keys().collect::<Vec<_>>(),
            "Reply only partially recoverable"
        );
        object.insert("_parseError".to_string(), Value::Bool(true));
        object.insert(
            "_rawContent".to_string(),
            Value::String(preview(raw, *self.config.raw_preview_len())),
        );
        Some(Value::Object(object))
    }
}

/// Value of `"field": ...` wherever it first appears, salvaged on its own.
fn extract_field(text: &str, field: &str) -> Option<Value> {
    let pattern = Regex::new(&format!(r#""{}"\s*:\s*"#, regex::escape(field))).ok()?;
    let rest = &text[pattern.find(text)?.end()..];
    let first = rest.chars().next()?;

    match first {
        '[' | '{' => {
            let empty = if first == '[' {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            };
            let recovered = scan::balanced_from(rest, 0)
                .and_then(try_parse)
                .or_else(|| try_parse(&scan::close_unbalanced(rest)))
                .or_else(|| {
                    scan::cut_after_last_closer(rest)
                        .map(scan::close_unbalanced)
                        .and_then(|closed| try_parse(&closed))
                });
            Some(recovered.unwrap_or(empty))
        }
        '"' => scan::string_literal_len(rest).and_then(|len| try_parse(&rest[..len])),
        _ => {
            let end = rest
                .find(|c: char| c == ',' || c == '}' || c == ']' || c.is_whitespace())
                .unwrap_or(rest.len());
            try_parse(&rest[..end])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repair(input: &str) -> Option<Repaired> {
        TolerantParser::default().repair(input)
    }

    #[test]
    fn bom_is_stripped() {
        let repaired = repair("\u{feff}{\"a\": 1}").unwrap();
        assert_eq!(repaired.strategy, RepairStrategy::Direct);
        assert_eq!(repaired.value, json!({"a": 1}));
    }

    #[test]
    fn prose_around_document() {
        let repaired = repair("Sure! Here is the result: [1, 2] Hope it helps.").unwrap();
        assert_eq!(repaired.strategy, RepairStrategy::Balanced);
        assert_eq!(repaired.value, json!([1, 2]));
    }

    #[test]
    fn longest_candidate_wins() {
        let repaired = repair(r#"see {"a": 1} then {"b": [1, 2, 3]}"#).unwrap();
        assert_eq!(repaired.value, json!({"b": [1, 2, 3]}));
    }

    #[test]
    fn truncated_array_is_closed() {
        let repaired = repair(r#"[{"d1": "Lin"}, {"d1": "rain"#).unwrap();
        assert_eq!(repaired.strategy, RepairStrategy::Closed);
        assert_eq!(repaired.value, json!([{"d1": "Lin"}, {"d1": "rain"}]));
    }

    #[test]
    fn truncated_mid_key_drops_incomplete_element() {
        let repaired = repair(r#"{"events": [{"id": "E01"}, {"id": "E02", "summ"#).unwrap();
        assert_eq!(repaired.strategy, RepairStrategy::Closed);
        assert_eq!(repaired.value, json!({"events": [{"id": "E01"}]}));
    }

    #[test]
    fn scalar_fields_salvaged() {
        assert_eq!(extract_field(r#"x "estimatedEpisodes": 12, y"#, "estimatedEpisodes"), Some(json!(12)));
        assert_eq!(extract_field(r#""title" : "Rain \"II\"""#, "title"), Some(json!("Rain \"II\"")));
        assert_eq!(extract_field("nothing here", "title"), None);
    }

    #[test]
    fn unparseable_array_field_becomes_empty() {
        assert_eq!(extract_field(r#""characters": [oops"#, "characters"), Some(json!([])));
    }

    #[test]
    fn empty_and_garbage_yield_none() {
        assert!(repair("").is_none());
        assert!(repair("   ").is_none());
        assert!(repair("I could not produce a storyboard.").is_none());
    }
}
