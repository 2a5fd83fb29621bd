//! Recipe and video-row extraction from the exchange transcript.
//!
//! Both extractions are pure functions over the transcript. Video rows are
//! recovered through a layered best-effort chain; each layer is an explicit
//! optional-returning step, and a failed decode silently yields to the next
//! layer. The first non-empty result wins and results are never merged.

use crate::transcript::{Message, MessageKind, Source, DISH_MARKER, SENTINEL};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A normalized video result row: exactly five string fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Views")]
    pub views: String,
}

/// Extract the recipe text from the transcript.
///
/// Preference order: the first plain-text message from the recipe writer,
/// else the first message containing the `DISH:` marker, else empty. The
/// sentinel token and surrounding whitespace are stripped before returning.
pub fn recipe(transcript: &[Message]) -> String {
    let mut text = transcript
        .iter()
        .find(|m| m.kind == MessageKind::Text && m.source == Source::RecipeWriter)
        .map(|m| m.content.clone());

    if text.is_none() {
        text = transcript
            .iter()
            .find(|m| m.content.contains(DISH_MARKER))
            .map(|m| m.content.clone());
    }

    text.unwrap_or_default().replace(SENTINEL, "").trim().to_string()
}

/// Extract video rows from the transcript.
///
/// Fallback chain, first non-empty result wins:
/// 1. decode tool payloads from the video finder's tool events (newest first)
/// 2. parse a markdown table out of the concatenated transcript text
/// 3. decode the whole concatenated text as an embedded record literal
pub fn video_rows(transcript: &[Message]) -> Vec<VideoRow> {
    let rows = rows_from_tool_events(transcript);
    if !rows.is_empty() {
        return rows;
    }

    let all_text = transcript
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let rows = parse_markdown_table(&all_text);
    if !rows.is_empty() {
        return rows;
    }

    normalize_rows(&decode_records(&all_text))
}

/// Scan tool events from the video finder, newest first, for a decodable
/// list of records. Stops at the first payload that yields rows.
fn rows_from_tool_events(transcript: &[Message]) -> Vec<VideoRow> {
    for msg in transcript.iter().rev() {
        if msg.source != Source::VideoFinder || !msg.is_tool_event() {
            continue;
        }

        let records = decode_records(&msg.content);
        if !records.is_empty() {
            return normalize_rows(&records);
        }
    }

    Vec::new()
}

/// Decode a string as a list of record objects.
///
/// Attempts, in order: strict JSON, JSON with single quotes normalized to
/// double quotes, then permissive JSON5 (which also covers Python-style
/// list/dict literals with unquoted-ish syntax). The first attempt yielding
/// a non-empty list of objects wins; anything malformed is silently skipped.
pub(crate) fn decode_records(s: &str) -> Vec<Map<String, Value>> {
    let s = s.trim();

    for candidate in [s.to_string(), s.replace('\'', "\"")] {
        if let Some(records) = objects_from_value(serde_json::from_str(&candidate).ok()) {
            return records;
        }
    }

    if let Some(records) = objects_from_value(json5::from_str(s).ok()) {
        return records;
    }

    Vec::new()
}

/// Keep only the object entries of a decoded array; None unless non-empty.
fn objects_from_value(value: Option<Value>) -> Option<Vec<Map<String, Value>>> {
    let Some(Value::Array(items)) = value else {
        return None;
    };

    let records: Vec<Map<String, Value>> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect();

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

/// Normalize decoded records into the fixed five-field shape.
///
/// Field lookup tolerates both provider-native lowercase keys and the
/// already-normalized capitalized keys, which makes normalization idempotent.
pub fn normalize_rows(records: &[Map<String, Value>]) -> Vec<VideoRow> {
    records
        .iter()
        .map(|record| VideoRow {
            title: field(record, "title", "Title"),
            url: field(record, "url", "URL"),
            channel: field(record, "channel", "Channel"),
            duration: field(record, "duration", "Duration"),
            views: field(record, "views", "Views"),
        })
        .collect()
}

fn field(record: &Map<String, Value>, provider_key: &str, normalized_key: &str) -> String {
    record
        .get(provider_key)
        .or_else(|| record.get(normalized_key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse the first markdown table found in the text.
///
/// A line is table-shaped when it starts with `|`, has at least six pipe
/// characters, and names both `Title` and `URL`. Rows whose column count
/// does not match the header are dropped; parsing stops at the first line
/// that is not table-shaped.
pub fn parse_markdown_table(text: &str) -> Vec<VideoRow> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let Some(start) = lines.iter().position(|line| {
        line.starts_with('|')
            && line.matches('|').count() >= 6
            && line.contains("Title")
            && line.contains("URL")
    }) else {
        return Vec::new();
    };

    let headers: Vec<String> = split_row(lines[start]);

    let mut i = start + 1;
    if i < lines.len() && is_separator(lines[i]) {
        i += 1;
    }

    let mut rows = Vec::new();
    while i < lines.len() && lines[i].starts_with('|') {
        let parts = split_row(lines[i]);
        if parts.len() == headers.len() {
            let record: Map<String, Value> = headers
                .iter()
                .zip(&parts)
                .map(|(h, p)| (h.clone(), Value::String(p.clone())))
                .collect();
            rows.push(record);
        }
        i += 1;
    }

    normalize_rows(&rows)
}

fn split_row(line: &str) -> Vec<String> {
    line.trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

// Vacuously true for a blank line, so one empty line between header and
// rows is skipped just like a dash separator.
fn is_separator(line: &str) -> bool {
    line.chars()
        .filter(|c| !c.is_whitespace() && *c != '|')
        .all(|c| c == '-' || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Message;

    fn hit_json() -> String {
        r#"[{"title": "Best Gyoza", "url": "https://www.youtube.com/watch?v=a1", "channel": "Kenji", "duration": "12:01", "views": "2M views"}]"#
            .to_string()
    }

    const TABLE: &str = "\
| Title | URL | Channel | Duration | Views |\n\
| --- | --- | --- | --- | --- |\n\
| Table Gyoza | https://www.youtube.com/watch?v=t1 | Maangchi | 8:00 | 900K views |\n\
| Second Row | https://www.youtube.com/watch?v=t2 | Adam | 5:30 | 10K views |";

    #[test]
    fn test_recipe_from_recipe_writer_text() {
        let transcript = vec![
            Message::seed("identify", "data:image/png;base64,AAAA"),
            Message::text(Source::RecipeWriter, "DISH: Gyoza\n\nIngredients..."),
            Message::text(Source::VideoFinder, "table...\nDONE"),
        ];
        assert_eq!(recipe(&transcript), "DISH: Gyoza\n\nIngredients...");
    }

    #[test]
    fn test_recipe_fallback_to_dish_marker() {
        let transcript = vec![
            Message::seed("identify", "data:image/png;base64,AAAA"),
            Message::text(Source::VideoFinder, "Earlier message said DISH: Gyoza."),
        ];
        assert_eq!(recipe(&transcript), "Earlier message said DISH: Gyoza.");
    }

    #[test]
    fn test_recipe_empty_when_nothing_found() {
        let transcript = vec![Message::seed("identify", "data:image/png;base64,AAAA")];
        assert_eq!(recipe(&transcript), "");
    }

    #[test]
    fn test_recipe_sentinel_stripped() {
        let transcript = vec![Message::text(
            Source::RecipeWriter,
            "DISH: Gyoza\nSteps...\nDONE  \n",
        )];
        assert_eq!(recipe(&transcript), "DISH: Gyoza\nSteps...");
    }

    #[test]
    fn test_rows_from_tool_payload() {
        let transcript = vec![
            Message::tool_call(Source::VideoFinder, r#"{"query": "gyoza recipe"}"#),
            Message::tool_result(Source::VideoFinder, hit_json()),
            Message::text(Source::VideoFinder, "done\nDONE"),
        ];

        let rows = video_rows(&transcript);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Best Gyoza");
        assert_eq!(rows[0].url, "https://www.youtube.com/watch?v=a1");
        assert_eq!(rows[0].views, "2M views");
    }

    #[test]
    fn test_tool_payload_takes_precedence_over_table() {
        let transcript = vec![
            Message::tool_result(Source::VideoFinder, hit_json()),
            Message::text(Source::VideoFinder, format!("{}\nDONE", TABLE)),
        ];

        let rows = video_rows(&transcript);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Best Gyoza");
    }

    #[test]
    fn test_tool_events_scanned_newest_first() {
        let older = r#"[{"title": "Old", "url": "u1"}]"#;
        let newer = r#"[{"title": "New", "url": "u2"}]"#;
        let transcript = vec![
            Message::tool_result(Source::VideoFinder, older),
            Message::tool_result(Source::VideoFinder, newer),
        ];

        let rows = video_rows(&transcript);
        assert_eq!(rows[0].title, "New");
    }

    #[test]
    fn test_tool_payload_from_other_source_ignored() {
        // Only the video finder's events count for the payload path. The
        // payload is wrapped in prose so the whole-text literal fallback
        // cannot pick it up either.
        let transcript = vec![Message::tool_result(
            Source::RecipeWriter,
            format!("found these: {}", hit_json()),
        )];
        assert!(video_rows(&transcript).is_empty());
    }

    #[test]
    fn test_bare_payload_from_other_source_surfaces_via_fallback() {
        // A bare record literal from another source is skipped by the
        // payload path but still decodes via the whole-text fallback.
        let transcript = vec![Message::tool_result(Source::RecipeWriter, hit_json())];
        let rows = video_rows(&transcript);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Best Gyoza");
    }

    #[test]
    fn test_rows_from_markdown_table() {
        let transcript = vec![
            Message::text(Source::RecipeWriter, "DISH: Gyoza"),
            Message::text(Source::VideoFinder, format!("{}\nDONE", TABLE)),
        ];

        let rows = video_rows(&transcript);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Table Gyoza");
        assert_eq!(rows[0].channel, "Maangchi");
        assert_eq!(rows[1].url, "https://www.youtube.com/watch?v=t2");
    }

    #[test]
    fn test_markdown_table_mismatched_row_dropped() {
        let text = "\
| Title | URL | Channel | Duration | Views |\n\
| --- | --- | --- | --- | --- |\n\
| Good | u | c | d | v |\n\
| Bad | only-two |\n\
| Also Good | u2 | c2 | d2 | v2 |";

        let rows = parse_markdown_table(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Good");
        assert_eq!(rows[1].title, "Also Good");
    }

    #[test]
    fn test_markdown_table_stops_at_non_table_line() {
        let text = "\
| Title | URL | Channel | Duration | Views |\n\
| --- | --- | --- | --- | --- |\n\
| Good | u | c | d | v |\n\
And that's all I found.\n\
| Stray | u | c | d | v |";

        let rows = parse_markdown_table(text);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_markdown_table_blank_line_after_header() {
        let text = "| Title | URL | Channel | Duration | Views |\n\n| A | u | c | d | v |";

        let rows = parse_markdown_table(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "A");
    }

    #[test]
    fn test_markdown_table_without_separator_line() {
        let text = "\
| Title | URL | Channel | Duration | Views |\n\
| NoSep | u | c | d | v |";

        let rows = parse_markdown_table(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "NoSep");
    }

    #[test]
    fn test_embedded_literal_fallback() {
        // Single-quoted, Python-ish literal inside a lone text message.
        let transcript = vec![Message::text(
            Source::VideoFinder,
            "[{'title': 'Literal Gyoza', 'url': 'https://www.youtube.com/watch?v=l1'}]",
        )];

        let rows = video_rows(&transcript);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Literal Gyoza");
        // Absent fields default to empty, never missing.
        assert_eq!(rows[0].channel, "");
        assert_eq!(rows[0].views, "");
    }

    #[test]
    fn test_all_paths_empty_is_valid() {
        let transcript = vec![
            Message::text(Source::RecipeWriter, "DISH: Gyoza"),
            Message::text(Source::VideoFinder, "I could not find any videos. DONE"),
        ];
        assert!(video_rows(&transcript).is_empty());
    }

    #[test]
    fn test_decode_records_strict_json() {
        let records = decode_records(r#"[{"title": "A"}]"#);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_decode_records_quote_normalized() {
        let records = decode_records("[{'title': 'A'}]");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "A");
    }

    #[test]
    fn test_decode_records_json5_trailing_comma() {
        let records = decode_records(r#"[{"title": "A",},]"#);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_decode_records_non_objects_filtered() {
        assert!(decode_records(r#"["just", "strings"]"#).is_empty());
        assert!(decode_records("not a list at all").is_empty());
        assert!(decode_records(r#"{"title": "A"}"#).is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let records = decode_records(&hit_json());
        let once = normalize_rows(&records);

        // Re-normalize from the serialized normalized form.
        let json = serde_json::to_string(&once).unwrap();
        let twice = normalize_rows(&decode_records(&json));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalized_rows_have_exactly_five_fields() {
        let rows = normalize_rows(&decode_records(&hit_json()));
        let value = serde_json::to_value(&rows[0]).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);
        for key in ["Title", "URL", "Channel", "Duration", "Views"] {
            assert!(value.get(key).is_some());
        }
    }
}
