//! Presentation helpers: turn an analysis result into a display view.
//!
//! The wire report stays machine-oriented; this module builds the
//! human-facing rendition of it: canonical type names, friendly
//! labels, adjacent same-type findings merged for display, bounded
//! context excerpts, per-type counts, and a tidied masked preview.
//! Display merging never feeds back into detection or redaction.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::span::{PiiSpan, SpanSource};

const CONTEXT_WINDOW: usize = 40;
const MERGE_DISTANCE: usize = 2;

/// One display finding, possibly covering several adjacent entities
/// of the same canonical type.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Friendly label ("Email", "Phone Number", ...)
    pub label: String,

    /// Canonical entity type
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Surrounding text with the finding replaced by `[TYPE]`
    pub text_excerpt: String,

    /// Confidence as a percentage, two decimals
    pub confidence: f32,

    /// Which engine produced the finding
    pub origin: String,
}

/// Aggregate counts over the findings.
#[derive(Debug, Clone, Serialize)]
pub struct ViewStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

/// The display view of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub findings: Vec<Finding>,
    pub masked_preview: String,
    pub stats: ViewStats,
}

struct DisplayEntity {
    canonical: String,
    label: String,
    start: usize,
    end: usize,
    score: f32,
    source: SpanSource,
}

/// Build the display view from the original text, the accepted
/// entities, and the redacted output.
pub fn build_view(text: &str, entities: &[PiiSpan], redacted_text: &str) -> ReportView {
    let merged = merge_for_display(entities);

    let mut findings = Vec::with_capacity(merged.len());
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();

    for display in merged {
        *by_type.entry(display.canonical.clone()).or_insert(0) += 1;
        findings.push(Finding {
            text_excerpt: context_excerpt(text, display.start, display.end, &display.canonical),
            confidence: (display.score * 10000.0).round() / 100.0,
            origin: origin_display(display.source).to_string(),
            label: display.label,
            entity_type: display.canonical,
        });
    }

    ReportView {
        masked_preview: tidy_masked_preview(redacted_text),
        stats: ViewStats {
            total: findings.len(),
            by_type,
        },
        findings,
    }
}

/// Normalise a raw detector label into a canonical type name.
///
/// Known localized aliases map directly; anything else is upper-cased
/// so already-canonical names pass through unchanged.
fn canonical_type(raw: &str) -> String {
    match raw.trim().to_lowercase().as_str() {
        "ad soyad" | "adsoyad" | "ad_soyad" => "PERSON".to_string(),
        "doğum tarihi" | "dogum tarihi" => "DATE".to_string(),
        "adres" => "ADDRESS".to_string(),
        _ => raw.trim().to_uppercase(),
    }
}

fn friendly_label(canonical: &str, raw: &str) -> String {
    let known = match canonical {
        "PERSON" => "Name",
        "EMAIL_ADDRESS" => "Email",
        "PHONE_NUMBER" => "Phone Number",
        "CREDIT_CARD" => "Credit Card",
        "IBAN" => "IBAN",
        "LOCATION" => "Location",
        "ADDRESS" => "Address",
        "DATE" => "Date of Birth",
        "DATE_TIME" => "Date / Time",
        "ORGANIZATION" => "Organization",
        "NATIONALID" => "National ID",
        "US_SSN" => "Social Security Number",
        "IP_ADDRESS" => "IP Address",
        _ => return title_case(if raw.is_empty() { canonical } else { raw }),
    };
    known.to_string()
}

fn title_case(raw: &str) -> String {
    raw.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn origin_display(source: SpanSource) -> &'static str {
    match source {
        SpanSource::Statistical => "NER",
        SpanSource::Pattern => "Pattern",
        SpanSource::Fallback => "LLM",
    }
}

/// Collapse adjacent entities of the same canonical type into one
/// display finding. Entities within `MERGE_DISTANCE` bytes of each
/// other read as one item to a person even when the engines reported
/// them separately.
fn merge_for_display(entities: &[PiiSpan]) -> Vec<DisplayEntity> {
    let mut sorted: Vec<&PiiSpan> = entities.iter().collect();
    sorted.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| a.source.priority().cmp(&b.source.priority()))
    });

    let mut merged: Vec<DisplayEntity> = Vec::with_capacity(sorted.len());
    for entity in sorted {
        let canonical = canonical_type(&entity.entity_type);
        let current = DisplayEntity {
            label: friendly_label(&canonical, &entity.entity_type),
            canonical,
            start: entity.start,
            end: entity.end,
            score: entity.score,
            source: entity.source,
        };

        if let Some(previous) = merged.last_mut() {
            if previous.canonical == current.canonical
                && current.start <= previous.end + MERGE_DISTANCE
            {
                previous.start = previous.start.min(current.start);
                previous.end = previous.end.max(current.end);
                previous.score = previous.score.max(current.score);
                if current.source.priority() < previous.source.priority() {
                    previous.source = current.source;
                }
                continue;
            }
        }
        merged.push(current);
    }
    merged
}

/// Bounded context around a finding, with the finding itself replaced
/// by its canonical type marker.
fn context_excerpt(text: &str, start: usize, end: usize, canonical: &str) -> String {
    let mut from = start.saturating_sub(CONTEXT_WINDOW);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT_WINDOW).min(text.len());
    while to < text.len() && !text.is_char_boundary(to) {
        to += 1;
    }
    format!("{}[{canonical}]{}", &text[from..start], &text[end..to])
}

/// Join runs of single-character lines back into one line.
///
/// Some inputs arrive with text broken one character per line (OCR,
/// copy-paste artifacts); the preview reads better with those runs
/// collapsed. Multi-character lines pass through untouched.
pub fn tidy_masked_preview(masked: &str) -> String {
    if masked.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(masked.len());
    let mut buffer = String::new();
    let mut buffer_newline = String::new();

    let flush = |result: &mut String, buffer: &mut String, buffer_newline: &mut String| {
        if !buffer.is_empty() {
            result.push_str(buffer);
            result.push_str(if buffer_newline.is_empty() {
                "\n"
            } else {
                buffer_newline
            });
            buffer.clear();
            buffer_newline.clear();
        }
    };

    for line in masked.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        let newline = &line[content.len()..];

        if !content.is_empty() && content.chars().count() <= 1 {
            buffer.push_str(content);
            if !newline.is_empty() {
                buffer_newline = newline.to_string();
            }
            continue;
        }

        flush(&mut result, &mut buffer, &mut buffer_newline);
        result.push_str(line);
    }
    flush(&mut result, &mut buffer, &mut buffer_newline);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::span::SpanSource;

    #[test]
    fn test_adjacent_same_type_entities_merged_for_display() {
        let text = "John Doe met Jane.";
        let entities = vec![
            PiiSpan::new("PERSON", 0, 4, 0.92, SpanSource::Statistical, text).unwrap(),
            PiiSpan::new("PERSON", 5, 8, 0.81, SpanSource::Fallback, text).unwrap(),
        ];

        let view = build_view(text, &entities, "[REDACTED_PERSON] met Jane.");

        assert_eq!(view.stats.total, 1);
        let finding = &view.findings[0];
        assert_eq!(finding.entity_type, "PERSON");
        assert_eq!(finding.label, "Name");
        // The detector origin wins over the fallback on a merge
        assert_eq!(finding.origin, "NER");
        assert!(finding.text_excerpt.contains("[PERSON]"));
        assert_eq!(finding.confidence, 92.0);
    }

    #[test]
    fn test_distant_same_type_entities_stay_separate() {
        let text = "a@b.com and far away c@d.com";
        let entities = vec![
            PiiSpan::new("EMAIL_ADDRESS", 0, 7, 0.99, SpanSource::Pattern, text).unwrap(),
            PiiSpan::new("EMAIL_ADDRESS", 21, 28, 0.99, SpanSource::Pattern, text).unwrap(),
        ];

        let view = build_view(text, &entities, text);
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.stats.by_type["EMAIL_ADDRESS"], 2);
    }

    #[test]
    fn test_localized_label_mapped_to_canonical_type() {
        let text = "Doğum tarihi 1990-01-01";
        let end = "Doğum tarihi".len();
        let entity =
            PiiSpan::new("Doğum Tarihi", 0, end, 0.77, SpanSource::Fallback, text).unwrap();

        let view = build_view(text, &[entity], "[REDACTED_DATE] 1990-01-01");

        let finding = &view.findings[0];
        assert_eq!(finding.entity_type, "DATE");
        assert_eq!(finding.label, "Date of Birth");
        assert_eq!(finding.origin, "LLM");
    }

    #[test]
    fn test_unknown_type_gets_title_cased_label() {
        let text = "TR12 3456 7890";
        let entity = PiiSpan::new("BANK_ACCOUNT", 0, 14, 0.9, SpanSource::Pattern, text).unwrap();
        let view = build_view(text, &[entity], text);
        assert_eq!(view.findings[0].label, "Bank Account");
        assert_eq!(view.findings[0].entity_type, "BANK_ACCOUNT");
    }

    #[test]
    fn test_excerpt_clamped_at_text_edges() {
        let text = "a@b.com";
        let entity = PiiSpan::new("EMAIL_ADDRESS", 0, 7, 0.99, SpanSource::Pattern, text).unwrap();
        let view = build_view(text, &[entity], "[REDACTED_EMAIL_ADDRESS]");
        assert_eq!(view.findings[0].text_excerpt, "[EMAIL_ADDRESS]");
    }

    #[test]
    fn test_tidy_preview_collapses_single_character_lines() {
        let tidy = tidy_masked_preview("R\na\nn\nd\nLine two\n");
        assert!(tidy.starts_with("Rand\n"));
        assert!(tidy.contains("Line two"));
    }

    #[test]
    fn test_tidy_preview_trailing_run_flushed() {
        assert_eq!(tidy_masked_preview("Line one\nx\ny"), "Line one\nxy\n");
    }

    #[test]
    fn test_tidy_preview_passthrough() {
        let masked = "nothing [REDACTED_PERSON] unusual\nhere\n";
        assert_eq!(tidy_masked_preview(masked), masked);
        assert_eq!(tidy_masked_preview(""), "");
    }
}
