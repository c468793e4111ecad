//! Pattern detector: regex and checksum recognizers for structured PII.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::error::DetectResult;
use crate::traits::detector::Detector;
use crate::types::span::{PiiSpan, SpanSource};

lazy_static! {
    // Email pattern - RFC 5322 simplified
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b"
    ).unwrap();

    // Phone patterns - US 10-digit and bare 7-digit local numbers
    static ref PHONE_REGEX: Regex = Regex::new(
        r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}|\b[0-9]{3}[-.][0-9]{4}\b"
    ).unwrap();

    // Social Security Number - XXX-XX-XXXX
    static ref SSN_REGEX: Regex = Regex::new(
        r"\b\d{3}-\d{2}-\d{4}\b"
    ).unwrap();

    // Credit card numbers - various formats (Visa, MC, Amex, Discover)
    static ref CREDIT_CARD_REGEX: Regex = Regex::new(
        r"\b(?:\d{4}[-\s]?){3}\d{4}\b|\b\d{4}[-\s]?\d{6}[-\s]?\d{5}\b"
    ).unwrap();

    // IPv4 addresses
    static ref IPV4_REGEX: Regex = Regex::new(
        r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b"
    ).unwrap();

    // IPv6 addresses (simplified)
    static ref IPV6_REGEX: Regex = Regex::new(
        r"\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b"
    ).unwrap();
}

// Per-type confidence for pattern matches. Checksum-validated types
// score higher than ambiguous ones; IP addresses sit in the uncertain
// band because bare dotted quads are frequently not personal data.
const EMAIL_SCORE: f32 = 0.99;
const PHONE_SCORE: f32 = 0.9;
const SSN_SCORE: f32 = 0.85;
const CREDIT_CARD_SCORE: f32 = 1.0;
const IP_SCORE: f32 = 0.6;

/// Regex/checksum recognizer for structured PII: emails, phone
/// numbers, SSNs, Luhn-validated credit cards, and IP addresses.
#[derive(Debug, Default, Clone)]
pub struct PatternDetector;

impl PatternDetector {
    pub fn new() -> Self {
        Self
    }

    fn scan(&self, text: &str) -> Vec<PiiSpan> {
        let mut spans = Vec::new();

        for mat in EMAIL_REGEX.find_iter(text) {
            self.push(&mut spans, text, "EMAIL_ADDRESS", mat.start(), mat.end(), EMAIL_SCORE);
        }

        for mat in PHONE_REGEX.find_iter(text) {
            self.push(&mut spans, text, "PHONE_NUMBER", mat.start(), mat.end(), PHONE_SCORE);
        }

        for mat in SSN_REGEX.find_iter(text) {
            self.push(&mut spans, text, "US_SSN", mat.start(), mat.end(), SSN_SCORE);
        }

        for mat in CREDIT_CARD_REGEX.find_iter(text) {
            let digits = mat.as_str().replace(['-', ' '], "");
            if is_valid_luhn(&digits) {
                self.push(
                    &mut spans,
                    text,
                    "CREDIT_CARD",
                    mat.start(),
                    mat.end(),
                    CREDIT_CARD_SCORE,
                );
            }
        }

        for mat in IPV4_REGEX.find_iter(text) {
            // Filter out obvious non-IPs like version numbers
            if !is_likely_version_number(mat.as_str()) {
                self.push(&mut spans, text, "IP_ADDRESS", mat.start(), mat.end(), IP_SCORE);
            }
        }

        for mat in IPV6_REGEX.find_iter(text) {
            self.push(&mut spans, text, "IP_ADDRESS", mat.start(), mat.end(), IP_SCORE);
        }

        spans
    }

    fn push(
        &self,
        spans: &mut Vec<PiiSpan>,
        text: &str,
        entity_type: &str,
        start: usize,
        end: usize,
        score: f32,
    ) {
        // Regex byte offsets are always in bounds and on boundaries;
        // construction cannot fail here.
        if let Ok(span) = PiiSpan::new(entity_type, start, end, score, SpanSource::Pattern, text) {
            trace!(entity_type, start, end, "Pattern match");
            spans.push(span);
        }
    }
}

#[async_trait]
impl Detector for PatternDetector {
    fn name(&self) -> &str {
        "pattern"
    }

    async fn detect(&self, text: &str) -> DetectResult<Vec<PiiSpan>> {
        Ok(self.scan(text))
    }
}

/// Luhn algorithm for credit card validation.
fn is_valid_luhn(card_number: &str) -> bool {
    let digits: Vec<u32> = card_number.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    checksum % 10 == 0
}

/// Check if an IP-like string is likely a version number.
fn is_likely_version_number(ip_str: &str) -> bool {
    let parts: Vec<&str> = ip_str.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    let has_leading_zero = parts[0] == "0";
    let has_trailing_zero = parts[3] == "0";
    let zero_count = parts.iter().filter(|&&p| p == "0").count();

    has_leading_zero || has_trailing_zero || zero_count >= 2
}
