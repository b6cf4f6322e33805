//! Input sanitization and validation.
//!
//! Every externally supplied string passes through one of these functions
//! before it reaches the entry service. The store itself only enforces
//! column constraints, so this module is the only content check.
//!
//! - Phone numbers: digits extracted, exactly 8 required
//! - Names: ASCII letters, whitespace, hyphens and apostrophes, title-cased
//! - Search keywords: denylist check, character-class check, HTML-escaped
//! - Numeric parameters: base-10 parse of the trimmed text

use crate::core::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

// Regex patterns compiled once at startup
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8}$").unwrap());

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z[:space:]\-']+$").unwrap());

static SEARCH_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9[:space:]\-']+$").unwrap());

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").unwrap());

/// Substrings rejected in search keywords (matched case-insensitively).
///
/// Script injection, SQL keywords and path traversal. This is a blunt
/// substring test: "Selector" is rejected because it contains "select".
pub const DANGEROUS_PATTERNS: [&str; 10] = [
    "<script",
    "javascript:",
    "union",
    "select",
    "drop",
    "delete",
    "insert",
    "update",
    "../",
    "..\\",
];

/// Escape HTML entities.
///
/// Replacement order is fixed: `&` goes first so the entities produced by
/// the later substitutions are not escaped again. The transform is not
/// idempotent.
///
/// # Examples
///
/// ```
/// use phonebook::core::sanitize::escape_html;
///
/// assert_eq!(escape_html("&<>\"'/"), "&amp;&lt;&gt;&quot;&#x27;&#x2F;");
/// assert_eq!(escape_html("Hello World"), "Hello World");
/// ```
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
        .replace('/', "&#x2F;")
}

/// Normalize a phone number to its 8 digits.
///
/// All non-digit characters are stripped first, so `"(123) 456-78"` is
/// accepted as `"12345678"`. Leading zeros are kept.
pub fn sanitize_phone(phone: &str) -> Result<String, ValidationError> {
    let cleaned = NON_DIGIT.replace_all(phone, "");

    if !PHONE_PATTERN.is_match(&cleaned) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(cleaned.into_owned())
}

/// Validate and title-case a person's name.
///
/// # Examples
///
/// ```
/// use phonebook::core::sanitize::sanitize_name;
///
/// assert_eq!(sanitize_name("o'connor").unwrap(), "O'Connor");
/// assert_eq!(sanitize_name("  jean-pierre  ").unwrap(), "Jean-Pierre");
/// assert!(sanitize_name("   ").is_err());
/// ```
pub fn sanitize_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if !NAME_PATTERN.is_match(trimmed) {
        return Err(ValidationError::InvalidName);
    }

    Ok(capitalize_words(trimmed))
}

/// Validate a search keyword.
///
/// Returns `Ok(None)` for missing or blank input, meaning "no filter".
/// The dangerous-content check runs before the character-class check and
/// wins when both would fail. Accepted keywords are returned HTML-escaped.
pub fn sanitize_search_keyword(keyword: Option<&str>) -> Result<Option<String>, ValidationError> {
    let trimmed = match keyword.map(str::trim) {
        Some(k) if !k.is_empty() => k,
        _ => return Ok(None),
    };

    if contains_dangerous_content(trimmed) {
        return Err(ValidationError::DangerousContent);
    }

    if !SEARCH_PATTERN.is_match(trimmed) {
        // Report the first offending character
        let offending = trimmed
            .chars()
            .find(|c| !is_keyword_char(*c))
            .unwrap_or('?');
        return Err(ValidationError::InvalidKeywordChar(offending));
    }

    Ok(Some(escape_html(trimmed)))
}

/// Trim and HTML-escape general free text.
pub fn sanitize_text(text: &str) -> String {
    escape_html(text.trim())
}

/// Parse an optional 32-bit integer parameter.
///
/// Missing or blank input yields `Ok(None)`.
pub fn sanitize_integer(input: Option<&str>) -> Result<Option<i32>, ValidationError> {
    parse_numeric(input)
}

/// Parse an optional 64-bit integer parameter.
///
/// Missing or blank input yields `Ok(None)`.
pub fn sanitize_long(input: Option<&str>) -> Result<Option<i64>, ValidationError> {
    parse_numeric(input)
}

/// Check if input contains potentially dangerous content
pub fn contains_dangerous_content(input: &str) -> bool {
    let lower = input.to_lowercase();
    DANGEROUS_PATTERNS.iter().any(|p| lower.contains(p))
}

fn parse_numeric<T: std::str::FromStr>(input: Option<&str>) -> Result<Option<T>, ValidationError> {
    let trimmed = match input.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };

    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| ValidationError::NotNumeric(trimmed.to_string()))
}

fn is_keyword_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_ascii_space(c) || c == '-' || c == '\''
}

/// ASCII whitespace, the same set as `[[:space:]]`
fn is_ascii_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Upper-case the first letter of every word and of every hyphen- or
/// apostrophe-delimited part; lower-case the rest. Whitespace runs collapse
/// to a single space.
fn capitalize_words(text: &str) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            let mut out = String::with_capacity(word.len());
            let mut at_part_start = true;
            for c in word.chars() {
                if c == '-' || c == '\'' {
                    out.push(c);
                    at_part_start = true;
                } else if at_part_start {
                    out.extend(c.to_uppercase());
                    at_part_start = false;
                } else {
                    out.extend(c.to_lowercase());
                }
            }
            out
        })
        .collect();

    words.join(" ")
}
