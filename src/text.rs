// ABOUTME: Text normalization utilities shared by every extraction strategy.
// ABOUTME: Collapses whitespace, strips markup blocks and tags, decodes common entities.

//! Text normalization utilities.
//!
//! Key behaviors:
//! - `normalize` collapses any run of whitespace (including newlines) to a
//!   single space and trims both ends.
//! - `strip_markup` discards script/style/svg blocks wholesale, strips all
//!   remaining tags, and collapses horizontal whitespace while preserving
//!   newlines the caller already inserted.
//! - Both are total functions: any input string yields a string, empty in
//!   yields empty out.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static SVG_BLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<svg[^>]*>.*?</svg>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static HORIZONTAL_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips markup from an HTML fragment, keeping only text content.
///
/// Script, style, and svg blocks are removed together with their content.
/// Remaining tags are dropped, entities decoded, and horizontal whitespace
/// collapsed; explicit newlines survive.
pub fn strip_markup(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let without_scripts = SCRIPT_BLOCK_RE.replace_all(html, "");
    let without_styles = STYLE_BLOCK_RE.replace_all(&without_scripts, "");
    let without_svgs = SVG_BLOCK_RE.replace_all(&without_styles, "");
    let without_tags = TAG_RE.replace_all(&without_svgs, " ");
    let decoded = decode_entities(&without_tags);
    HORIZONTAL_WS_RE
        .replace_all(&decoded, " ")
        .trim()
        .to_string()
}

/// Decodes the handful of HTML entities that show up in job-page text.
///
/// Full entity handling belongs to the DOM parser; the tag-soup path only
/// needs the common named entities plus `&#39;`.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
}

/// Clamps a byte index to the nearest char boundary at or below it.
///
/// Window arithmetic on raw byte offsets can land mid-codepoint; slicing
/// there panics, so every windowed scan goes through this first.
pub fn floor_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut i = idx;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
