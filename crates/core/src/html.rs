//! Best-effort HTML to text helpers. Malformed markup is passed through
//! rather than rejected.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static RAW_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[A-Za-z!][^<>]*>").unwrap());
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap());

/// Remove tags, comments and script/style bodies. Entities are left alone.
pub fn strip_tags(input: &str) -> String {
    let without_comments = COMMENT.replace_all(input, "");
    let without_raw = RAW_TEXT.replace_all(&without_comments, "");
    TAG.replace_all(&without_raw, "").into_owned()
}

/// Decode named and numeric character references. Unknown names are kept.
pub fn unescape(input: &str) -> Cow<'_, str> {
    ENTITY.replace_all(input, |caps: &Captures<'_>| {
        let name = &caps[1];
        decode_entity(name).unwrap_or_else(|| caps[0].to_string())
    })
}

/// Plain text of an HTML fragment: tags stripped, entities decoded.
pub fn to_text(input: &str) -> String {
    unescape(&strip_tags(input)).into_owned()
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "para" => '¶',
        "sect" => '§',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "laquo" => '«',
        "raquo" => '»',
        "middot" => '·',
        "bull" => '•',
        "times" => '×',
        "larr" => '←',
        "rarr" => '→',
        _ => return None,
    };
    Some(ch.to_string())
}
