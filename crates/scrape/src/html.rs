//! Tolerant HTML scanning helpers.
//!
//! Wiki pages are messy: tag case varies, attributes come in any order,
//! and markup noise (citations, italics, spans) sits inside the cells we
//! care about. These helpers do minimal hand-rolled scanning instead of
//! full parsing:
//!
//! - case-insensitive tag detection
//! - local scanning within known blocks (`<table>...</table>`)
//! - tag stripping and entity/whitespace normalization
//!
//! The scanner does not handle nesting of the *same* tag; the listing
//! tables we read never nest tables inside tables or anchors inside
//! anchors.

/// An element found by the scanner: its raw attribute string and the
/// markup between the open and close tags.
#[derive(Debug, Clone, Copy)]
pub struct ElementBlock<'a> {
    pub attrs: &'a str,
    pub inner: &'a str,
}

/// Find every `<tag ...>...</tag>` block, case-insensitively.
///
/// A block without a closing tag (truncated page) is dropped rather than
/// guessed at.
pub fn element_blocks<'a>(html: &'a str, tag: &str) -> Vec<ElementBlock<'a>> {
    // Lowercasing ASCII never changes byte offsets, so positions found in
    // `lower` index directly into `html`.
    let lower = html.to_ascii_lowercase();
    let open_pat = format!("<{}", tag.to_ascii_lowercase());
    let close_pat = format!("</{}", tag.to_ascii_lowercase());

    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(open_rel) = lower[pos..].find(&open_pat) {
        let open_at = pos + open_rel;
        let after_name = open_at + open_pat.len();

        // Guard against prefix matches: "<table" must not match "<tablefoot".
        match lower.as_bytes().get(after_name) {
            Some(b'>') | Some(b'/') | None => {}
            Some(c) if c.is_ascii_whitespace() => {}
            _ => {
                pos = after_name;
                continue;
            }
        }

        let Some(tag_end_rel) = lower[after_name..].find('>') else {
            break;
        };
        let tag_end = after_name + tag_end_rel;

        // Same boundary guard on the closing tag: "</a" must not match "</abbr>".
        let mut close_at = None;
        let mut search_from = tag_end + 1;
        while let Some(close_rel) = lower[search_from..].find(&close_pat) {
            let candidate = search_from + close_rel;
            match lower.as_bytes().get(candidate + close_pat.len()) {
                Some(b'>') | None => {
                    close_at = Some(candidate);
                    break;
                }
                Some(c) if c.is_ascii_whitespace() => {
                    close_at = Some(candidate);
                    break;
                }
                _ => search_from = candidate + close_pat.len(),
            }
        }
        let Some(close_at) = close_at else {
            break;
        };

        blocks.push(ElementBlock {
            attrs: &html[after_name..tag_end],
            inner: &html[tag_end + 1..close_at],
        });

        // Resume after the closing tag's '>', or just past it if malformed.
        pos = match lower[close_at..].find('>') {
            Some(rel) => close_at + rel + 1,
            None => close_at + close_pat.len(),
        };
    }

    blocks
}

/// Inner markup of every `<table>` whose class list contains `class_name`.
pub fn tables_with_class<'a>(html: &'a str, class_name: &str) -> Vec<&'a str> {
    element_blocks(html, "table")
        .into_iter()
        .filter(|block| has_class(block.attrs, class_name))
        .map(|block| block.inner)
        .collect()
}

/// Check the `class` attribute for a whitespace-separated token,
/// case-insensitively and regardless of quoting style.
fn has_class(attrs: &str, class_name: &str) -> bool {
    let lower = attrs.to_ascii_lowercase();
    let Some(class_at) = lower.find("class") else {
        return false;
    };
    let rest = &lower[class_at + "class".len()..];
    let Some(eq_at) = rest.find('=') else {
        return false;
    };
    let value = rest[eq_at + 1..].trim_start();
    let value = match value.as_bytes().first() {
        Some(&quote @ (b'"' | b'\'')) => {
            let body = &value[1..];
            match body.find(quote as char) {
                Some(end) => &body[..end],
                None => body,
            }
        }
        _ => value.split_ascii_whitespace().next().unwrap_or(""),
    };

    let wanted = class_name.to_ascii_lowercase();
    value.split_ascii_whitespace().any(|token| token == wanted)
}

/// Text of the first `<a>` element inside a fragment, stripped of markup
/// and normalized. `None` when there is no anchor or its text is empty.
pub fn first_anchor_text(fragment: &str) -> Option<String> {
    let anchor = element_blocks(fragment, "a").into_iter().next()?;
    let text = normalize_text(anchor.inner);
    if text.is_empty() { None } else { Some(text) }
}

/// Remove every `<...>` span from a fragment.
pub fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decode the HTML entities that actually show up in film titles.
///
/// Unknown named entities pass through untouched; a stray `&` is kept
/// as-is.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        // Entities are short; a ';' further away than that means bare '&'.
        let semi = tail.find(';').filter(|&at| at <= 12);
        let Some(semi) = semi else {
            out.push('&');
            rest = &tail[1..];
            continue;
        };

        let entity = &tail[1..semi];
        match decode_entity(entity) {
            Some(decoded) => out.push_str(&decoded),
            None => out.push_str(&tail[..semi + 1]),
        }
        rest = &tail[semi + 1..];
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<String> {
    let decoded = match entity {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or(entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            return char::from_u32(code).map(String::from);
        }
    };
    Some(decoded.to_string())
}

/// Strip tags, decode entities, and collapse whitespace runs.
pub fn normalize_text(fragment: &str) -> String {
    let stripped = strip_tags(fragment);
    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_blocks_ignores_case() {
        let html = "<TR><td>a</td></TR><tr><td>b</td></tr>";
        let rows = element_blocks(html, "tr");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].inner, "<td>a</td>");
        assert_eq!(rows[1].inner, "<td>b</td>");
    }

    #[test]
    fn test_element_blocks_skips_prefix_matches() {
        let html = "<tablefoot>nope</tablefoot><table class=\"x\"><tr></tr></table>";
        let tables = element_blocks(html, "table");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].attrs.trim(), "class=\"x\"");
    }

    #[test]
    fn test_close_tag_needs_boundary() {
        let html = "<a href=\"#\">AT<abbr>and</abbr>T</a>";
        let anchors = element_blocks(html, "a");
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].inner, "AT<abbr>and</abbr>T");
    }

    #[test]
    fn test_element_blocks_drops_unclosed_tail() {
        let html = "<tr><td>full</td></tr><tr><td>truncated";
        let rows = element_blocks(html, "tr");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_has_class_token_matching() {
        assert!(has_class(" class=\"wikitable sortable\"", "wikitable"));
        assert!(has_class(" CLASS='wikitable'", "wikitable"));
        assert!(has_class(" border=\"1\" class=\"Wikitable\"", "wikitable"));
        assert!(!has_class(" class=\"nowikitable\"", "wikitable"));
        assert!(!has_class(" border=\"1\"", "wikitable"));
    }

    #[test]
    fn test_first_anchor_text_strips_markup() {
        let row = "<td><i><a href=\"/wiki/X\"><b>Repo</b> Man</a></i><sup><a href=\"#c\">[1]</a></sup></td>";
        assert_eq!(first_anchor_text(row).as_deref(), Some("Repo Man"));
    }

    #[test]
    fn test_first_anchor_text_empty_row() {
        assert_eq!(first_anchor_text("<td></td><td>1984</td>"), None);
        assert_eq!(first_anchor_text("<td><a href=\"#\"> </a></td>"), None);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Fast Times &amp; Faster"), "Fast Times & Faster");
        assert_eq!(decode_entities("A Bug&#39;s Life"), "A Bug's Life");
        assert_eq!(decode_entities("&#x41;kira"), "Akira");
        assert_eq!(decode_entities("Tom &unknown; Jerry"), "Tom &unknown; Jerry");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("  The\n  <b>Room</b>  "), "The Room");
    }
}
