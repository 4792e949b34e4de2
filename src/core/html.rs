// src/core/html.rs
use super::sanitize::{normalize_entities, normalize_ws, strip_brackets};

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Position of the next opening `<name` tag at or after `from`, requiring a
/// tag-name boundary so `<th` does not match `<thead`.
fn find_open_tag(lc: &str, name: &str, from: usize) -> Option<usize> {
    let pat = join!("<", name);
    let mut at = from;
    while let Some(rel) = lc.get(at..)?.find(&pat) {
        let start = at + rel;
        match lc.as_bytes().get(start + pat.len()) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(start),
            _ => at = start + pat.len(),
        }
    }
    None
}

/// Next `<name ...> ... </name>` block at or after `from` (case-insensitive),
/// as byte offsets into `s`. No nesting awareness.
pub fn next_tag_block_ci(s: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let start = find_open_tag(&lc, name, from)?;
    let open_end = s[start..].find('>')? + start + 1;
    let close = join!("</", name);
    let end_rel = lc[open_end..].find(&close)?;
    let end = open_end + end_rel + close.len() + 1;
    Some((start, end.min(s.len())))
}

/// Every `<name>` block in order.
pub fn tag_blocks_ci<'a>(s: &'a str, name: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut from = 0;
    while let Some((a, b)) = next_tag_block_ci(s, name, from) {
        out.push(&s[a..b]);
        from = b;
    }
    out
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Visible text of every `<th>`/`<td>` cell in a `<tr>` block, in order:
/// tags removed, entities decoded, footnote markers dropped.
pub fn row_cells(row: &str) -> Vec<String> {
    let lc = to_lower(row);
    let mut out = Vec::new();
    let mut from = 0;
    loop {
        let th = find_open_tag(&lc, "th", from);
        let td = find_open_tag(&lc, "td", from);
        let (start, name) = match (th, td) {
            (Some(h), Some(d)) if h < d => (h, "th"),
            (_, Some(d)) => (d, "td"),
            (Some(h), None) => (h, "th"),
            (None, None) => break,
        };
        let Some((a, b)) = next_tag_block_ci(row, name, start) else { break };
        let text = strip_tags(inner_after_open_tag(&row[a..b]));
        out.push(strip_brackets(&normalize_entities(&text)));
        from = b;
    }
    out
}
