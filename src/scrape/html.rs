//! Low-level HTML string scanning helpers.
//!
//! Deliberately naive but tailored to the shape of the election results
//! page. Tag and attribute matching is ASCII case-insensitive. Block slicing
//! tracks nesting depth, since candidate rows contain nested `<div>`s.

/// ASCII-only lowercase copy, for case-insensitive matching. Byte offsets
/// into the copy are valid in the original.
pub fn lower(s: &str) -> String {
    s.chars().map(|c| c.to_ascii_lowercase()).collect()
}

/// Byte offset of the next `<name ...>` opening tag at or after `from`.
pub fn find_tag(s: &str, name: &str, from: usize) -> Option<usize> {
    let lc = lower(s);
    let needle = format!("<{}", lower(name));
    let mut pos = from;
    while let Some(rel) = lc.get(pos..)?.find(&needle) {
        let start = pos + rel;
        // Must match the whole tag name, not a prefix of a longer one.
        match lc.as_bytes().get(start + needle.len()) {
            Some(b) if b.is_ascii_alphanumeric() => pos = start + 1,
            _ => return Some(start),
        }
    }
    None
}

/// Byte offset of the next opening tag whose `class` attribute contains the
/// token `class_name`.
pub fn find_class(s: &str, class_name: &str, from: usize) -> Option<usize> {
    let lc = lower(s);
    let needle = lower(class_name);
    let mut pos = from;
    loop {
        let start = lc.get(pos..)?.find('<')? + pos;
        let end = lc.get(start..)?.find('>')? + start;
        let tag = &lc[start..end];
        if !tag.starts_with("</") {
            if let Some(classes) = attr(tag, "class") {
                if classes.split_ascii_whitespace().any(|c| c == needle) {
                    return Some(start);
                }
            }
        }
        pos = end + 1;
    }
}

/// Value of `name="..."` inside an opening-tag slice, if present.
///
/// Handles double-quoted, single-quoted and bare values.
pub fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lc = lower(tag);
    let needle = lower(name);
    let mut pos = 0;
    loop {
        let at = lc.get(pos..)?.find(&needle)? + pos;
        // A real attribute is preceded by whitespace and followed, modulo
        // spaces, by '='.
        let preceded = at > 0 && lc.as_bytes()[at - 1].is_ascii_whitespace();
        let rest = tag[at + needle.len()..].trim_start();
        if preceded && rest.starts_with('=') {
            let rest = rest[1..].trim_start();
            let value = match rest.as_bytes().first() {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let body = &rest[1..];
                    let close = body.find(q as char)?;
                    &body[..close]
                }
                _ => rest
                    .split(|c: char| c.is_ascii_whitespace() || c == '>')
                    .next()
                    .unwrap_or(""),
            };
            return Some(value);
        }
        pos = at + needle.len();
    }
}

/// Inner byte range of the element whose opening tag starts at `tag_start`.
///
/// Follows nesting of the same tag name, so a container slices out to its
/// own closing tag rather than the first nested one.
pub fn element_block(s: &str, tag_start: usize) -> Option<(usize, usize)> {
    let lc = lower(s);
    let name_len = lc
        .get(tag_start + 1..)?
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }
    let name = &lc[tag_start + 1..tag_start + 1 + name_len];

    let open_end = lc.get(tag_start..)?.find('>')? + tag_start;
    if lc[..open_end].ends_with('/') {
        // Self-closing: no inner content.
        return Some((open_end, open_end));
    }
    let inner_start = open_end + 1;

    let open_pat = format!("<{}", name);
    let close_pat = format!("</{}", name);
    let mut depth = 1usize;
    let mut pos = inner_start;
    loop {
        let next = lc.get(pos..)?.find('<')? + pos;
        if lc[next..].starts_with(&close_pat)
            && name_ends(lc.as_bytes().get(next + close_pat.len()))
        {
            depth -= 1;
            if depth == 0 {
                return Some((inner_start, next));
            }
            pos = next + close_pat.len();
        } else if lc[next..].starts_with(&open_pat)
            && name_ends(lc.as_bytes().get(next + open_pat.len()))
        {
            let tag_end = lc.get(next..)?.find('>')? + next;
            if !lc[..tag_end].ends_with('/') {
                depth += 1;
            }
            pos = tag_end + 1;
        } else {
            pos = next + 1;
        }
    }
}

/// True when the byte after a tag-name match ends the name.
fn name_ends(b: Option<&u8>) -> bool {
    match b {
        Some(b) => !b.is_ascii_alphanumeric(),
        None => true,
    }
}

/// Visible text of a markup fragment: tags stripped, minimal entities
/// decoded, whitespace collapsed.
pub fn text(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    collapse_ws(&decode_entities(&out))
}

/// Minimal entity decoding, just the entities seen in the fields we read.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Collapses whitespace runs to single spaces and trims.
fn collapse_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_tag_respects_name_boundary() {
        let doc = "<abbr>x</abbr><a href=\"/u/1\">y</a>";
        let at = find_tag(doc, "a", 0).unwrap();
        assert!(doc[at..].starts_with("<a href"));
    }

    #[test]
    fn find_class_matches_whole_token() {
        let doc = r#"<div class="candidate-rowx"></div><div class="foo candidate-row"></div>"#;
        let at = find_class(doc, "candidate-row", 0).unwrap();
        assert!(doc[at..].starts_with(r#"<div class="foo"#));
    }

    #[test]
    fn attr_quoting_variants() {
        assert_eq!(attr(r#"<a href="/users/1/a""#, "href"), Some("/users/1/a"));
        assert_eq!(attr("<a href='/users/2/b'", "href"), Some("/users/2/b"));
        assert_eq!(attr("<a href=/users/3/c>", "href"), Some("/users/3/c"));
        assert_eq!(attr("<a id=x>", "href"), None);
    }

    #[test]
    fn attr_ignores_matches_inside_values() {
        let tag = r#"<div data-href="nope" href="/real""#;
        assert_eq!(attr(tag, "href"), Some("/real"));
    }

    #[test]
    fn element_block_follows_nesting() {
        let doc = "<div class=a><div>inner</div>tail</div>after";
        let (s, e) = element_block(doc, 0).unwrap();
        assert_eq!(&doc[s..e], "<div>inner</div>tail");
    }

    #[test]
    fn element_block_self_closing() {
        let doc = "<br/>rest";
        let (s, e) = element_block(doc, 0).unwrap();
        assert_eq!(s, e);
    }

    #[test]
    fn element_block_unterminated() {
        assert_eq!(element_block("<div>never closed", 0), None);
    }

    #[test]
    fn text_strips_and_normalizes() {
        let fragment = "<span>  Jon\n  <b>Skeet</b> &amp; co&nbsp;</span>";
        assert_eq!(text(fragment), "Jon Skeet & co");
    }
}
