//! HTML rewriting.
//!
//! # Responsibilities
//! - Inject a `<base>` tag after the first `<head>` so origin-relative
//!   sub-resources resolve against the upstream
//! - Optionally point same-origin anchors back at the relay so navigation
//!   re-enters it
//!
//! # Design Decisions
//! - A manual scan over tag boundaries and quoted attribute values; no DOM
//!   is built and no regex is compiled
//! - Best effort: `src` attributes, inline `style` URLs and script-built
//!   URLs are not rewritten; the injected `<base>` already makes them
//!   resolve against the upstream
//! - Malformed hrefs are never errors; they are left untouched

use url::Url;

/// Per-call inputs for the rewrite pass.
///
/// Derived from the final upstream URL (post-redirect) and the relay's
/// externally visible address; discarded when the call completes.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    /// Upstream origin, e.g. `https://example.com`.
    origin: String,
    /// Final upstream URL; relative hrefs resolve against this.
    page_url: Url,
    /// Relay origin rewritten links point at, e.g. `https://relay.dev`.
    relay_base: String,
    /// Canonical relay route used in rewritten links.
    route: String,
}

impl RewriteContext {
    pub fn new(page_url: Url, relay_base: &Url, route: &str) -> Self {
        Self {
            origin: page_url.origin().ascii_serialization(),
            relay_base: relay_base.origin().ascii_serialization(),
            page_url,
            route: route.to_string(),
        }
    }

    /// Upstream origin the `<base>` tag is built from.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Apply the configured transforms to one HTML document.
pub fn rewrite_document(html: &str, ctx: &RewriteContext, rewrite_links: bool) -> String {
    let out = inject_base(html, &ctx.origin);
    if rewrite_links {
        rewrite_anchor_hrefs(&out, ctx)
    } else {
        out
    }
}

/// Insert `<base href="{origin}/" />` immediately after the first
/// `<head ...>` opening tag.
///
/// Documents without a `<head>` are returned unchanged; relative-resource
/// resolution for them is not guaranteed.
fn inject_base(html: &str, origin: &str) -> String {
    let Some(end) = head_open_end(html) else {
        return html.to_string();
    };
    let mut out = String::with_capacity(html.len() + origin.len() + 32);
    out.push_str(&html[..end]);
    out.push_str("<base href=\"");
    out.push_str(origin);
    out.push_str("/\" />");
    out.push_str(&html[end..]);
    out
}

/// Byte offset just past the `>` of the first `<head ...>` opening tag.
///
/// Case-insensitive; attributes on the tag are tolerated. `<header>` and
/// other longer names do not match.
fn head_open_end(html: &str) -> Option<usize> {
    let bytes = html.as_bytes();
    for i in 0..bytes.len().saturating_sub(4) {
        if bytes[i] != b'<' || !bytes[i + 1..i + 5].eq_ignore_ascii_case(b"head") {
            continue;
        }
        match bytes.get(i + 5) {
            Some(&b'>') => return Some(i + 6),
            Some(c) if c.is_ascii_whitespace() => return tag_end(html, i),
            _ => {}
        }
    }
    None
}

/// Rewrite same-origin anchor hrefs so navigation re-enters the relay.
fn rewrite_anchor_hrefs(html: &str, ctx: &RewriteContext) -> String {
    let mut out = String::with_capacity(html.len() + html.len() / 8);
    let mut i = 0;
    while i < html.len() {
        let Some(open) = find_anchor_open(html, i) else {
            out.push_str(&html[i..]);
            break;
        };
        let Some(end) = tag_end(html, open) else {
            out.push_str(&html[i..]);
            break;
        };
        out.push_str(&html[i..open]);
        out.push_str(&rewrite_anchor_tag(&html[open..end], ctx));
        i = end;
    }
    out
}

/// Offset of the next `<a ...>` opening tag at or after `from`.
fn find_anchor_open(html: &str, from: usize) -> Option<usize> {
    let bytes = html.as_bytes();
    for i in from..bytes.len().saturating_sub(1) {
        if bytes[i] == b'<'
            && bytes[i + 1].eq_ignore_ascii_case(&b'a')
            && matches!(bytes.get(i + 2), Some(c) if c.is_ascii_whitespace())
        {
            return Some(i);
        }
    }
    None
}

/// Offset just past the `>` closing the tag opened at `open`.
///
/// Quote-aware so a `>` inside an attribute value does not end the tag.
fn tag_end(html: &str, open: usize) -> Option<usize> {
    let bytes = html.as_bytes();
    let mut quote: Option<u8> = None;
    for (i, &c) in bytes.iter().enumerate().skip(open) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                b'"' | b'\'' => quote = Some(c),
                b'>' => return Some(i + 1),
                _ => {}
            },
        }
    }
    None
}

/// Rewrite the `href` attribute of one `<a ...>` tag, if present and
/// resolving to the upstream origin.
fn rewrite_anchor_tag(tag: &str, ctx: &RewriteContext) -> String {
    let Some((value_start, value_end)) = find_href_value(tag) else {
        return tag.to_string();
    };
    match rewrite_href(&tag[value_start..value_end], ctx) {
        Some(rewritten) => {
            let mut out = String::with_capacity(tag.len() + rewritten.len());
            out.push_str(&tag[..value_start]);
            out.push_str(&rewritten);
            out.push_str(&tag[value_end..]);
            out
        }
        None => tag.to_string(),
    }
}

/// Byte range of the quoted `href` value inside an anchor tag.
///
/// Unquoted values are not rewritten.
fn find_href_value(tag: &str) -> Option<(usize, usize)> {
    let bytes = tag.as_bytes();
    let mut i = 1;
    while i + 4 <= bytes.len() {
        if !bytes[i..i + 4].eq_ignore_ascii_case(b"href") || !bytes[i - 1].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let mut j = i + 4;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if bytes.get(j) != Some(&b'=') {
            i += 4;
            continue;
        }
        j += 1;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let quote = match bytes.get(j) {
            Some(&b'"') => '"',
            Some(&b'\'') => '\'',
            _ => return None,
        };
        let start = j + 1;
        let close = tag[start..].find(quote)?;
        return Some((start, start + close));
    }
    None
}

/// Compute the replacement for one href value, or `None` to leave it alone.
///
/// Fragment-only, `javascript:`, `mailto:` and `tel:` links keep their
/// meaning inside the framed page. Cross-origin links deliberately escape
/// the relay; only same-origin navigation is kept inside it.
fn rewrite_href(value: &str, ctx: &RewriteContext) -> Option<String> {
    let href = value.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let resolved = ctx.page_url.join(href).ok()?;
    if resolved.origin() != ctx.page_url.origin() {
        return None;
    }

    Some(format!(
        "{}{}?url={}",
        ctx.relay_base,
        ctx.route,
        urlencoding::encode(resolved.as_str())
    ))
}
