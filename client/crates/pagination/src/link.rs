//! `Link` header parsing (RFC 8288 subset).
//!
//! Only the parts needed for cursor pagination are supported: the bracketed
//! target reference and the `rel` parameter. Other parameters are accepted and
//! ignored. Entries that cannot be parsed are skipped rather than reported, so
//! a damaged header degrades to "no further pages".

use url::Url;

/// One link entry decoded from a `Link` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue {
    target: Url,
    relations: Vec<String>,
}

impl LinkValue {
    /// Absolute target URL of the link.
    #[must_use]
    pub const fn target(&self) -> &Url {
        &self.target
    }

    /// Relation types declared by the `rel` parameter, in header order.
    #[must_use]
    pub fn relations(&self) -> &[String] {
        &self.relations
    }

    /// Return whether the link declares `relation` (case-insensitive).
    #[must_use]
    pub fn has_relation(&self, relation: &str) -> bool {
        self.relations
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(relation))
    }

    /// Consume the entry and return its target URL.
    #[must_use]
    pub fn into_target(self) -> Url {
        self.target
    }
}

/// Parse every well-formed entry in a `Link` header value.
///
/// Relative targets are resolved against `base`. Entries without a `rel`
/// parameter, with an empty target, or with a non-HTTP scheme are dropped.
///
/// # Examples
///
/// ```rust
/// use pagination::{parse_link_header, Url};
///
/// let base = Url::parse("https://api.example.test/v1/rooms").expect("valid base");
/// let links = parse_link_header(
///     r#"<https://api.example.test/v1/rooms?cursor=2>; rel="next", </v1/rooms>; rel="first""#,
///     &base,
/// );
/// assert_eq!(links.len(), 2);
/// assert!(links.iter().any(|link| link.has_relation("first")));
/// ```
#[must_use]
pub fn parse_link_header(value: &str, base: &Url) -> Vec<LinkValue> {
    split_top_level(value, ',')
        .into_iter()
        .filter_map(|entry| parse_entry(entry, base))
        .collect()
}

/// Return the target of the first `rel="next"` entry, if any.
///
/// # Examples
///
/// ```rust
/// use pagination::{next_link, Url};
///
/// let base = Url::parse("https://api.example.test/v1/").expect("valid base");
/// let next = next_link(r#"<https://api.example.test/v1/people?cursor=abc>; rel="next""#, &base);
/// assert_eq!(
///     next.map(|url| url.to_string()).as_deref(),
///     Some("https://api.example.test/v1/people?cursor=abc"),
/// );
/// assert!(next_link("garbage", &base).is_none());
/// ```
#[must_use]
pub fn next_link(value: &str, base: &Url) -> Option<Url> {
    parse_link_header(value, base)
        .into_iter()
        .find(|link| link.has_relation("next"))
        .map(LinkValue::into_target)
}

fn parse_entry(entry: &str, base: &Url) -> Option<LinkValue> {
    let mut segments = split_top_level(entry, ';').into_iter();
    let reference = segments.next()?.trim();
    let raw_target = reference.strip_prefix('<')?.strip_suffix('>')?.trim();
    if raw_target.is_empty() {
        return None;
    }

    let target = base.join(raw_target).ok()?;
    if !matches!(target.scheme(), "http" | "https") {
        return None;
    }

    let relations = segments
        .filter_map(parse_param)
        .filter(|(name, _)| name.eq_ignore_ascii_case("rel"))
        .flat_map(|(_, value)| value.split_whitespace().map(str::to_owned))
        .collect::<Vec<_>>();
    if relations.is_empty() {
        return None;
    }

    Some(LinkValue { target, relations })
}

fn parse_param(segment: &str) -> Option<(&str, &str)> {
    let (name, raw_value) = segment.split_once('=')?;
    let trimmed = raw_value.trim();
    let value = trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed);
    Some((name.trim(), value))
}

/// Split on `delimiter` while ignoring occurrences inside `<...>` or quotes.
fn split_top_level(value: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_brackets = false;
    let mut in_quotes = false;
    let mut start = 0;

    for (index, ch) in value.char_indices() {
        match ch {
            '<' if !in_quotes => in_brackets = true,
            '>' if !in_quotes => in_brackets = false,
            '"' if !in_brackets => in_quotes = !in_quotes,
            _ if ch == delimiter && !in_brackets && !in_quotes => {
                parts.push(value.get(start..index).unwrap_or_default());
                start = index + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(value.get(start..).unwrap_or_default());
    parts
}

#[cfg(test)]
mod tests {
    //! Regression coverage for `Link` header parsing.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn base() -> Url {
        Url::parse("https://api.ciscospark.com/v1/rooms?max=2").expect("valid base URL")
    }

    #[rstest]
    #[case::quoted(r#"<https://api.ciscospark.com/v1/rooms?cursor=b2>; rel="next""#)]
    #[case::unquoted("<https://api.ciscospark.com/v1/rooms?cursor=b2>; rel=next")]
    #[case::upper_case(r#"<https://api.ciscospark.com/v1/rooms?cursor=b2>; REL="NEXT""#)]
    #[case::spaced(r#"  < https://api.ciscospark.com/v1/rooms?cursor=b2 > ;  rel = "next"  "#)]
    #[case::multiple_relations(
        r#"<https://api.ciscospark.com/v1/rooms?cursor=b2>; rel="next last""#
    )]
    fn finds_next_relation_in_common_spellings(base: Url, #[case] header: &str) {
        let next = next_link(header, &base).expect("next link should be found");
        assert_eq!(next.as_str(), "https://api.ciscospark.com/v1/rooms?cursor=b2");
    }

    #[rstest]
    fn picks_next_among_several_entries(base: Url) {
        let header = concat!(
            r#"<https://api.ciscospark.com/v1/rooms?cursor=a1>; rel="prev", "#,
            r#"<https://api.ciscospark.com/v1/rooms?cursor=c3>; rel="next""#,
        );
        let next = next_link(header, &base).expect("next link should be found");
        assert_eq!(next.query(), Some("cursor=c3"));
    }

    #[rstest]
    fn keeps_commas_inside_targets(base: Url) {
        let header = r#"<https://api.ciscospark.com/v1/people?id=a,b,c>; rel="next""#;
        let links = parse_link_header(header, &base);
        assert_eq!(links.len(), 1, "comma inside brackets must not split the entry");
        assert_eq!(links.first().map(|link| link.target().query()), Some(Some("id=a,b,c")));
    }

    #[rstest]
    fn resolves_relative_targets_against_base(base: Url) {
        let next = next_link(r#"</v1/rooms?cursor=z>; rel="next""#, &base)
            .expect("relative next link should resolve");
        assert_eq!(next.as_str(), "https://api.ciscospark.com/v1/rooms?cursor=z");
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_brackets(r#"https://api.ciscospark.com/v1/rooms?cursor=b2; rel="next""#)]
    #[case::no_rel("<https://api.ciscospark.com/v1/rooms?cursor=b2>")]
    #[case::other_rel(r#"<https://api.ciscospark.com/v1/rooms?cursor=b2>; rel="prev""#)]
    #[case::empty_target(r#"<>; rel="next""#)]
    #[case::unclosed(r#"<https://api.ciscospark.com/v1/rooms; rel="next""#)]
    #[case::foreign_scheme(r#"<ftp://files.example.test/rooms>; rel="next""#)]
    fn malformed_or_absent_next_yields_none(base: Url, #[case] header: &str) {
        assert!(next_link(header, &base).is_none(), "header {header:?} must not yield a next link");
    }

    #[rstest]
    fn skips_broken_entries_but_keeps_good_ones(base: Url) {
        let header = concat!(
            "broken entry, ",
            r#"<https://api.ciscospark.com/v1/rooms?cursor=ok>; title="a; b"; rel="next""#,
        );
        let links = parse_link_header(header, &base);
        assert_eq!(links.len(), 1);
        assert_eq!(links.first().map(LinkValue::relations), Some(&["next".to_owned()][..]));
    }
}
