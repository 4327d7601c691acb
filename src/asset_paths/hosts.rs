use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Token substituted for the shard number of a host in hashed form.
pub const HOST_SHARD_PLACEHOLDER: &str = "{n}";

fn shard_digit() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d").expect("invalid shard digit regex"))
}

/// Pick the host serving `absolute_path`.
///
/// With hash sharding the index is the path length in UTF-16 code units modulo the host count,
/// which is the shard the client runtime computes for the same path. Without it the first
/// host is always used.
pub fn select_host<'a>(
    hosts: &'a [String],
    absolute_path: &str,
    hash_host: bool,
) -> Option<&'a str> {
    if hosts.is_empty() {
        return None;
    }

    let index = if hash_host {
        absolute_path.encode_utf16().count() % hosts.len()
    } else {
        0
    };
    Some(hosts[index].as_str())
}

/// Replace the first digit of the host's first dot-separated label with the shard placeholder.
///
/// Hosts without a digit in their first label are returned unchanged.
pub fn hashed_host(host: &str) -> Cow<'_, str> {
    let (label, rest) = match host.find('.') {
        Some(index) => host.split_at(index),
        None => (host, ""),
    };

    match shard_digit().find(label) {
        Some(digit) => Cow::Owned(format!(
            "{}{}{}{}",
            &label[..digit.start()],
            HOST_SHARD_PLACEHOLDER,
            &label[digit.end()..],
            rest
        )),
        None => Cow::Borrowed(host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> Vec<String> {
        vec!["i1.cdn.com".into(), "i2.cdn.com".into(), "i3.cdn.com".into()]
    }

    #[test]
    fn returns_none_without_hosts() {
        assert_eq!(select_host(&[], "/r/a.js", true), None);
    }

    #[test]
    fn shards_by_path_length() {
        let hosts = hosts();
        // "/r/a.js" is 7 units long, 7 % 3 == 1
        assert_eq!(select_host(&hosts, "/r/a.js", true), Some("i2.cdn.com"));
        assert_eq!(select_host(&hosts, "/r/ab.js", true), Some("i3.cdn.com"));
        assert_eq!(select_host(&hosts, "/r/abc.js", true), Some("i1.cdn.com"));
    }

    #[test]
    fn measures_paths_in_utf16_units() {
        let hosts = hosts();
        // 8 bytes but 7 units
        assert_eq!(select_host(&hosts, "/r/\u{e9}.js", true), Some("i2.cdn.com"));
        // 10 bytes but 8 units, the emoji is a surrogate pair
        assert_eq!(select_host(&hosts, "/r/\u{1f600}.js", true), Some("i3.cdn.com"));
    }

    #[test]
    fn sharding_is_stable_across_calls() {
        let hosts = hosts();
        let first = select_host(&hosts, "/mod/foo/0.2.0/foo.js", true);
        for _ in 0..5 {
            assert_eq!(select_host(&hosts, "/mod/foo/0.2.0/foo.js", true), first);
        }
    }

    #[test]
    fn uses_first_host_without_hash_sharding() {
        let hosts = hosts();
        assert_eq!(select_host(&hosts, "/r/a.js", false), Some("i1.cdn.com"));
        assert_eq!(select_host(&hosts, "/r/ab.js", false), Some("i1.cdn.com"));
    }

    #[test]
    fn replaces_first_digit_of_first_label() {
        assert_eq!(hashed_host("i1.cdn.com"), "i{n}.cdn.com");
        assert_eq!(hashed_host("s12.cdn.com"), "s{n}2.cdn.com");
        assert_eq!(hashed_host("static.cdn2.com"), "static.cdn2.com");
        assert_eq!(hashed_host("localhost8080"), "localhost{n}080");
    }
}
