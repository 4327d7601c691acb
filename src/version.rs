//! Range satisfaction and version resolution against the locked graph.
//!
//! Templates write ranges in the npm dialect (`^1.2.0`, `1.x`, `>=1.0.0 <2.0.0`,
//! `1.0.0 - 1.4.0`, `a || b`). Each range is translated into one [`VersionReq`] per `||`
//! alternative, and a version satisfies the range when any alternative matches it.

use std::collections::BTreeSet;

use semver::{Version, VersionReq};
use tracing::debug;

use crate::error::{FacadeError, Result};
use crate::graph::DependencyGraph;
use crate::models::Manifest;
use crate::package_ref::PackageRef;

/// A parsed npm-style version range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Parse a range expression, returning `None` when it is not valid range syntax.
    pub fn parse(range: &str) -> Option<Self> {
        let alternatives = range
            .split("||")
            .map(translate_alternative)
            .map(|requirement| VersionReq::parse(&requirement?).ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Self { alternatives })
    }

    /// Whether `version` satisfies any alternative of the range.
    pub fn matches(&self, version: &Version) -> bool {
        self
            .alternatives
            .iter()
            .any(|requirement| requirement.matches(version))
    }

    /// Highest candidate satisfying the range under semantic-version ordering.
    ///
    /// Candidates that are not valid versions are ignored.
    pub fn max_satisfying<'a, I>(&self, candidates: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .filter_map(|candidate| {
                let parsed = Version::parse(candidate.trim_start_matches(['v', '='])).ok()?;
                self.matches(&parsed).then_some((parsed, candidate))
            })
            .max_by(|(left, _), (right, _)| left.cmp(right))
            .map(|(_, candidate)| candidate)
    }
}

/// Translate one `||` alternative into `semver` requirement syntax.
fn translate_alternative(alternative: &str) -> Option<String> {
    let alternative = alternative.trim();
    if alternative.is_empty() || alternative == "latest" || is_wildcard(alternative) {
        return Some("*".to_string());
    }

    if let Some((low, high)) = alternative.split_once(" - ") {
        let (low, high) = (low.trim(), high.trim());
        if low.is_empty() || high.is_empty() {
            return None;
        }
        return Some(format!(">={}, <={}", strip_v(low), strip_v(high)));
    }

    let mut comparators = Vec::new();
    let mut pending_operator: Option<&str> = None;
    for token in alternative.split_whitespace() {
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            if pending_operator.replace(token).is_some() {
                return None;
            }
            continue;
        }

        let comparator = match pending_operator.take() {
            Some(operator) => format!("{operator}{}", strip_v(token)),
            None => translate_comparator(token),
        };
        comparators.push(comparator);
    }

    if pending_operator.is_some() || comparators.is_empty() {
        return None;
    }
    Some(comparators.join(", "))
}

/// A comparator without an operator is an exact (possibly partial) version in npm.
fn translate_comparator(token: &str) -> String {
    let operator_len = token
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
        .unwrap_or(token.len());
    let (operator, token) = token.split_at(operator_len);
    let token = strip_v(token);
    if !operator.is_empty() {
        return format!("{operator}{token}");
    }
    if is_wildcard(token) {
        return "*".to_string();
    }
    let starts_with_digit = token.starts_with(|c: char| c.is_ascii_digit());
    let has_wildcard = token
        .split('.')
        .any(|part| matches!(part, "x" | "X" | "*"));
    if starts_with_digit && !has_wildcard {
        format!("={token}")
    } else {
        token.to_string()
    }
}

fn strip_v(token: &str) -> &str {
    token
        .strip_prefix('v')
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(token)
}

fn is_wildcard(token: &str) -> bool {
    matches!(token, "*" | "x" | "X")
}

/// Resolves module references to exact locked versions.
#[derive(Debug, Clone, Copy)]
pub struct VersionResolver<'a> {
    package: &'a Manifest,
    graph: &'a DependencyGraph,
}

impl<'a> VersionResolver<'a> {
    /// Resolver for references made from within `package`.
    pub fn new(package: &'a Manifest, graph: &'a DependencyGraph) -> Self {
        Self { package, graph }
    }

    /// Resolve `reference` to an exact version.
    ///
    /// References to the package being built always resolve to its own version. Otherwise an
    /// exact pinned version is returned unchecked, and a range resolves to the highest locked
    /// version that satisfies it.
    pub fn resolve(&self, reference: &PackageRef) -> Result<String> {
        if reference.name == self.package.name {
            if let Some(requested) = reference.version.as_deref().or(reference.range.as_deref()) {
                debug!(
                    name = %reference.name,
                    requested,
                    version = %self.package.version,
                    "self reference pinned to the current build"
                );
            }
            return Ok(self.package.version.clone());
        }

        if let Some(version) = &reference.version {
            return Ok(version.clone());
        }

        let range_text = reference.range_or_any();
        let range = VersionRange::parse(range_text).ok_or_else(|| FacadeError::InvalidRange {
            reference: reference.to_string(),
        })?;

        let unsatisfiable = || FacadeError::UnsatisfiableRange {
            name: reference.name.clone(),
            range: range_text.to_string(),
        };
        let candidates: &BTreeSet<String> = self
            .graph
            .versions_of(&reference.name)
            .ok_or_else(unsatisfiable)?;
        let version = range
            .max_satisfying(candidates.iter().map(String::as_str))
            .ok_or_else(unsatisfiable)?;

        debug!(name = %reference.name, range = range_text, version, "resolved module version");
        Ok(version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LockNode;

    fn range(text: &str) -> VersionRange {
        VersionRange::parse(text).unwrap_or_else(|| panic!("{text:?} should parse"))
    }

    fn max<'a>(text: &str, candidates: &[&'a str]) -> Option<&'a str> {
        range(text).max_satisfying(candidates.iter().copied())
    }

    #[test]
    fn picks_highest_satisfying_version() {
        let candidates = ["1.0.0", "1.3.0", "1.2.5", "2.0.0"];
        assert_eq!(max("^1.2.0", &candidates), Some("1.3.0"));
        assert_eq!(max("~1.2.0", &candidates), Some("1.2.5"));
        assert_eq!(max("*", &candidates), Some("2.0.0"));
        assert_eq!(max("^3.0.0", &candidates), None);
    }

    #[test]
    fn orders_semantically_not_lexically() {
        assert_eq!(max("*", &["1.9.0", "1.10.0", "1.2.0"]), Some("1.10.0"));
    }

    #[test]
    fn treats_bare_versions_as_exact() {
        let candidates = ["1.0.0", "1.2.3", "1.2.9", "2.0.0"];
        assert_eq!(max("1.2.3", &candidates), Some("1.2.3"));
        assert_eq!(max("1.2", &candidates), Some("1.2.9"));
        assert_eq!(max("1", &candidates), Some("1.2.9"));
        assert_eq!(max("v2.0.0", &candidates), Some("2.0.0"));
    }

    #[test]
    fn supports_npm_range_dialect() {
        let candidates = ["0.9.0", "1.0.0", "1.4.0", "1.5.0", "2.1.0", "3.0.0"];
        assert_eq!(max(">=1.0.0 <2.0.0", &candidates), Some("1.5.0"));
        assert_eq!(max(">= 1.0.0 < 1.5.0", &candidates), Some("1.4.0"));
        assert_eq!(max("1.0.0 - 1.4.0", &candidates), Some("1.4.0"));
        assert_eq!(max("^0.9.0 || ^2.0.0", &candidates), Some("2.1.0"));
        assert_eq!(max("1.x", &candidates), Some("1.5.0"));
        assert_eq!(max("latest", &candidates), Some("3.0.0"));
        assert_eq!(max("", &candidates), Some("3.0.0"));
    }

    #[test]
    fn strips_v_prefixes_after_operators() {
        let candidates = ["0.9.0", "1.0.0", "1.4.0", "1.5.0", "2.1.0"];
        assert_eq!(max(">=v1.0.0", &candidates), Some("2.1.0"));
        assert_eq!(max(">=v1.0.0 <v1.5.0", &candidates), Some("1.4.0"));
        assert_eq!(max("^v1.4.0", &candidates), Some("1.5.0"));
        assert_eq!(max("v1.4.0", &candidates), Some("1.4.0"));
        assert_eq!(max("> v1.4.0 || ~v0.9.0", &candidates), Some("2.1.0"));
    }

    #[test]
    fn rejects_invalid_ranges() {
        for text in ["not-a-range", ">=", "^1.2.0 ||| 2", "1.0.0 - ", ">= >= 1.0.0"] {
            assert!(VersionRange::parse(text).is_none(), "{text:?} should be invalid");
        }
    }

    #[test]
    fn ignores_unparseable_candidates() {
        assert_eq!(max("*", &["garbage", "0.1.0"]), Some("0.1.0"));
    }

    fn fixture() -> (Manifest, DependencyGraph) {
        let lock = LockNode::locked("0.2.0").with_dependency(
            "bar",
            LockNode::locked("1.0.0").with_dependency("bar", LockNode::locked("2.0.0")),
        );
        let manifest = Manifest::new("foo", "0.2.0");
        let graph = DependencyGraph::build(&manifest.name, &lock).unwrap();
        (manifest, graph)
    }

    #[test]
    fn self_references_pin_to_current_build() {
        let (manifest, graph) = fixture();
        let resolver = VersionResolver::new(&manifest, &graph);

        for text in ["foo", "foo@^9.0.0", "foo@0.1.0", "foo@not a range"] {
            let reference = PackageRef::parse(text).unwrap();
            assert_eq!(resolver.resolve(&reference).unwrap(), "0.2.0");
        }
        assert_eq!(
            resolver.resolve(&PackageRef::exact("foo", "9.9.9")).unwrap(),
            "0.2.0"
        );
    }

    #[test]
    fn exact_versions_skip_the_graph() {
        let (manifest, graph) = fixture();
        let resolver = VersionResolver::new(&manifest, &graph);
        let reference = PackageRef::exact("unlocked", "5.0.0");
        assert_eq!(resolver.resolve(&reference).unwrap(), "5.0.0");
    }

    #[test]
    fn resolves_ranges_across_the_graph() {
        let (manifest, graph) = fixture();
        let resolver = VersionResolver::new(&manifest, &graph);

        let latest = PackageRef::parse("bar").unwrap();
        assert_eq!(resolver.resolve(&latest).unwrap(), "2.0.0");

        let pinned = PackageRef::parse("bar@~1.0.0").unwrap();
        assert_eq!(resolver.resolve(&pinned).unwrap(), "1.0.0");
        assert_eq!(resolver.resolve(&pinned).unwrap(), resolver.resolve(&pinned).unwrap());
    }

    #[test]
    fn reports_unsatisfiable_ranges() {
        let (manifest, graph) = fixture();
        let resolver = VersionResolver::new(&manifest, &graph);

        let missing_version = PackageRef::parse("bar@1.2.3").unwrap();
        assert!(matches!(
            resolver.resolve(&missing_version),
            Err(FacadeError::UnsatisfiableRange { ref name, .. }) if name == "bar"
        ));

        let missing_package = PackageRef::parse("nope").unwrap();
        assert!(matches!(
            resolver.resolve(&missing_package),
            Err(FacadeError::UnsatisfiableRange { .. })
        ));
    }

    #[test]
    fn reports_invalid_ranges_with_reference() {
        let (manifest, graph) = fixture();
        let resolver = VersionResolver::new(&manifest, &graph);

        let reference = PackageRef::parse("bar@wat").unwrap();
        match resolver.resolve(&reference) {
            Err(FacadeError::InvalidRange { reference }) => assert_eq!(reference, "bar@wat"),
            other => panic!("expected invalid range, got {other:?}"),
        }
    }
}
