use tracing::trace;

use super::hosts::{hashed_host, select_host};
use super::posix::{join, normalize, to_forward_slashes};

/// Turns asset paths into final, forward-slash URLs for one template.
#[derive(Debug, Clone)]
pub struct UrlBuilder<'a> {
    output_root: String,
    hosts: &'a [String],
    hash_host: bool,
}

impl<'a> UrlBuilder<'a> {
    /// Builder for a template whose output lands in `output_root`.
    pub fn new(output_root: impl Into<String>, hosts: &'a [String], hash_host: bool) -> Self {
        Self {
            output_root: to_forward_slashes(&output_root.into()),
            hosts,
            hash_host,
        }
    }

    /// Output root the relative asset paths are joined onto.
    pub fn output_root(&self) -> &str {
        &self.output_root
    }

    /// Build the URL of `asset_path`.
    ///
    /// A rooted path is used as-is, anything else is joined onto the output root. Without
    /// hosts the result is a root-relative path, otherwise it is prefixed with the host
    /// selected for it.
    pub fn build(&self, asset_path: &str) -> String {
        let asset_path = to_forward_slashes(asset_path);
        let absolute = if asset_path.starts_with('/') {
            normalize(&asset_path)
        } else {
            join(&[self.output_root.as_str(), asset_path.as_str()])
        };
        self.with_host(absolute, false)
    }

    /// Build the URL of a path already anchored at the module root.
    ///
    /// Unlike [`UrlBuilder::build`] the path is never joined onto the output root, even when
    /// the module root itself is relative.
    pub fn build_anchored(&self, path: &str) -> String {
        self.with_host(normalize(path), false)
    }

    /// Same as [`UrlBuilder::build_anchored`] but leaves the shard number of the host as a
    /// placeholder for the client runtime to fill in.
    pub fn build_hashed(&self, path: &str) -> String {
        self.with_host(normalize(path), true)
    }

    fn with_host(&self, absolute: String, hashed: bool) -> String {
        let Some(host) = select_host(self.hosts, &absolute, self.hash_host) else {
            return absolute;
        };
        let host = if hashed {
            hashed_host(host)
        } else {
            host.into()
        };
        trace!(%host, path = %absolute, "selected asset host");

        let host = host.trim_end_matches('/');
        let scheme = if host.contains("//") { "" } else { "//" };
        let separator = if absolute.starts_with('/') { "" } else { "/" };
        format!("{scheme}{host}{separator}{absolute}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> Vec<String> {
        vec!["i1.cdn.com".into(), "i2.cdn.com".into()]
    }

    #[test]
    fn joins_relative_assets_onto_output_root() {
        let builder = UrlBuilder::new("/r/foo/0.2.0/tpl", &[], true);
        assert_eq!(builder.build("images/a.css"), "/r/foo/0.2.0/tpl/images/a.css");
        assert_eq!(builder.build("../shared/b.css"), "/r/foo/0.2.0/shared/b.css");
    }

    #[test]
    fn keeps_rooted_assets() {
        let builder = UrlBuilder::new("/r/foo/0.2.0", &[], true);
        assert_eq!(builder.build("/img/logo.png"), "/img/logo.png");
    }

    #[test]
    fn always_emits_forward_slashes() {
        let builder = UrlBuilder::new("\\r\\foo\\0.2.0", &[], true);
        let url = builder.build("images\\sub\\a.css");
        assert_eq!(url, "/r/foo/0.2.0/images/sub/a.css");
        assert!(!url.contains('\\'));
    }

    #[test]
    fn prefixes_sharded_host() {
        let hosts = hosts();
        let builder = UrlBuilder::new("/r", &hosts, true);
        // "/r/a.js" is 7 bytes long, 7 % 2 == 1
        assert_eq!(builder.build("a.js"), "//i2.cdn.com/r/a.js");
        assert_eq!(builder.build("ab.js"), "//i1.cdn.com/r/ab.js");
    }

    #[test]
    fn uses_first_host_without_sharding() {
        let hosts = hosts();
        let builder = UrlBuilder::new("/r", &hosts, false);
        assert_eq!(builder.build("a.js"), "//i1.cdn.com/r/a.js");
    }

    #[test]
    fn hashed_form_keeps_placeholder() {
        let hosts = hosts();
        let builder = UrlBuilder::new("/r", &hosts, false);
        assert_eq!(builder.build_hashed("/mod"), "//i{n}.cdn.com/mod");
    }

    #[test]
    fn keeps_explicit_host_schemes() {
        let hosts = vec!["https://s1.cdn.com/".to_string()];
        let builder = UrlBuilder::new("/mod", &hosts, true);
        assert_eq!(builder.build("a.js"), "https://s1.cdn.com/mod/a.js");
    }

    #[test]
    fn anchored_paths_skip_the_output_root() {
        let builder = UrlBuilder::new("../../../foo/0.2.0/tpl", &[], true);
        assert_eq!(
            builder.build_anchored("../../../neuron/4.2.1/neuron.js"),
            "../../../neuron/4.2.1/neuron.js"
        );

        let hosts = vec!["s1.cdn.com".to_string()];
        let builder = UrlBuilder::new("mod/foo/0.2.0", &hosts, true);
        assert_eq!(
            builder.build_anchored("mod/bar/1.0.0/bar.js"),
            "//s1.cdn.com/mod/bar/1.0.0/bar.js"
        );
    }
}
