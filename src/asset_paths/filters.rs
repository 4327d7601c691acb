use std::sync::OnceLock;

use regex::Regex;

fn external_reference() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:[a-z][a-z0-9+.-]*://|//|#|(?:data|mailto|tel|javascript):)")
            .expect("invalid external reference regex")
    })
}

/// Whether a directive argument addresses something outside the package output.
///
/// Scheme and protocol-relative URLs, in-page fragments, and `data:`, `mailto:`, `tel:` or
/// `javascript:` references are emitted exactly as written.
pub fn is_external_reference(value: &str) -> bool {
    external_reference().is_match(value.trim_start())
}

#[cfg(test)]
mod tests {
    use super::is_external_reference;

    #[test]
    fn passes_through_foreign_urls() {
        for value in [
            "https://cdn.example.com/a.css",
            "HTTP://example.com",
            "//cdn.example.com/a.js",
            "ftp://files.example.com/x.zip",
        ] {
            assert!(is_external_reference(value), "{value:?}");
        }
    }

    #[test]
    fn passes_through_inline_references() {
        for value in [
            "data:image/png;base64,abc",
            "MAILTO:user@example.com",
            "tel:+15550100",
            "javascript:void(0)",
            "#top",
        ] {
            assert!(is_external_reference(value), "{value:?}");
        }
    }

    #[test]
    fn rewrites_package_paths() {
        for value in [
            "images/photo.png",
            "/images/photo.png",
            "../about.html",
            "./contact.html",
            "C:/assets/a.png",
            "mailto.html",
        ] {
            assert!(!is_external_reference(value), "{value:?}");
        }
    }
}
