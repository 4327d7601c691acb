use super::RenderContext;
use crate::asset_paths::is_external_reference;
use crate::asset_paths::posix::{dirname, escapes_root, join, relative, to_forward_slashes};
use crate::compiler::Compiler;
use crate::error::{FacadeError, Result};

/// `{{href "./page.html"}}`: rewrite a link to another page of the current package.
///
/// Without an `hrefRoot` links are emitted unchanged. With one, links are served from
/// `hrefRoot/<package name>/`; relative links are resolved from the template's directory
/// and may not leave the build root.
pub fn href(
    compiler: &Compiler,
    argument: Option<&str>,
    _context: &mut RenderContext,
) -> Result<String> {
    let link = argument.map(str::trim).unwrap_or_default();
    let Some(href_root) = compiler.layout().href_root.as_deref() else {
        return Ok(link.to_string());
    };
    if is_external_reference(link) {
        return Ok(link.to_string());
    }
    if link.is_empty() {
        return Err(FacadeError::MalformedReference {
            reference: String::new(),
            reason: "href requires a link",
        });
    }

    let prefix = format!(
        "{}/{}",
        href_root.trim_end_matches('/'),
        compiler.package().name
    );
    let link = to_forward_slashes(link);
    if !link.starts_with('.') {
        return Ok(format!("{prefix}/{}", link.trim_start_matches('/')));
    }

    let target = join(&[dirname(compiler.template_path()), link.as_str()]);
    let within_root = relative(compiler.build_root(), &target);
    if escapes_root(&within_root) {
        return Err(FacadeError::PathTraversal { reference: link });
    }
    Ok(format!("{prefix}/{within_root}"))
}
