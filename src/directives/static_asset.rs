use super::RenderContext;
use crate::asset_paths::is_external_reference;
use crate::asset_paths::posix::to_forward_slashes;
use crate::compiler::Compiler;
use crate::error::{FacadeError, Result};

/// `{{static "images/a.css"}}`: URL of a static asset shipped with the current package.
///
/// Relative paths resolve against the template's output root, rooted paths are kept, and
/// external URLs are returned untouched.
pub fn static_asset(
    compiler: &Compiler,
    argument: Option<&str>,
    _context: &mut RenderContext,
) -> Result<String> {
    let reference = argument
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| FacadeError::MalformedReference {
            reference: String::new(),
            reason: "static requires an asset path",
        })?;

    if is_external_reference(reference) {
        return Ok(reference.to_string());
    }

    let layout = compiler.layout();
    let path = remap_extension(&to_forward_slashes(reference), &layout.js_ext, &layout.css_ext);
    Ok(compiler.url_builder().build(&path))
}

/// Swap a `.js` or `.css` extension for the configured output extension.
///
/// Files already carrying the output extension, and every other extension, are unchanged.
pub fn remap_extension(path: &str, js_ext: &str, css_ext: &str) -> String {
    let (directory, file) = match path.rfind('/') {
        Some(index) => path.split_at(index + 1),
        None => ("", path),
    };
    let (base, extension) = match file.rfind('.') {
        Some(index) if index > 0 => file.split_at(index),
        _ => return path.to_string(),
    };

    let target = match extension {
        ".js" => js_ext,
        ".css" => css_ext,
        _ => return path.to_string(),
    };
    if file.ends_with(target) {
        return path.to_string();
    }
    format!("{directory}{base}{target}")
}
