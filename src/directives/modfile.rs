use super::RenderContext;
use crate::asset_paths::posix::join;
use crate::compiler::Compiler;
use crate::error::Result;

/// `{{modfile "name@range/sub/file"}}`: fetchable URL of a file inside a locked module.
pub fn modfile(
    compiler: &Compiler,
    argument: Option<&str>,
    _context: &mut RenderContext,
) -> Result<String> {
    let reference = compiler.reference(argument)?;
    let version = compiler.resolver().resolve(&reference)?;
    Ok(module_file_url(
        compiler,
        &reference.name,
        &version,
        reference.sub_path.as_deref(),
    ))
}

/// URL of `sub_path` inside `name@version`, defaulting to the module's main script.
pub fn module_file_url(
    compiler: &Compiler,
    name: &str,
    version: &str,
    sub_path: Option<&str>,
) -> String {
    let layout = compiler.layout();
    let file = match sub_path.map(|path| path.trim_start_matches(['/', '\\'])) {
        Some(path) if !path.is_empty() => path.to_string(),
        _ => format!("{name}{}", layout.js_ext),
    };
    let path = join(&[layout.mod_root.as_str(), name, version, file.as_str()]);
    compiler.url_builder().build_anchored(&path)
}
