use tracing::debug;

use super::RenderContext;
use crate::bootstrap::bootstrap_block;
use crate::compiler::Compiler;
use crate::error::Result;

/// `{{facade "name@range/sub/path"}}`: load an entry module through the client runtime.
///
/// The first facade of a render is preceded by the bootstrap block. The emitted identifier is
/// `name@version`, or `name@version/sub/path.js` when a sub-path is given; the client runtime
/// turns it into a URL using the runtime config.
pub fn facade(
    compiler: &Compiler,
    argument: Option<&str>,
    context: &mut RenderContext,
) -> Result<String> {
    let reference = compiler.reference(argument)?;
    let version = compiler.resolver().resolve(&reference)?;

    let mut id = format!("{}@{}", reference.name, version);
    if let Some(sub_path) = &reference.sub_path {
        id.push('/');
        id.push_str(sub_path.strip_suffix(".js").unwrap_or(sub_path));
        id.push_str(".js");
    }

    let mut output = String::new();
    if context.enter_facade() {
        debug!(module = %id, "emitting bootstrap block");
        output.push_str(&bootstrap_block(compiler)?);
    }
    output.push_str(&format!(
        "<script>facade({{mod:{}}});</script>",
        single_quoted(&id)
    ));
    Ok(output)
}

/// Single-quoted script string literal, safe to embed in an inline script.
fn single_quoted(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace("</", "<\\/");
    format!("'{escaped}'")
}
