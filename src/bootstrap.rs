//! The bootstrap block emitted before the first facade of a render.
//!
//! It loads every engine with a plain script tag and then hands the flattened dependency
//! tree and the module root to the client runtime:
//!
//! ```text
//! <script src="/mod/neuron/4.2.1/neuron.js"></script>
//! <script>neuron.config({tree:{...},path:"/mod"});</script>
//! ```

use serde::Serialize;

use crate::compiler::Compiler;
use crate::directives::module_file_url;
use crate::error::Result;
use crate::package_ref::PackageRef;

/// Engine script tags followed by the runtime config block.
pub fn bootstrap_block(compiler: &Compiler) -> Result<String> {
    let mut output = engine_scripts(compiler)?;
    output.push_str(&runtime_config(compiler)?);
    Ok(output)
}

/// One `<script src>` per engine, in lockfile order.
pub fn engine_scripts(compiler: &Compiler) -> Result<String> {
    let resolver = compiler.resolver();
    let mut output = String::new();
    for engine in compiler.graph().engines() {
        let version = resolver.resolve(&PackageRef::exact(&engine.name, &engine.version))?;
        let src = module_file_url(compiler, &engine.name, &version, None);
        output.push_str(&format!("<script src=\"{src}\"></script>"));
    }
    Ok(output)
}

/// `neuron.config` call carrying the dependency tree and the module root URL.
pub fn runtime_config(compiler: &Compiler) -> Result<String> {
    let tree = script_literal(compiler.graph().tree())?;
    let path = compiler
        .url_builder()
        .build_hashed(&compiler.layout().mod_root);
    Ok(format!(
        "<script>neuron.config({{tree:{tree},path:{}}});</script>",
        script_literal(&path)?
    ))
}

/// Serialize `value` as a JSON literal that is safe to embed in an inline script.
pub fn script_literal<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::script_literal;

    #[test]
    fn escapes_closing_tags() {
        assert_eq!(script_literal("</script>").unwrap(), r#""<\/script>""#);
        assert_eq!(script_literal("foo@0.2.0").unwrap(), r#""foo@0.2.0""#);
    }
}
