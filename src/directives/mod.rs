//! The template directives and the per-render state they share.

mod facade;
mod href;
mod modfile;
mod static_asset;

pub use facade::facade;
pub use href::href;
pub use modfile::{modfile, module_file_url};
pub use static_asset::{remap_extension, static_asset};

use crate::compiler::Compiler;
use crate::error::Result;

/// A handler invoked for every occurrence of a named directive.
pub trait Directive {
    /// Produce the output replacing the directive in the rendered template.
    fn render(
        &self,
        compiler: &Compiler,
        argument: Option<&str>,
        context: &mut RenderContext,
    ) -> Result<String>;
}

impl<F> Directive for F
where
    F: Fn(&Compiler, Option<&str>, &mut RenderContext) -> Result<String>,
{
    fn render(
        &self,
        compiler: &Compiler,
        argument: Option<&str>,
        context: &mut RenderContext,
    ) -> Result<String> {
        self(compiler, argument, context)
    }
}

/// Built-in directives registered on every compiler.
pub(crate) fn builtins() -> Vec<(&'static str, Box<dyn Directive>)> {
    vec![
        ("facade", Box::new(facade) as Box<dyn Directive>),
        ("href", Box::new(href) as Box<dyn Directive>),
        ("static", Box::new(static_asset) as Box<dyn Directive>),
        ("modfile", Box::new(modfile) as Box<dyn Directive>),
    ]
}

/// State carried across the directives of a single render.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    facades: usize,
}

impl RenderContext {
    /// Fresh context for a new render.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of facade directives evaluated so far.
    pub fn facades(&self) -> usize {
        self.facades
    }

    /// Count a facade directive, returning `true` for the first one of the render.
    pub(crate) fn enter_facade(&mut self) -> bool {
        self.facades += 1;
        self.facades == 1
    }
}
