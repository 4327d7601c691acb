//! Compiler façade tying the dependency graph, layout and directives together.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::asset_paths::UrlBuilder;
use crate::asset_paths::posix::{normalize, resolve};
use crate::config::LayoutOptions;
use crate::directives::{self, Directive, RenderContext};
use crate::error::{FacadeError, Result};
use crate::graph::DependencyGraph;
use crate::layout::LayoutConfig;
use crate::models::{LockNode, Manifest};
use crate::package_ref::PackageRef;
use crate::template::{Node, Template};
use crate::version::VersionResolver;

/// Everything needed to construct a [`Compiler`].
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// The package being built.
    pub pkg: Manifest,
    /// Shrinkwrapped dependency graph of `pkg`.
    pub shrinkwrap: LockNode,
    /// Working directory relative paths are resolved against.
    pub cwd: String,
    /// Path of the template being compiled, absolute or relative to `cwd`.
    pub path: String,
    /// Output layout options.
    pub layout: LayoutOptions,
}

/// Compiles the templates of one package against one immutable lockfile.
///
/// Directives are registered on the instance, never globally, and the facade counter lives
/// in a [`RenderContext`] created per render, so one compiler can render any number of
/// templates.
pub struct Compiler {
    package: Manifest,
    graph: DependencyGraph,
    layout: LayoutConfig,
    cwd: String,
    template_path: String,
    output_root: String,
    directives: BTreeMap<String, Box<dyn Directive>>,
}

impl Compiler {
    /// Validate `options`, index the lockfile and register the built-in directives.
    pub fn new(options: CompilerOptions) -> Result<Self> {
        let CompilerOptions {
            pkg,
            shrinkwrap,
            cwd,
            path,
            layout,
        } = options;

        require(&pkg.name, "pkg.name")?;
        require(&pkg.version, "pkg.version")?;
        require(&cwd, "cwd")?;
        require(&path, "path")?;

        let cwd = normalize(&cwd);
        let template_path = resolve(&cwd, &path);
        let layout = layout.validate(&cwd)?;
        let graph = DependencyGraph::build(&pkg.name, &shrinkwrap)?;
        let output_root = layout
            .layout
            .strategy()
            .output_root(&layout.mod_root, &pkg, &template_path);

        debug!(
            package = %pkg.name,
            version = %pkg.version,
            template = %template_path,
            output_root = %output_root,
            "created compiler"
        );

        let mut compiler = Self {
            package: pkg,
            graph,
            layout,
            cwd,
            template_path,
            output_root,
            directives: BTreeMap::new(),
        };
        for (name, directive) in directives::builtins() {
            compiler.directives.insert(name.to_string(), directive);
        }
        Ok(compiler)
    }

    /// Register `directive` under `name`, replacing any directive of the same name.
    pub fn register<D>(&mut self, name: impl Into<String>, directive: D) -> &mut Self
    where
        D: Directive + 'static,
    {
        self.directives.insert(name.into(), Box::new(directive));
        self
    }

    /// Parse `source` into a template bound to this compiler.
    pub fn compile(&self, source: &str) -> Result<CompiledTemplate<'_>> {
        Ok(CompiledTemplate {
            compiler: self,
            template: Template::parse(source)?,
        })
    }

    /// Render `template` with a fresh render context.
    pub fn render(&self, template: &Template) -> Result<String> {
        self.render_with(template, &mut RenderContext::new())
    }

    /// Render `template` with a caller-provided context.
    ///
    /// Sharing one context across renders means only the first render emits the bootstrap
    /// block.
    pub fn render_with(&self, template: &Template, context: &mut RenderContext) -> Result<String> {
        let mut output = String::new();
        for node in template.nodes() {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Directive { name, argument } => {
                    let directive = self
                        .directives
                        .get(name)
                        .ok_or_else(|| FacadeError::UnknownDirective(name.clone()))?;
                    output.push_str(&directive.render(self, argument.as_deref(), context)?);
                }
            }
        }
        Ok(output)
    }

    /// Parse a directive argument, treating a missing or blank one as the current package.
    pub fn reference(&self, argument: Option<&str>) -> Result<PackageRef> {
        match argument.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => PackageRef::parse(text),
            None => Ok(PackageRef {
                name: self.package.name.clone(),
                version: None,
                range: None,
                sub_path: None,
            }),
        }
    }

    /// Version resolver bound to this package and graph.
    pub fn resolver(&self) -> VersionResolver<'_> {
        VersionResolver::new(&self.package, &self.graph)
    }

    /// URL builder for the current template.
    pub fn url_builder(&self) -> UrlBuilder<'_> {
        UrlBuilder::new(
            self.output_root.as_str(),
            &self.layout.hosts,
            self.layout.hash_host,
        )
    }

    /// The package being built.
    pub fn package(&self) -> &Manifest {
        &self.package
    }

    /// Index of the lockfile.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Validated layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Absolute, normalized path of the template.
    pub fn template_path(&self) -> &str {
        &self.template_path
    }

    /// Directory that hyperlinks may not escape.
    pub fn build_root(&self) -> &str {
        self.layout.layout.strategy().build_root(&self.cwd)
    }

    /// Directory relative asset paths of this template resolve against.
    pub fn output_root(&self) -> &str {
        &self.output_root
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("package", &self.package)
            .field("layout", &self.layout)
            .field("template_path", &self.template_path)
            .field("output_root", &self.output_root)
            .field("directives", &self.directives.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// A parsed template ready to render with the compiler that compiled it.
#[derive(Debug)]
pub struct CompiledTemplate<'c> {
    compiler: &'c Compiler,
    template: Template,
}

impl CompiledTemplate<'_> {
    /// Render the template. Each call starts a new render context.
    pub fn render(&self) -> Result<String> {
        self.compiler.render(&self.template)
    }

    /// The parsed template.
    pub fn template(&self) -> &Template {
        &self.template
    }
}

fn require(value: &str, option: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FacadeError::MissingRequiredOption(option));
    }
    Ok(())
}
