use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use facade_compiler::{Compiler, CompilerOptions, LayoutOptions, LockNode, Manifest};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Compile an HTML template against a package manifest and its shrinkwrap lockfile.
#[derive(Debug, Parser)]
#[command(name = "facade-compiler", version, about)]
struct Cli {
    /// Package manifest providing the package name and version.
    #[arg(long, default_value = "package.json")]
    manifest: PathBuf,

    /// Shrinkwrapped dependency graph of the package.
    #[arg(long, default_value = "npm-shrinkwrap.json")]
    lockfile: PathBuf,

    /// Template to compile, relative to the working directory.
    #[arg(long)]
    template: String,

    /// Working directory. Defaults to the current directory.
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Layout configuration file. Defaults to `facade.config.json` in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root all module directories live under.
    #[arg(long)]
    mod_root: Option<String>,

    /// Suffix of the fixed-string output layout.
    #[arg(long)]
    html_root: Option<String>,

    /// Directory holding the templates.
    #[arg(long)]
    template_dir: Option<String>,

    /// Root prepended to hyperlinks.
    #[arg(long)]
    href_root: Option<String>,

    /// Asset host. Repeat to shard assets across several hosts.
    #[arg(long = "host")]
    hosts: Vec<String>,

    /// Always use the first host instead of sharding by path length.
    #[arg(long)]
    no_hash_host: bool,

    /// Extension of emitted script files.
    #[arg(long)]
    js_ext: Option<String>,

    /// Extension of emitted stylesheet files.
    #[arg(long)]
    css_ext: Option<String>,

    /// Write the rendered template here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Log resolution details to stderr.
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> LayoutOptions {
        LayoutOptions {
            mod_root: self.mod_root.clone(),
            html_root: self.html_root.clone(),
            template_dir: self.template_dir.clone(),
            href_root: self.href_root.clone(),
            hosts: (!self.hosts.is_empty()).then(|| self.hosts.clone()),
            hash_host: self.no_hash_host.then_some(false),
            js_ext: self.js_ext.clone(),
            css_ext: self.css_ext.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = match &cli.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir().context("failed to determine the working directory")?,
    };
    let cwd_text = cwd
        .to_str()
        .with_context(|| format!("working directory {} is not valid UTF-8", cwd.display()))?
        .to_string();

    let layout = load_layout(&cli, &cwd)?;
    let pkg = Manifest::from_path(&cwd.join(&cli.manifest))?;
    let shrinkwrap = LockNode::from_path(&cwd.join(&cli.lockfile))?;
    debug!(package = %pkg.name, version = %pkg.version, "loaded package");

    let source_path = cwd.join(&cli.template);
    let source = fs::read_to_string(&source_path)
        .with_context(|| format!("failed to read template {}", source_path.display()))?;

    let compiler = Compiler::new(CompilerOptions {
        pkg,
        shrinkwrap,
        cwd: cwd_text,
        path: cli.template.clone(),
        layout,
    })?;
    let html = compiler
        .compile(&source)
        .and_then(|template| template.render())
        .with_context(|| format!("failed to compile {}", cli.template))?;

    match &cli.output {
        Some(output) => {
            if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(output, html)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(template = %cli.template, output = %output.display(), "compiled template");
        }
        None => print!("{html}"),
    }
    Ok(())
}

fn load_layout(cli: &Cli, cwd: &Path) -> Result<LayoutOptions> {
    let file = match &cli.config {
        Some(path) => LayoutOptions::from_path(&cwd.join(path))?,
        None => LayoutOptions::discover(cwd)?,
    };
    Ok(file.merge(cli.overrides()))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
