//! Layering lint for the Hireboard client crate.
//!
//! The client keeps its records, rules and ports under `domain`, the
//! store-agnostic seeding workflow under `seeding`, and concrete adapters
//! (Firestore, files, argon2) under `outbound`. This crate parses those
//! sources with `syn` and reports:
//!
//! - `domain` code reaching into `outbound`, `seeding`, `config` or
//!   `test_support`, or importing transport and runtime-shell crates
//! - `seeding` code reaching into `outbound` or `config`
//! - `outbound` code reaching into `seeding` or `config`
//!
//! Items gated behind `#[cfg(test)]` are skipped so unit tests may wire
//! real adapters.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

/// Crate name used in integration-test style paths such as
/// `hireboard::outbound::storage`.
const CLIENT_CRATE: &str = "hireboard";

/// A single layering violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Rule that was broken.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Directory traversal or reading failed.
    Io(io::Error),
    /// A file name or its contents could not be parsed.
    Parse {
        /// Offending file, relative to `client/src`.
        file: Utf8PathBuf,
        /// Parser message.
        message: String,
    },
    /// One or more layering violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting client layers: {err}"),
            Self::Parse { file, message } => {
                write!(f, "failed to parse {file}: {message}")
            }
            Self::Violations(violations) => {
                writeln!(f, "Layering violations:")?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// File contents.
    pub contents: String,
}

/// Lint the client crate on disk; `client_dir` is the directory holding
/// the client's `Cargo.toml`.
pub fn lint_client_sources(client_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src = Dir::open_ambient_dir(client_dir.join("src"), ambient_authority())?;
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let name = layer.dir_name();
        if !src.is_dir(name) {
            continue;
        }
        collect_sources(&src.open_dir(name)?, Utf8Path::new(name), &mut sources)?;
    }
    lint_sources(&sources)
}

/// Lint in-memory sources. Every file must sit under a layer directory.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under domain/, seeding/ or outbound/".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check_file(&source.file, layer, &parsed));
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Seeding,
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Seeding, Self::Outbound];

    const fn dir_name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Seeding => "seeding",
            Self::Outbound => "outbound",
        }
    }

    fn of(relative: &Utf8Path) -> Option<Self> {
        let first = relative.components().next()?.as_str();
        Self::ALL.into_iter().find(|layer| layer.dir_name() == first)
    }

    const fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["config", "outbound", "seeding", "test_support"],
            Self::Seeding => &["config", "outbound"],
            Self::Outbound => &["config", "seeding"],
        }
    }

    const fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "argon2",
                "camino",
                "cap_std",
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tempfile",
                "tracing_subscriber",
            ],
            Self::Seeding => &["argon2", "cap_std", "clap", "color_eyre", "reqwest"],
            Self::Outbound => &["clap", "color_eyre", "ortho_config"],
        }
    }
}

fn check_file(file: &Utf8Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let name = layer.dir_name();
    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(root) = module_root(segments)
            && layer.forbidden_modules().contains(&root)
        {
            messages.insert(format!("{name} module must not depend on crate::{root}"));
        }
        if let Some(root) = external_crate(segments)
            && layer.forbidden_crates().contains(&root)
        {
            messages.insert(format!("{name} module must not depend on external crate `{root}`"));
        }
    }
    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// First in-crate module a path names, if it names one.
fn module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    let index = if is_relative(first) {
        segments.iter().position(|segment| !is_relative(segment))?
    } else if first == CLIENT_CRATE {
        1
    } else {
        return None;
    };
    segments.get(index).map(String::as_str)
}

fn external_crate(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    (!is_relative(root) && root != CLIENT_CRATE).then_some(root)
}

fn is_test_only(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| match &attr.meta {
        syn::Meta::List(list) => list.path.is_ident("cfg") && list.tokens.to_string() == "test",
        _ => false,
    })
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        if !is_test_only(&node.attrs) {
            self.record_use_tree(&node.tree, Vec::new());
        }
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if !is_test_only(&node.attrs) {
            syn::visit::visit_item_mod(self, node);
        }
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        if !is_test_only(&node.attrs) {
            syn::visit::visit_item_fn(self, node);
        }
    }
}

fn collect_sources(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|raw| ArchitectureLintError::Parse {
                file: relative.to_path_buf(),
                message: format!("non UTF-8 file name {raw:?}"),
            })?;
        let path = relative.join(&name);
        if entry.file_type()?.is_dir() {
            collect_sources(&dir.open_dir(&name)?, &path, sources)?;
            continue;
        }
        if path.extension() != Some("rs") {
            continue;
        }
        let contents = dir.read_to_string(&name)?;
        sources.push(LintSource {
            file: path,
            contents,
        });
    }
    Ok(())
}
