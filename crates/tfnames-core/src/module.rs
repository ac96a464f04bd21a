//! Module content provider backed by Terraform `.tf` sources.
//!
//! Each file is parsed with the Tree-sitter HCL grammar. Only the
//! `resource` blocks directly under the file's body are reported; their
//! bodies are never interpreted.

use crate::rule::ModuleContent;
use crate::types::{Pos, ResourceDeclaration, SourceRange};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use tree_sitter::{Node, Parser, Point};

/// Errors raised while retrieving declarations from a module.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A source file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The source text is malformed.
    #[error("{file}:{line}:{column}: {message}")]
    Syntax {
        /// File containing the error.
        file: PathBuf,
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
        /// What went wrong.
        message: String,
    },

    /// The HCL grammar could not be loaded into the parser.
    #[error("failed to load the HCL grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// A `resource` block does not carry exactly a type and a name label.
    #[error("{file}:{line}: resource block must have exactly 2 labels (type, name), found {found}")]
    Labels {
        /// File containing the block.
        file: PathBuf,
        /// Line of the `resource` keyword.
        line: usize,
        /// Number of labels found.
        found: usize,
    },
}

#[derive(Debug, Clone)]
struct ModuleFile {
    path: PathBuf,
    source: String,
}

/// A Terraform module: the `.tf` files of one directory.
#[derive(Debug, Clone, Default)]
pub struct HclModule {
    files: Vec<ModuleFile>,
}

impl HclModule {
    /// Reads `paths` from disk, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Io`] for the first unreadable file.
    pub fn load<I, P>(paths: I) -> Result<Self, ProviderError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let source = std::fs::read_to_string(path).map_err(|e| ProviderError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            files.push(ModuleFile {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(Self { files })
    }

    /// Builds a module from in-memory `(path, contents)` pairs.
    #[must_use]
    pub fn from_sources<I, P, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: Into<String>,
    {
        let files = sources
            .into_iter()
            .map(|(path, source)| ModuleFile {
                path: path.into(),
                source: source.into(),
            })
            .collect();
        Self { files }
    }

    /// Returns the contents of the file at `path`, if it belongs to this module.
    #[must_use]
    pub fn source(&self, path: &Path) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.source.as_str())
    }
}

impl ModuleContent for HclModule {
    fn resource_declarations(&self) -> Result<Vec<ResourceDeclaration>, ProviderError> {
        let mut declarations = Vec::new();
        for file in &self.files {
            let found = parse_resources(&file.path, &file.source)?;
            debug!("{}: {} resource block(s)", file.path.display(), found.len());
            declarations.extend(found);
        }
        Ok(declarations)
    }
}

/// Extracts the top-level resource declarations of one file, in source order.
///
/// # Errors
///
/// Returns [`ProviderError::Syntax`] at the first parse error in the file, and
/// [`ProviderError::Labels`] for a `resource` block without exactly two labels.
pub fn parse_resources(
    file: &Path,
    source: &str,
) -> Result<Vec<ResourceDeclaration>, ProviderError> {
    let language: tree_sitter::Language = tree_sitter_hcl::LANGUAGE.into();
    let mut parser = Parser::new();
    parser.set_language(&language)?;

    let src = source.as_bytes();
    let tree = parser
        .parse(src, None)
        .ok_or_else(|| ProviderError::Syntax {
            file: file.to_path_buf(),
            line: 1,
            column: 1,
            message: "parser produced no tree".to_string(),
        })?;
    let root = tree.root_node();

    if root.has_error() {
        return Err(syntax_error(file, source, first_error(root).unwrap_or(root)));
    }

    let mut declarations = Vec::new();
    let mut cursor = root.walk();
    for body in root.children(&mut cursor).filter(|n| n.kind() == "body") {
        let mut body_cursor = body.walk();
        for block in body.children(&mut body_cursor) {
            if block.kind() != "block" {
                continue;
            }
            if let Some(decl) = resource_block(file, source, &block)? {
                declarations.push(decl);
            }
        }
    }

    Ok(declarations)
}

/// Reads a top-level block; `None` unless it is a `resource` block.
fn resource_block(
    file: &Path,
    source: &str,
    block: &Node<'_>,
) -> Result<Option<ResourceDeclaration>, ProviderError> {
    let src = source.as_bytes();
    let mut keyword = None;
    let mut labels = Vec::new();

    let mut cursor = block.walk();
    for child in block.children(&mut cursor) {
        match child.kind() {
            "identifier" if keyword.is_none() => keyword = Some(child),
            "identifier" | "string_lit" => labels.push(child),
            "block_start" => break,
            _ => {}
        }
    }

    let Some(keyword) = keyword.filter(|k| text(k, src) == "resource") else {
        return Ok(None);
    };
    let [type_label, name_label] = labels.as_slice() else {
        return Err(ProviderError::Labels {
            file: file.to_path_buf(),
            line: keyword.start_position().row + 1,
            found: labels.len(),
        });
    };

    let range = SourceRange::new(
        file,
        pos(source, keyword.start_byte(), keyword.start_position()),
        pos(source, name_label.end_byte(), name_label.end_position()),
    );
    Ok(Some(ResourceDeclaration::new(
        label_text(type_label, src),
        label_text(name_label, src),
        range,
    )))
}

fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

/// Label value: quoted labels lose their quotes, identifiers are kept as is.
fn label_text(node: &Node<'_>, src: &[u8]) -> String {
    let raw = text(node, src);
    if node.kind() == "string_lit" {
        raw.strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .unwrap_or(raw)
            .to_string()
    } else {
        raw.to_string()
    }
}

/// Tree-sitter points count bytes; `Pos` columns count characters.
fn pos(source: &str, byte: usize, point: Point) -> Pos {
    let line_start = byte.saturating_sub(point.column);
    let column = source
        .get(line_start..byte)
        .map_or(point.column, |s| s.chars().count());
    Pos::new(point.row + 1, column + 1, byte)
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_error() || child.is_missing() {
            return Some(child);
        }
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

fn syntax_error(file: &Path, source: &str, node: Node<'_>) -> ProviderError {
    let at = pos(source, node.start_byte(), node.start_position());
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let found: String = text(&node, source.as_bytes())
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(24)
            .collect();
        format!("unexpected `{found}`")
    };
    ProviderError::Syntax {
        file: file.to_path_buf(),
        line: at.line,
        column: at.column,
        message,
    }
}
