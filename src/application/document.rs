//! Layer tree documents on disk (JSON or TOML, chosen by file extension).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{
    ApplicationError, ApplicationResult, InputKind, IoResultExt, ParseResultExt,
};
use crate::domain::{LayerForest, LayerMeta, NodeRef};

/// Serialization format of a tree document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(DocumentFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(DocumentFormat::Toml),
            _ => Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// On-disk shape: a top-level `layers` list of nested nodes.
///
/// ```toml
/// [[layers]]
/// id = "roads"
/// name = "Roads"
/// type = "group"
///
/// [[layers.children]]
/// id = "highways"
/// name = "Highways"
/// type = "vector"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeDocument {
    #[serde(default)]
    pub layers: Vec<NodeRef<LayerMeta>>,
}

/// Expand `~`, `$VAR` and `${VAR}` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

#[instrument(level = "debug")]
pub fn load_forest(path: &Path) -> ApplicationResult<LayerForest> {
    let path = expand_path(path);
    let format = DocumentFormat::from_path(&path)?;
    let content = fs::read_to_string(&path).with_path_context("read tree", &path)?;
    let forest = parse_document(&content, format, &path)?;
    debug!("loaded {} nodes from {}", forest.len(), path.display());
    Ok(forest)
}

/// Parse a document; duplicate ids are rejected.
pub fn parse_forest(content: &str, format: DocumentFormat) -> ApplicationResult<LayerForest> {
    parse_document(content, format, Path::new(INLINE_SOURCE))
}

pub fn render_forest(forest: &LayerForest, format: DocumentFormat) -> ApplicationResult<String> {
    let document = TreeDocument {
        layers: forest.roots().to_vec(),
    };
    let source = Path::new(INLINE_SOURCE);
    match format {
        DocumentFormat::Json => {
            serde_json::to_string_pretty(&document).with_input_context(InputKind::Tree, source)
        }
        DocumentFormat::Toml => {
            toml::to_string_pretty(&document).with_input_context(InputKind::Tree, source)
        }
    }
}

// Placeholder path for documents that do not come from a file.
const INLINE_SOURCE: &str = "<input>";

fn parse_document(
    content: &str,
    format: DocumentFormat,
    path: &Path,
) -> ApplicationResult<LayerForest> {
    let document: TreeDocument = match format {
        DocumentFormat::Json => {
            serde_json::from_str(content).with_input_context(InputKind::Tree, path)?
        }
        DocumentFormat::Toml => toml::from_str(content).with_input_context(InputKind::Tree, path)?,
    };
    Ok(LayerForest::from_refs(document.layers)?)
}
