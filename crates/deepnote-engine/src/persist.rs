//! Graph persistence.

use std::io::Write;
use std::path::{Path, PathBuf};

use deepnote_spec::GraphDef;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Extension of persisted graph files.
pub const GRAPH_FILE_EXTENSION: &str = "deepnote.json";

/// File name a graph is persisted under: `<NAME>.deepnote.json`.
pub fn graph_file_name(name: &str) -> String {
    format!("{}.{}", name, GRAPH_FILE_EXTENSION)
}

/// Writes `graph` as pretty JSON to `<dir>/<NAME>.deepnote.json`.
///
/// The file is written to a temporary file in `dir` first and renamed into
/// place, so readers never observe a partial graph.
pub fn persist_graph(graph: &GraphDef, dir: &Path) -> EngineResult<PathBuf> {
    let json = graph.to_json_pretty()?;
    let path = dir.join(graph_file_name(&graph.name));
    write_atomic(&path, json.as_bytes())?;
    debug!(path = %path.display(), bytes = json.len(), "persisted graph");
    Ok(path)
}

/// Atomically writes `bytes` to `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> EngineResult<()> {
    let persist_err = |source: std::io::Error| EngineError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(persist_err)?;
    file.write_all(bytes).map_err(persist_err)?;
    file.flush().map_err(persist_err)?;
    file.persist(path).map_err(|e| persist_err(e.error))?;
    Ok(())
}
