// ABOUTME: Local directory history backend.
// ABOUTME: Stores one JSON file per parameter name, replaced atomically via rename.

use super::backend::ParameterStore;
use crate::orchestrator::RemoteError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Parameter store backed by files in a directory.
#[derive(Debug, Clone)]
pub struct FileParameterStore {
    dir: PathBuf,
}

impl FileParameterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_name(name)))
    }
}

/// Parameter names may carry ARN characters that are not valid in file names.
fn encode_name(name: &str) -> String {
    name.replace('%', "%25")
        .replace('/', "%2F")
        .replace(':', "%3A")
}

fn decode_name(encoded: &str) -> String {
    encoded
        .replace("%3A", ":")
        .replace("%2F", "/")
        .replace("%25", "%")
}

#[async_trait]
impl ParameterStore for FileParameterStore {
    async fn get(&self, name: &str) -> Result<Option<String>, RemoteError> {
        match tokio::fs::read_to_string(self.path_for(name)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RemoteError::api("ReadHistoryFile", e)),
        }
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), RemoteError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| RemoteError::api("CreateHistoryDir", e))?;

        let path = self.path_for(name);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| RemoteError::api("WriteHistoryFile", e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| RemoteError::api("WriteHistoryFile", e))?;

        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, RemoteError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RemoteError::api("ListHistoryDir", e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RemoteError::api("ListHistoryDir", e))?
        {
            let file_name = entry.file_name();
            let Some(stem) = file_name.to_str().and_then(|f| f.strip_suffix(".json")) else {
                continue;
            };
            let name = decode_name(stem);
            if name.starts_with(prefix) {
                names.push(name);
            }
        }
        names.sort();

        Ok(names)
    }
}
