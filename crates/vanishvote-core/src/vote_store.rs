use crate::error::StoreError;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;

/// Local record of which polls this client has voted on.
///
/// This is a convenience flag, not an enforcement mechanism: clearing the
/// store or switching machines lets the same person vote again.
#[allow(async_fn_in_trait)]
pub trait VoteStore: Send + Sync {
    async fn has_voted(&self, poll_id: &str) -> Result<bool, StoreError>;

    async fn mark_voted(&self, poll_id: &str) -> Result<(), StoreError>;
}

fn flag_key(poll_id: &str) -> String {
    format!("voted-{poll_id}")
}

/// Vote flags persisted as a JSON object (`{"voted-<id>": true}`) on disk.
#[derive(Debug, Clone)]
pub struct FileVoteStore {
    path: PathBuf,
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl FileVoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_flags(&self) -> Result<BTreeMap<String, bool>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl VoteStore for FileVoteStore {
    async fn has_voted(&self, poll_id: &str) -> Result<bool, StoreError> {
        let flags = self.read_flags().await?;
        Ok(flags.get(&flag_key(poll_id)).copied().unwrap_or(false))
    }

    async fn mark_voted(&self, poll_id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut flags = self.read_flags().await?;
        flags.insert(flag_key(poll_id), true);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&flags)?).await?;
        fs::rename(&tmp, &self.path).await?;
        tracing::debug!(poll_id, path = %self.path.display(), "vote flag stored");
        Ok(())
    }
}

/// Process-local vote flags, lost on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryVoteStore {
    voted: Arc<Mutex<HashSet<String>>>,
}

impl MemoryVoteStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        match self.voted.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl VoteStore for MemoryVoteStore {
    async fn has_voted(&self, poll_id: &str) -> Result<bool, StoreError> {
        Ok(self.lock().contains(poll_id))
    }

    async fn mark_voted(&self, poll_id: &str) -> Result<(), StoreError> {
        self.lock().insert(poll_id.to_string());
        Ok(())
    }
}

/// Enum-dispatch wrapper so callers can pick a store at runtime.
#[derive(Debug, Clone)]
pub enum VoteFlags {
    File(FileVoteStore),
    Memory(MemoryVoteStore),
}

impl VoteStore for VoteFlags {
    async fn has_voted(&self, poll_id: &str) -> Result<bool, StoreError> {
        match self {
            VoteFlags::File(s) => s.has_voted(poll_id).await,
            VoteFlags::Memory(s) => s.has_voted(poll_id).await,
        }
    }

    async fn mark_voted(&self, poll_id: &str) -> Result<(), StoreError> {
        match self {
            VoteFlags::File(s) => s.mark_voted(poll_id).await,
            VoteFlags::Memory(s) => s.mark_voted(poll_id).await,
        }
    }
}
