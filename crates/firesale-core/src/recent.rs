use std::path::{Path, PathBuf};

const MAX_RECENT: usize = 10;

/// Most-recently-opened documents, newest first.
#[derive(Clone, Debug, Default)]
pub struct RecentDocuments {
    paths: Vec<PathBuf>,
}

impl RecentDocuments {
    pub fn add(&mut self, path: &Path) {
        self.paths.retain(|existing| existing != path);
        self.paths.insert(0, path.to_path_buf());
        self.paths.truncate(MAX_RECENT);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}
