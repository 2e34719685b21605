use crate::areas::repository::Repository;
use crate::errors::WitError;
use std::path::Path;

impl Repository {
    /// Unstage a file or directory. The working tree is untouched; the next
    /// commit simply no longer includes the path.
    pub fn remove(&self, path: &str) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let path = Path::new(path);
        if !index.tracks(path) {
            return Err(WitError::PathNotFound(path.to_path_buf()).into());
        }

        index.remove(path);
        index.write_updates()?;

        Ok(())
    }
}
