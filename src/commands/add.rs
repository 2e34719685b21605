use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use std::path::PathBuf;

impl Repository {
    /// Stage the given files (directories are expanded recursively). Each
    /// staged file is stored as a blob immediately, so later commits and
    /// checkouts operate purely on object ids.
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.index();
        index.rehydrate()?;

        let paths = paths
            .iter()
            .map(|path| self.workspace().list_files(Some(PathBuf::from(path))))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten();

        for path in paths {
            let content = self.workspace().read_file(&path)?;
            let blob = Blob::new(content);
            let blob_id = blob.object_id()?;

            self.database().store(&blob)?;
            index.add(path, blob_id);
        }

        index.write_updates()?;

        Ok(())
    }
}
