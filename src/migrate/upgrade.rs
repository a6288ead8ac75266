use crate::config::{Config, INTERNAL_PREFIX};
use crate::error::Result;
use crate::migrator::ResourceMigrator;
use crate::resource::ResourceDescriptor;
use crate::task::{MigrationResults, TaskManager};
use ocfl::FsSessionFactory;
use std::sync::Arc;

/// The F5→F6 pipeline's entry point: bootstraps the OCFL session factory from
/// configuration, constructs the root resource descriptor, submits it to a
/// fresh task manager, waits for the whole tree to drain, and shuts down
/// (§2.6, §4.7).
pub struct UpgradeManager {
    config: Arc<Config>,
}

impl UpgradeManager {
    pub fn new(config: Config) -> Self {
        UpgradeManager {
            config: Arc::new(config),
        }
    }

    pub fn run(&self) -> Result<MigrationResults> {
        let factory = Arc::new(FsSessionFactory::new(
            self.config.ocfl_storage_root(),
            self.config.digest_algorithm,
        )?);
        let migrator = Arc::new(ResourceMigrator::new(Arc::clone(&self.config), factory));
        let manager = TaskManager::new(self.config.threads, migrator)?;

        let root = ResourceDescriptor::root(&self.config.input_dir, INTERNAL_PREFIX);
        manager.submit(root)?;
        manager.await_completion();
        manager.shutdown();

        Ok(manager.results())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use std::fs;
    use std::io::Write;

    #[test]
    fn run_migrates_a_root_with_no_children() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(input.path().join(".ttl")).unwrap();
        file.write_all(
            br#"
            @prefix fedora: <http://fedora.info/definitions/v4/repository#> .
            <http://example.org/rest> fedora:lastModified "2020-10-15T05:39:47Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> .
            "#,
        )
        .unwrap();

        let config = ConfigBuilder {
            source_version: Some("5.1".into()),
            target_version: Some("6.0".into()),
            input_dir: Some(input.path().to_path_buf()),
            output_dir: Some(output.path().to_path_buf()),
            base_uri: Some("http://example.org/rest".into()),
            threads: Some(1),
            ..Default::default()
        }
        .build()
        .unwrap();

        let manager = UpgradeManager::new(config);
        let results = manager.run().unwrap();
        assert_eq!(results.migrated, 1);
        assert_eq!(results.failed, 0);
    }
}
