use crate::error::{Error, Result};
use crate::migrator::ResourceMigrator;
use crate::resource::ResourceDescriptor;
use log::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Bounded grace period `shutdown()` waits for in-flight tasks to drain
/// before forcing termination (§4.7).
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(60);

/// Counts of how a run's resources were disposed of, reported by the upgrade
/// manager once the task manager drains.
#[derive(Debug, Default, Clone, Copy)]
pub struct MigrationResults {
    pub migrated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Owns a worker pool and the outstanding-task latch that `awaitCompletion`
/// blocks on. Each task runs the migrator on one descriptor and resubmits
/// every child descriptor it produces -- the pool is self-feeding, with no
/// central coordinator beyond this struct (§4.7, §9 "Task self-submission").
pub struct TaskManager {
    pool: rayon::ThreadPool,
    migrator: Arc<ResourceMigrator>,
    outstanding: AtomicUsize,
    accepting: AtomicBool,
    lock: Mutex<()>,
    condvar: Condvar,
    migrated: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl TaskManager {
    pub fn new(threads: usize, migrator: Arc<ResourceMigrator>) -> Result<Arc<Self>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|error| Error::StorageFailed(error.to_string()))?;
        Ok(Arc::new(TaskManager {
            pool,
            migrator,
            outstanding: AtomicUsize::new(0),
            accepting: AtomicBool::new(true),
            lock: Mutex::new(()),
            condvar: Condvar::new(),
            migrated: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }))
    }

    /// Enqueues `descriptor` onto the worker pool. Atomically bumps the
    /// outstanding-task count first, so a racing `awaitCompletion` can never
    /// observe a false zero between submission and the task actually starting.
    pub fn submit(self: &Arc<Self>, descriptor: ResourceDescriptor) -> Result<()> {
        if !self.accepting.load(Ordering::SeqCst) {
            return Err(Error::Cancelled);
        }
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        let manager = Arc::clone(self);
        self.pool.spawn(move || manager.run(descriptor));
        Ok(())
    }

    fn run(self: Arc<Self>, descriptor: ResourceDescriptor) {
        info!("Migrating {}", descriptor.full_id);
        match self.migrator.migrate(&descriptor) {
            Ok(children) => {
                info!("Resource upgraded: {}", descriptor.full_id);
                self.migrated.fetch_add(1, Ordering::SeqCst);
                for child in children {
                    let child_id = child.full_id.clone();
                    if let Err(error) = self.submit(child) {
                        error!("Failed to submit child '{}': {}", child_id, error);
                    }
                }
            }
            Err(Error::UnsupportedResource(path)) => {
                warn!("Skipping unsupported resource at {}", path.display());
                self.skipped.fetch_add(1, Ordering::SeqCst);
            }
            Err(error) => {
                error!("Failed to process {}: {}", descriptor.full_id, error);
                self.failed.fetch_add(1, Ordering::SeqCst);
            }
        }
        self.finish_one();
    }

    fn finish_one(&self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
        let guard = self.lock.lock().expect("task manager lock poisoned");
        self.condvar.notify_all();
        drop(guard);
    }

    /// Blocks until the outstanding-task count reaches zero. Re-entrant: a
    /// caller may submit more work and await again.
    pub fn await_completion(&self) {
        let guard = self.lock.lock().expect("task manager lock poisoned");
        let _guard = self
            .condvar
            .wait_while(guard, |_| self.outstanding.load(Ordering::SeqCst) != 0)
            .expect("task manager lock poisoned");
    }

    /// Stops accepting submissions, waits up to the grace period for in-flight
    /// tasks to drain, then closes the migrator's session factory regardless.
    pub fn shutdown(&self) {
        self.accepting.store(false, Ordering::SeqCst);
        let start = Instant::now();
        let guard = self.lock.lock().expect("task manager lock poisoned");
        let _ = self.condvar.wait_timeout_while(guard, SHUTDOWN_GRACE_PERIOD, |_| {
            self.outstanding.load(Ordering::SeqCst) != 0 && start.elapsed() < SHUTDOWN_GRACE_PERIOD
        });
        self.migrator.close();
    }

    pub fn results(&self) -> MigrationResults {
        MigrationResults {
            migrated: self.migrated.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use ocfl::FsSessionFactory;
    use std::fs;
    use std::io::Write;

    fn write_file(path: &std::path::Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = fs::File::create(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn submit_and_await_completion_drains_a_tree() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let root_rdf = r#"
            @prefix fedora: <http://fedora.info/definitions/v4/repository#> .
            <http://example.org/rest> fedora:lastModified "2020-10-15T05:39:47Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> .
            "#;
        write_file(&input.path().join(".ttl"), root_rdf);
        write_file(
            &input.path().join("child.ttl"),
            r#"
            @prefix fedora: <http://fedora.info/definitions/v4/repository#> .
            <http://example.org/rest/child> fedora:lastModified "2020-10-15T05:39:47Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> .
            "#,
        );

        let config = Arc::new(
            ConfigBuilder {
                source_version: Some("5.1".into()),
                target_version: Some("6.0".into()),
                input_dir: Some(input.path().to_path_buf()),
                output_dir: Some(output.path().to_path_buf()),
                base_uri: Some("http://example.org/rest".into()),
                ..Default::default()
            }
            .build()
            .unwrap(),
        );
        let factory = Arc::new(
            FsSessionFactory::new(config.ocfl_storage_root(), config.digest_algorithm).unwrap(),
        );
        let migrator = Arc::new(ResourceMigrator::new(Arc::clone(&config), factory.clone()));
        let manager = TaskManager::new(2, migrator).unwrap();

        let root = ResourceDescriptor::root(&config.input_dir, crate::config::INTERNAL_PREFIX);
        manager.submit(root).unwrap();
        manager.await_completion();

        let results = manager.results();
        assert_eq!(results.migrated, 2);
        assert_eq!(results.failed, 0);

        manager.shutdown();
        assert!(manager.submit(ResourceDescriptor::root(
            &config.input_dir,
            crate::config::INTERNAL_PREFIX
        ))
        .is_err());
    }
}
