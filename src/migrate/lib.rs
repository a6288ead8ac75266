// F5->F6 migration engine: walks a Fedora 5.x filesystem export and commits
// each discovered resource as an OCFL object, one OCFL version per source
// memento plus a current version when the live state has moved on.
mod children;
mod config;
mod constants;
mod error;
mod migrator;
mod resource;
mod synth;
mod task;
mod upgrade;

pub use config::{Config, ConfigBuilder, INTERNAL_PREFIX};
pub use error::{Error, Result};
pub use resource::{ResourceDescriptor, ResourceKind};
pub use task::{MigrationResults, TaskManager};
pub use upgrade::UpgradeManager;

/// Runs a full F5→F6 upgrade against `config` and returns the counts of
/// resources migrated, skipped (unsupported), and failed.
pub fn upgrade(config: Config) -> Result<MigrationResults> {
    UpgradeManager::new(config).run()
}
