// A self-contained stand-in for the OCFL (Oxford Common File Layout) storage
// library the migrator consumes: per-object sessions with commit/abort
// semantics, a session factory enforcing at-most-one-writer-per-object, and
// an on-disk storage root. Its internal layout is its own concern; the only
// contract the rest of the repo relies on is the one in this crate's public
// API.
#[macro_use]
extern crate strum_macros;

mod digest;
mod error;
mod factory;
mod headers;
mod inventory;
mod session;

pub use digest::{object_root_relative_path, DigestAlgorithm};
pub use error::{OcflError, Result};
pub use factory::{FsSessionFactory, SessionFactory};
pub use headers::{ExternalHandling, InteractionModel, ResourceHeaders};
pub use inventory::{Inventory, VersionState, VersionedResource};
pub use session::ObjectSession;
