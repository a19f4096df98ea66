//! Object-storage publishing for medsynth datasets.
//!
//! A [`Publisher`] owns an explicitly constructed [`ObjectStore`] client and
//! exposes the three environment operations: make sure the bucket exists,
//! clear an environment prefix, and upload one encoded collection.
//! [`pipeline`] strings them together per environment.

pub mod errors;
pub mod pipeline;
pub mod publisher;
pub mod report;
pub mod store;

pub use errors::PublishError;
pub use pipeline::{ARTIFACTS, ArtifactSpec, DatasetPart, publish_environment, run};
pub use publisher::{Publisher, TargetState};
pub use report::{ArtifactReport, EnvironmentReport, RunReport};
pub use store::{LocalStore, MemoryStore, ObjectInfo, ObjectStore, S3Settings, S3Store};
