//! Services module
//!
//! External-dependency adapters and the classify orchestration:
//!
//! - [`object_store`] - CDN image upload client
//! - [`classifier`] - hosted severity-model client
//! - [`image`] - decode/downscale/JPEG normalization
//! - [`intake`] - upload → pending ticket → classification workflow
//! - [`webhook`] - fire-and-forget ticket-created notifications

pub mod classifier;
pub mod image;
pub mod intake;
pub mod object_store;
pub mod webhook;

pub use classifier::{Classifier, ClassifierError, HttpClassifier};
pub use intake::TicketIntake;
pub use object_store::{HttpObjectStore, ObjectStore, ObjectStoreError, StoredImage};
pub use webhook::WebhookNotifier;
