//! Application layer: adapters and the editing session
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod export;
pub mod i18n;
pub mod persistence;
pub mod render;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{FileOp, IoResultExt};
pub use export::{ExportAdapter, ExportDocument, ExportRequest, TextExporter};
pub use i18n::{Language, TextKey};
pub use persistence::{JsonFileStore, LoadSource, LoadedTree, MemoryStore, PersistenceAdapter};
pub use render::{RenderAdapter, RenderOptions, RenderStyle, TermTreeRenderer};
pub use session::{AdminGate, EventOutcome, FamilySession};
