// fqroute-core: Reconciliation engine between declared domain groups
// and the router state exposed by fqroute-api.

pub mod assemble;
pub mod cache;
pub mod engine;
pub mod error;
pub mod model;
pub mod plan;
pub mod source;
pub mod validate;
pub mod version;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{UrlCache, ValidationCache};
pub use engine::{ApplyReport, Engine, Resolution};
pub use error::{CoreError, Finding, FindingKind, LoadReport};
pub use model::{GroupSpec, ResolvedGroup, RouterState};
pub use plan::{DeviceCommand, render_batch};
pub use version::MIN_FIRMWARE;
