pub mod error;
pub mod feature_flags;
pub mod models;

// FIR domain
pub mod analytics;
pub mod categorize;
pub mod common;
pub mod fir;
pub mod guard;
pub mod query;
pub mod session;
pub mod wizard;

pub use error::*;
pub use feature_flags::*;
pub use models::*;

pub use analytics::*;
pub use categorize::*;
pub use common::*;
pub use fir::*;
pub use query::*;
pub use session::*;
// guard and wizard are NOT glob re-exported: `Route`, `Field` and `Location`
// style names are too generic. Use shared_types::guard / shared_types::wizard.
