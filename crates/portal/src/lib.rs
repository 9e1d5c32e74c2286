//! Client-side controllers for the FIR portal: the wizard and record list
//! reducers from `shared_types` plus the citizen's status tracker, wired to a
//! record backend, the auth API, on-disk session storage and a geocoder.

pub mod api;
pub mod auth;
pub mod backend;
pub mod geocode;
pub mod http;
pub mod local;
pub mod management;
pub mod session_store;
pub mod submission;
pub mod tracking;

pub use backend::RecordBackend;
pub use http::HttpBackend;
pub use local::LocalBackend;
