//! # Portico (API Gateway Control Plane)
//!
//! `portico` is the administrative side of an API gateway. It stores the
//! metadata the traffic engine consumes: which APIs exist, the resources they
//! group their routes into, and the operations (method + path) under each
//! resource.
//!
//! ## Hierarchy (Apis, Resources, Operations)
//!
//! - **Containment:** An `Api` owns its `Resource`s and a `Resource` owns its
//!   `Operation`s. Children carry explicit parent ids; the store keeps
//!   ancestor-scoped indexes so each level can be listed without nesting.
//! - **Chain checks:** Every lookup that names an `(api, resource, operation)`
//!   triple validates the whole chain. A resource id that exists under another
//!   api is reported as not found.
//! - **Cascades:** Deleting an api removes its resources and operations;
//!   deleting a resource removes its operations. Deleting an operation that is
//!   already gone succeeds.
//!
//! ## Listings
//!
//! List endpoints return the full collection unless the caller supplies `page`
//! and/or `limit`, in which case a bounded page with totals is returned.
//!
//! ## Authorization
//!
//! Every endpoint is guarded by an [`access::AccessGate`] that maps the caller's
//! bearer token to a role and checks a `read`/`create`/`update`/`delete`
//! privilege for the entity kind before the hierarchy manager is called.

pub mod access;
pub mod api;
pub mod cli;
pub mod hierarchy;
pub mod ids;
pub mod model;
pub mod pagination;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
