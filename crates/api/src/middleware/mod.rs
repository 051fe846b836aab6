//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a Bearer token.
//! - [`rbac::RequireWorker`] -- Requires a product or warehouse worker.
//! - [`rbac::RequireWarehouseWorker`] -- Requires a warehouse worker.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
