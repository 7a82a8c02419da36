/* src/server/core/rust/src/headers.rs */

// Protocol header names. `http::HeaderName` lookups are case-insensitive,
// these are the lowercase canonical forms.

/// Marks a request from the client-side router, and the JSON page response.
pub const INERTIA: &str = "x-inertia";
/// Asset version held by the client.
pub const VERSION: &str = "x-inertia-version";
/// Component the client currently has mounted during a partial reload.
pub const PARTIAL_COMPONENT: &str = "x-inertia-partial-component";
/// Comma-separated allow list of props for a partial reload.
pub const PARTIAL_ONLY: &str = "x-inertia-partial-data";
/// Comma-separated deny list of props for a partial reload.
pub const PARTIAL_EXCEPT: &str = "x-inertia-partial-except";
/// Comma-separated deferred groups to resolve during a partial reload.
pub const PARTIAL_DEFERRED: &str = "x-inertia-partial-deferred";
/// Comma-separated merge props the client will replace instead of merging.
pub const RESET: &str = "x-inertia-reset";
/// Target of a client-side full reload (sent with 409).
pub const LOCATION: &str = "x-inertia-location";
