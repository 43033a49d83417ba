//! Request tests
//!
//! - Identity, equality and hashing of typed and erased requests
//! - Simple display of request inputs
//! - Caching policy flags
