//! Request-scoped security context.
//!
//! Authentication happens upstream; by the time a request reaches a service
//! the gateway has resolved who is acting and in which business. The context
//! is passed explicitly into every service call and is the only source of the
//! actor id written to audit columns.

mod context;

pub use context::{SecurityContext, SecurityContextBuilder};
