//! Portfolio site: project showcase, résumé download and contact form.
//!
//! Laid out as ports and adapters: [`domain`] holds types, services and
//! port traits; [`inbound`] serves HTTP; [`outbound`] implements the ports
//! over PostgreSQL, memory and Argon2.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
