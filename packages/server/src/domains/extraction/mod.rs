//! Field extraction machinery: the strategy cascade, address and
//! registration extractors, and address validation.

pub mod address;
pub mod cascade;
pub mod registration;
pub mod validator;

pub use cascade::{Cascade, Resolved, ResolverStrategy};
