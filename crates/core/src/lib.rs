//! Domain types and the pure validation core for the laundry-booking service.
//!
//! Everything in this crate is synchronous and side-effect free: validators
//! take already-fetched data (plus an existence flag or stored-order snapshot
//! supplied by the caller) and return a verdict. They never perform I/O and
//! never fail for expected bad input.

pub mod error;
pub mod order;
pub mod types;
pub mod validation;
