//! Backend clients for the tally usage pipeline.
//!
//! This crate defines the collaborator traits for the two external data
//! sources (user directory, event log), a client that drains their
//! cursor-based pagination to exhaustion, and HTTP implementations of both.

pub mod client;
pub mod error;
pub mod http;
pub mod traits;

pub use client::{BackendClient, EventFetch, UserFetch};
pub use error::BackendError;
pub use http::{HttpEventStore, HttpUserDirectory};
pub use traits::{EventPage, EventStore, UserDirectory, UserPage};
