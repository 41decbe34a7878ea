//! Clients for the discount endpoints of the booking backend.
//!
//! The backend is reached through the [`DiscountBackend`] trait:
//! - [`GraphQlBackend`] talks to the real GraphQL endpoint over HTTP
//! - [`InMemoryDiscountBackend`] answers from registered discounts for tests
//!
//! [`ValidationClient`] and [`ApplicationClient`] sit on top of a backend and
//! never fail: every transport, parse, or timeout problem is folded into the
//! result value they return.

pub mod application;
pub mod config;
pub mod error;
pub mod graphql;
pub mod memory;
pub mod transport;
pub mod validation;

pub use application::{ApplicationClient, ApplicationResult};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use graphql::GraphQlBackend;
pub use memory::InMemoryDiscountBackend;
pub use transport::{ApplicationResponse, DiscountBackend, ValidationResponse};
pub use validation::{ValidationClient, ValidationResult};
