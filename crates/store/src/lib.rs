//! Discount state store.
//!
//! Holds the code being entered, the validation status, the applied discount,
//! and the last error for one checkout session. Only the applied discount is
//! persisted; it is reloaded and re-checked for expiry on startup.
//!
//! The status field follows this machine:
//! ```text
//! Idle ──► Validating ──┬──► Valid
//!  ▲                    └──► Error
//!  └──── set_code / clear ◄──┘
//! ```

pub mod error;
pub mod persistence;
pub mod session;
pub mod state;
pub mod store;

pub use error::{PersistenceError, SessionError};
pub use persistence::{DiscountPersistence, FilePersistence, InMemoryPersistence, STORAGE_KEY};
pub use session::CheckoutSession;
pub use state::{DiscountState, ValidationStatus};
pub use store::DiscountStore;
