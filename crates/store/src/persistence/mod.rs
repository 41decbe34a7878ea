//! Durable storage of the applied discount.

mod file;
mod memory;

pub use file::FilePersistence;
pub use memory::InMemoryPersistence;

use domain::Discount;

use crate::error::PersistenceError;

/// Name under which the applied discount is stored.
pub const STORAGE_KEY: &str = "applied_discount";

/// Port for loading and saving the applied discount.
///
/// Implementations must treat missing, corrupt, or unreadable data as
/// `None` from [`load`](DiscountPersistence::load) rather than failing.
///
/// Both methods are synchronous and may block on I/O. They are called with
/// the session's store lock held, so implementations should stay small and
/// fast (a single local file at most).
pub trait DiscountPersistence: Send + Sync {
    /// Reads the stored discount, if any.
    fn load(&self) -> Option<Discount>;

    /// Replaces the stored discount; `None` removes it.
    fn save(&self, discount: Option<&Discount>) -> Result<(), PersistenceError>;
}

/// Decodes a stored payload, mapping anything unreadable to `None`.
pub(crate) fn decode(raw: &str) -> Option<Discount> {
    match serde_json::from_str::<Option<Discount>>(raw) {
        Ok(discount) => discount,
        Err(err) => {
            tracing::warn!(key = STORAGE_KEY, error = %err, "discarding unreadable stored discount");
            None
        }
    }
}

pub(crate) fn encode(discount: &Discount) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(discount)?)
}
