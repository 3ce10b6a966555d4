//! Explicit owner of the client stores shared by views.
//!
//! # Invariants
//! - Stores are created with the configured `UpdateMode` and live as long
//!   as the context; views borrow them per call.

use crate::config::CoreConfig;
use crate::model::customer::CustomerRecord;
use crate::model::record::StoreRecord;
use crate::store::record_store::{RecordStore, UpdateMode};

/// Access to the store holding records of type `R`.
pub trait HasStore<R: StoreRecord> {
    fn store(&self) -> &RecordStore<R>;
    fn store_mut(&mut self) -> &mut RecordStore<R>;
}

/// Client stores for the dashboard views, passed to each view explicitly.
#[derive(Default)]
pub struct StoreContext {
    customers: RecordStore<CustomerRecord>,
}

impl StoreContext {
    pub fn new(update_mode: UpdateMode) -> Self {
        Self {
            customers: RecordStore::with_mode(update_mode),
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.update_mode)
    }

    pub fn customers(&self) -> &RecordStore<CustomerRecord> {
        &self.customers
    }

    pub fn customers_mut(&mut self) -> &mut RecordStore<CustomerRecord> {
        &mut self.customers
    }
}

impl HasStore<CustomerRecord> for StoreContext {
    fn store(&self) -> &RecordStore<CustomerRecord> {
        &self.customers
    }

    fn store_mut(&mut self) -> &mut RecordStore<CustomerRecord> {
        &mut self.customers
    }
}

impl<R: StoreRecord> HasStore<R> for RecordStore<R> {
    fn store(&self) -> &RecordStore<R> {
        self
    }

    fn store_mut(&mut self) -> &mut RecordStore<R> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{HasStore, StoreContext};
    use crate::config::CoreConfig;
    use crate::model::customer::CustomerRecord;
    use crate::store::record_store::UpdateMode;

    #[test]
    fn context_applies_configured_update_mode() {
        let config = CoreConfig {
            update_mode: UpdateMode::AppendCompat,
            ..CoreConfig::default()
        };
        let mut ctx = StoreContext::from_config(&config);
        assert_eq!(ctx.customers().update_mode(), UpdateMode::AppendCompat);

        HasStore::<CustomerRecord>::store_mut(&mut ctx).add(CustomerRecord::with_id(
            "c1",
            "Ada Lovelace",
            "ada@example.com",
            "https://example.com/ada.png",
        ));
        assert_eq!(ctx.customers().len(), 1);
    }
}
