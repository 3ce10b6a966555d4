//! One mounted view: first-render seeding plus mutation intents.
//!
//! # Responsibility
//! - Bind a `StoreInitializer` and an `OptimisticDispatcher` to the
//!   lifetime of one Presentation mount.
//! - Fetch the server snapshot only until the store has been seeded.
//!
//! # Invariants
//! - A failed first fetch leaves the session uninitialized so the next
//!   render retries.
//! - Store contents are read after the initializer ran.

use crate::config::CoreConfig;
use crate::model::record::StoreRecord;
use crate::service::{RecordService, ServiceResult};
use crate::store::{
    DispatchOutcome, HasStore, InitOutcome, InitState, OptimisticDispatcher, ReconcileStrategy,
    RollbackPolicy, StoreInitializer,
};

/// Lifetime state of one mounted list view over records of type `R`.
#[derive(Debug)]
pub struct ViewSession<R> {
    initializer: StoreInitializer,
    dispatcher: OptimisticDispatcher<R>,
    last_init: Option<InitOutcome>,
}

impl<R: StoreRecord + PartialEq> ViewSession<R> {
    /// Starts a mount with explicit synchronization policies.
    pub fn mount(reconcile: ReconcileStrategy, rollback: RollbackPolicy) -> Self {
        Self {
            initializer: StoreInitializer::new(reconcile),
            dispatcher: OptimisticDispatcher::new(rollback),
            last_init: None,
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::mount(config.reconcile, config.rollback)
    }

    pub fn init_state(&self) -> InitState {
        self.initializer.state()
    }

    /// Outcome of the most recent initializer run, if any render happened.
    pub fn last_init(&self) -> Option<InitOutcome> {
        self.last_init
    }

    pub fn dispatcher(&self) -> &OptimisticDispatcher<R> {
        &self.dispatcher
    }

    /// Renders the view: seeds the store on first render, then returns the
    /// store contents.
    pub fn render<'c, C, S>(
        &mut self,
        ctx: &'c mut C,
        service: &S,
        query: &str,
        page: u32,
    ) -> ServiceResult<&'c [R]>
    where
        C: HasStore<R>,
        S: RecordService<Record = R>,
    {
        let outcome = match self.initializer.state() {
            InitState::Uninitialized => {
                let snapshot = service.fetch_all(query, page)?;
                self.initializer.on_render(ctx.store_mut(), &snapshot)
            }
            InitState::Seeded => InitOutcome::Skipped,
        };
        self.last_init = Some(outcome);
        Ok(ctx.store().all())
    }

    pub fn add<C, S>(&mut self, ctx: &mut C, service: &S, record: R) -> DispatchOutcome
    where
        C: HasStore<R>,
        S: RecordService<Record = R>,
    {
        self.dispatcher.add(ctx.store_mut(), service, record)
    }

    pub fn remove<C, S>(&mut self, ctx: &mut C, service: &S, id: &str) -> DispatchOutcome
    where
        C: HasStore<R>,
        S: RecordService<Record = R>,
    {
        self.dispatcher.remove(ctx.store_mut(), service, id)
    }

    pub fn update<C, S>(&mut self, ctx: &mut C, service: &S, record: R) -> DispatchOutcome
    where
        C: HasStore<R>,
        S: RecordService<Record = R>,
    {
        self.dispatcher.update(ctx.store_mut(), service, record)
    }
}
