use std::sync::Arc;

use crate::adapters::{GameRecordStore, ItemSource};
use crate::config::settings::Settings;
use crate::services::coordinator::SessionCoordinator;
use crate::services::registry::SessionRegistry;
use crate::services::scheduler::TurnScheduler;
use crate::ws::hub::ConnectionHub;

/// Application state containing shared resources.
///
/// The registry is an owned, injectable instance (no global singleton), so
/// tests can build isolated coordinators side by side.
#[derive(Clone)]
pub struct AppState {
    coordinator: Arc<SessionCoordinator>,
    hub: Arc<ConnectionHub>,
}

impl AppState {
    /// Wire registry, scheduler, hub and coordinator together and start
    /// the deadline pump. Must run inside a tokio runtime.
    pub fn build(
        settings: &Settings,
        items: Arc<dyn ItemSource>,
        records: Arc<dyn GameRecordStore>,
    ) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let hub = Arc::new(ConnectionHub::new());
        let (scheduler, expiry_rx) = TurnScheduler::new();

        let coordinator = Arc::new(SessionCoordinator::new(
            registry,
            scheduler,
            hub.clone(),
            items,
            records,
            settings.turn_timeout,
            settings.finished_linger,
        ));
        SessionCoordinator::spawn_deadline_pump(coordinator.clone(), expiry_rx);

        Self { coordinator, hub }
    }

    pub fn coordinator(&self) -> &Arc<SessionCoordinator> {
        &self.coordinator
    }

    pub fn hub(&self) -> &Arc<ConnectionHub> {
        &self.hub
    }
}
