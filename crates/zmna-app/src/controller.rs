use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use zmna_core::store::DraftStore;
use zmna_types::AppEvent;

use crate::events::event_loop;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_front: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub front_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_front: kanal::bounded_async(256), // visibility bursts on record switches
            front_to_app: kanal::bounded_async(64),  // edits
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self, store: Arc<dyn DraftStore>) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        tasks.spawn(event_loop(
            self.state.clone(),
            store,
            self.channels.front_to_app.1.clone(),
            self.channels.app_to_front.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    /// Sender the front end pushes events into
    pub fn sender(&self) -> AsyncSender<AppEvent> {
        self.channels.front_to_app.0.clone()
    }

    /// Receiver for what the event loop reports back
    pub fn receiver(&self) -> AsyncReceiver<AppEvent> {
        self.channels.app_to_front.1.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
