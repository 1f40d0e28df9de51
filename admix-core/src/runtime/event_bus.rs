use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use admix_model::{AdActionEvent, ShowOutcome};

use crate::Result;

/// Lightweight in-process event bus that fans out normalized ad events and
/// show outcomes to observers inside the runtime. New subscribers only
/// observe future publications; there is no replay.
#[derive(Debug)]
pub struct InProcAdEventBus {
    actions: broadcast::Sender<AdActionEvent>,
    outcomes: broadcast::Sender<ShowOutcome>,
}

impl InProcAdEventBus {
    pub fn new(capacity: usize) -> Self {
        let (actions, _) = broadcast::channel(capacity);
        let (outcomes, _) = broadcast::channel(capacity);
        Self { actions, outcomes }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdActionEvent> {
        self.actions.subscribe()
    }

    pub fn subscribe_outcomes(&self) -> broadcast::Receiver<ShowOutcome> {
        self.outcomes.subscribe()
    }

    /// Filtered, infinite view of the action stream. Lagged receivers skip
    /// missed events rather than observing history.
    pub fn action_stream(
        &self,
        predicate: impl Fn(&AdActionEvent) -> bool + Send + 'static,
    ) -> impl Stream<Item = AdActionEvent> + Send {
        BroadcastStream::new(self.subscribe()).filter_map(move |item| {
            futures::future::ready(item.ok().filter(|event| predicate(event)))
        })
    }
}

#[async_trait]
pub trait AdEventPublisher: Send + Sync {
    async fn publish(&self, event: AdActionEvent) -> Result<()>;
}

#[async_trait]
impl AdEventPublisher for InProcAdEventBus {
    async fn publish(&self, event: AdActionEvent) -> Result<()> {
        let _ = self.actions.send(event);
        Ok(())
    }
}

#[async_trait]
pub trait OutcomePublisher: Send + Sync {
    async fn publish_outcome(&self, outcome: ShowOutcome) -> Result<()>;
}

#[async_trait]
impl OutcomePublisher for InProcAdEventBus {
    async fn publish_outcome(&self, outcome: ShowOutcome) -> Result<()> {
        let _ = self.outcomes.send(outcome);
        Ok(())
    }
}

pub trait AdEventStream {
    fn subscribe_actions(&self) -> broadcast::Receiver<AdActionEvent>;
}

impl AdEventStream for InProcAdEventBus {
    fn subscribe_actions(&self) -> broadcast::Receiver<AdActionEvent> {
        self.subscribe()
    }
}

// Stream trait for outcomes so generic consumers can subscribe without
// depending on the concrete InProcAdEventBus type.
pub trait OutcomeStream {
    fn subscribe_outcomes(&self) -> broadcast::Receiver<ShowOutcome>;
}

impl OutcomeStream for InProcAdEventBus {
    fn subscribe_outcomes(&self) -> broadcast::Receiver<ShowOutcome> {
        self.subscribe_outcomes()
    }
}
