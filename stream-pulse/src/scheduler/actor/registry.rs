//! Registry of running channel actors.

use std::collections::HashMap;

use tokio::task::JoinHandle;

use crate::monitor::StopReason;

use super::handle::ActorHandle;
use super::messages::ChannelMessage;

struct ActorEntry {
    handle: ActorHandle<ChannelMessage>,
    task: JoinHandle<StopReason>,
}

/// Running channel actors by channel id.
///
/// Actors that exited on their own stay registered until the next lookup
/// notices their task has finished.
#[derive(Default)]
pub struct ActorRegistry {
    actors: HashMap<String, ActorEntry>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        handle: ActorHandle<ChannelMessage>,
        task: JoinHandle<StopReason>,
    ) -> Option<ActorHandle<ChannelMessage>> {
        let id = handle.id().to_string();
        self.actors
            .insert(id, ActorEntry { handle, task })
            .map(|previous| previous.handle)
    }

    /// Handle of a running actor.
    pub fn get(&self, id: &str) -> Option<&ActorHandle<ChannelMessage>> {
        self.actors
            .get(id)
            .filter(|entry| !entry.task.is_finished())
            .map(|entry| &entry.handle)
    }

    pub fn is_running(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Remove an actor, returning its handle and task.
    pub fn remove(
        &mut self,
        id: &str,
    ) -> Option<(ActorHandle<ChannelMessage>, JoinHandle<StopReason>)> {
        self.actors
            .remove(id)
            .map(|entry| (entry.handle, entry.task))
    }

    /// Drop entries whose task has finished, returning their ids.
    pub fn prune_finished(&mut self) -> Vec<String> {
        let finished: Vec<String> = self
            .actors
            .iter()
            .filter(|(_, entry)| entry.task.is_finished())
            .map(|(id, _)| id.clone())
            .collect();
        for id in &finished {
            self.actors.remove(id);
        }
        finished
    }

    /// Ids of running actors, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .actors
            .iter()
            .filter(|(_, entry)| !entry.task.is_finished())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Remove every actor.
    pub fn drain(&mut self) -> Vec<(ActorHandle<ChannelMessage>, JoinHandle<StopReason>)> {
        self.actors
            .drain()
            .map(|(_, entry)| (entry.handle, entry.task))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::scheduler::actor::ActorMetadata;

    fn entry(id: &str) -> (ActorHandle<ChannelMessage>, mpsc::Receiver<ChannelMessage>) {
        let (tx, rx) = mpsc::channel(4);
        (
            ActorHandle::new(tx, CancellationToken::new(), ActorMetadata::channel(id)),
            rx,
        )
    }

    #[tokio::test]
    async fn test_finished_tasks_are_not_running() {
        let mut registry = ActorRegistry::new();

        let (handle, _rx_a) = entry("a");
        let done = tokio::spawn(async { StopReason::CredentialRemoved });
        registry.insert(handle, done);

        let (handle, _rx_b) = entry("b");
        let pending = tokio::spawn(std::future::pending::<StopReason>());
        registry.insert(handle, pending);

        // Let the finished task complete.
        while !registry.actors["a"].task.is_finished() {
            tokio::task::yield_now().await;
        }

        assert!(!registry.is_running("a"));
        assert!(registry.is_running("b"));
        assert_eq!(registry.ids(), ["b"]);

        assert_eq!(registry.prune_finished(), ["a"]);
        assert_eq!(registry.len(), 1);

        let (_, task) = registry.remove("b").unwrap();
        task.abort();
        assert!(registry.is_empty());
    }
}
