//! Observer registration for countdown state changes

use std::fmt;

use super::Snapshot;

/// Notification delivered to registered observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownEvent {
    /// State, remaining seconds or selected preset changed
    Changed(Snapshot),
    /// The countdown reached zero; fired once per run
    Finished(Snapshot),
}

impl CountdownEvent {
    pub fn snapshot(&self) -> &Snapshot {
        match self {
            CountdownEvent::Changed(snapshot) | CountdownEvent::Finished(snapshot) => snapshot,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, CountdownEvent::Finished(_))
    }
}

/// Handle returned by [`Observers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn Fn(&CountdownEvent) + Send + Sync>;

/// Subscriber list, notified synchronously in subscription order
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    callbacks: Vec<(ObserverId, Callback)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&CountdownEvent) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove an observer; returns false if the id was unknown
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn notify(&self, event: &CountdownEvent) {
        for (_, callback) in &self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
