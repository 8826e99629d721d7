use std::collections::BTreeMap;

/// A one-way progress flag with the text shown when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub outcome: String,
    pub triggered: bool,
}

/// Binds using one item on one entity to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub item: String,
    pub entity: String,
    pub event: String,
}

/// The puzzle's rule table: every interaction plus the events they (and the
/// controller) refer to by id.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    events: BTreeMap<String, Event>,
    interactions: Vec<Interaction>,
}

impl Event {
    pub fn new(id: impl Into<String>, outcome: impl Into<String>) -> Self {
        Event {
            id: id.into(),
            outcome: outcome.into(),
            triggered: false,
        }
    }
}

impl Registry {
    pub fn new(events: impl IntoIterator<Item = Event>, interactions: Vec<Interaction>) -> Self {
        Registry {
            events: events.into_iter().map(|e| (e.id.clone(), e)).collect(),
            interactions,
        }
    }

    /// First interaction matching the exact `(item, entity)` pair.
    pub fn find(&self, item: &str, entity: &str) -> Option<&Interaction> {
        self.interactions
            .iter()
            .find(|i| i.item == item && i.entity == entity)
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.get(id)
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn is_triggered(&self, id: &str) -> bool {
        self.events.get(id).is_some_and(|e| e.triggered)
    }

    /// Flip the event to triggered and hand back its outcome text.
    /// Triggering twice is harmless: the flag never goes back to false.
    pub fn trigger(&mut self, id: &str) -> Option<String> {
        let event = self.events.get_mut(id)?;
        if !event.triggered {
            tracing::debug!(event = %id, "event triggered");
        }
        event.triggered = true;
        Some(event.outcome.clone())
    }
}
