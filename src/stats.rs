use std::fmt;

use crate::ecs::components::Action;
use crate::ecs::store::EntityStore;

/// How many living entities are doing each action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCounts {
    pub alive: usize,
    pub total: usize,
    counts: [usize; Action::ALL.len()],
}

impl ActionCounts {
    pub fn census(store: &EntityStore) -> Self {
        let mut out = Self {
            total: store.len(),
            ..Self::default()
        };
        for id in store.ids() {
            if !store.is_alive(id) {
                continue;
            }
            out.alive += 1;
            out.counts[store.actions().current[id.index()] as usize] += 1;
        }
        out
    }

    pub fn get(&self, action: Action) -> usize {
        self.counts[action as usize]
    }
}

impl fmt::Display for ActionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alive: {}/{} |", self.alive, self.total)?;
        for action in Action::ALL {
            write!(f, " {}: {}", action.label(), self.get(action))?;
        }
        Ok(())
    }
}
