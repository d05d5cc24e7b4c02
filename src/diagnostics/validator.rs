use std::fmt;

use thiserror::Error;

use crate::ecs::components::EntityId;
use crate::ecs::store::EntityStore;

/// A single broken invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    LengthMismatch {
        column: &'static str,
        len: usize,
        expected: usize,
    },
    NonFinitePosition {
        entity: EntityId,
        axis: char,
        value: f32,
    },
    NeedOutOfRange {
        entity: EntityId,
        need: &'static str,
        value: f32,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                column,
                len,
                expected,
            } => write!(f, "{column} has {len} rows, expected {expected}"),
            Self::NonFinitePosition {
                entity,
                axis,
                value,
            } => write!(f, "entity {entity} has invalid position.{axis} = {value}"),
            Self::NeedOutOfRange {
                entity,
                need,
                value,
            } => write!(f, "entity {entity} has {need} = {value}, outside [0, 1]"),
        }
    }
}

impl Violation {
    /// Entity the violation is about, if any.
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Self::LengthMismatch { .. } => None,
            Self::NonFinitePosition { entity, .. } | Self::NeedOutOfRange { entity, .. } => {
                Some(*entity)
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("state validation failed: {}", summary(.violations))]
pub struct ValidationError {
    /// Never empty.
    pub violations: Vec<Violation>,
}

fn summary(violations: &[Violation]) -> String {
    match violations {
        [] => "no violations".to_owned(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
    }
}

/// Read-only integrity pass over the whole store. Collects every violation.
///
/// If any column is out of sync the per-entity checks are skipped, since
/// indexing would be unsound.
pub fn validate(store: &EntityStore) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    let expected = store.len();

    for (column, len) in store.column_lengths() {
        if len != expected {
            violations.push(Violation::LengthMismatch {
                column,
                len,
                expected,
            });
        }
    }

    if violations.is_empty() {
        let t = store.transforms();
        let n = store.needs();
        for id in store.ids() {
            let i = id.index();
            let p = t.position[i];
            for (axis, value) in [('x', p.x), ('y', p.y), ('z', p.z)] {
                if !value.is_finite() {
                    violations.push(Violation::NonFinitePosition {
                        entity: id,
                        axis,
                        value,
                    });
                }
            }
            let needs = [
                ("hunger", n.hunger[i]),
                ("energy", n.energy[i]),
                ("safety", n.safety[i]),
                ("curiosity", n.curiosity[i]),
            ];
            for (need, value) in needs {
                if !(0.0..=1.0).contains(&value) {
                    violations.push(Violation::NeedOutOfRange {
                        entity: id,
                        need,
                        value,
                    });
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Human-readable dump of one entity's state.
pub struct EntityReport<'a> {
    store: &'a EntityStore,
    id: EntityId,
}

impl<'a> EntityReport<'a> {
    /// `None` if `id` is out of range.
    pub fn new(store: &'a EntityStore, id: EntityId) -> Option<Self> {
        (id.index() < store.len()).then_some(Self { store, id })
    }
}

impl fmt::Display for EntityReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = self.id.index();
        let s = self.store;
        let t = s.transforms();
        let n = s.needs().levels(i);
        let h = s.health();
        writeln!(f, "=== ENTITY {} SNAPSHOT ===", self.id.0)?;
        writeln!(f, "Position: ({}, {})", t.position[i].x, t.position[i].y)?;
        writeln!(f, "Velocity: ({}, {})", t.velocity[i].x, t.velocity[i].y)?;
        writeln!(f, "Orientation: {}", t.orientation[i])?;
        writeln!(f, "Action: {}", s.actions().current[i].label())?;
        writeln!(f, "Hunger: {}", n.hunger)?;
        writeln!(f, "Energy: {}", n.energy)?;
        writeln!(f, "Safety: {}", n.safety)?;
        writeln!(f, "Visible Entities: {}", s.perception().visible_count[i])?;
        writeln!(f, "Health: {}/{}", h.current[i], h.max[i])?;
        write!(f, "Alive: {}", if h.alive[i] { "Yes" } else { "No" })
    }
}
