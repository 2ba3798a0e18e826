//! Scene consumer contract.
//!
//! The scene layer (the thing that actually creates and moves objects)
//! is an external collaborator: it runs on exactly one execution
//! context and owns all mutation of its objects. The bridge never
//! touches it directly - the consumer drains the handoff channel on
//! its own tick and applies each batch through [`SceneConsumer`].
//!
//! [`TrackedScene`] is an in-memory reference implementation used by
//! tests and demos: a create-or-update map of entity id to position.

use std::collections::HashMap;

use crate::tracker::PositionUpdate;

/// Applies decoded position batches to a scene.
///
/// `apply_batch` is invoked once per drained batch, in arrival order,
/// on the consumer's own schedule. Implementations must create the
/// target entity if it does not exist yet and must be idempotent:
/// re-applying the same coordinates is a no-op in effect. Updates
/// within a batch are applied in sequence order, so a repeated id
/// ends at its last occurrence.
pub trait SceneConsumer {
    fn apply_batch(&mut self, batch: &[PositionUpdate]);
}

/// In-memory scene: entity id to `(x, y, z)`.
#[derive(Debug, Default)]
pub struct TrackedScene {
    entities: HashMap<String, (f64, f64, f64)>,
}

impl TrackedScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position of an entity, if it exists.
    pub fn entity(&self, id: &str) -> Option<(f64, f64, f64)> {
        self.entities.get(id).copied()
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl SceneConsumer for TrackedScene {
    fn apply_batch(&mut self, batch: &[PositionUpdate]) {
        for update in batch {
            self.entities
                .insert(update.id.clone(), (update.x, update.y, update.z));
        }
    }
}
