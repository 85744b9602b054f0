// command.rs - Deferred structural changes
//
// Systems iterate columns by borrowing the world, so they cannot spawn or
// despawn while running. They record commands here instead and the world
// applies them once the pass is over.

use crate::ecs::{Entity, EntityBuilder};

pub enum Command {
    Spawn(EntityBuilder),
    Despawn(Entity),
}

/// FIFO queue of structural changes.
#[derive(Default)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, builder: EntityBuilder) {
        self.commands.push(Command::Spawn(builder));
    }

    /// Queue a despawn. Queuing the same entity twice is a no-op.
    pub fn despawn(&mut self, entity: Entity) {
        if !self.is_despawn_queued(entity) {
            self.commands.push(Command::Despawn(entity));
        }
    }

    pub fn is_despawn_queued(&self, entity: Entity) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, Command::Despawn(e) if *e == entity))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.commands.drain(..)
    }
}
