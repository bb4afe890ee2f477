//! Ownership of many NPCs keyed by ID.

use ahash::AHashMap;
use thiserror::Error;
use tracing::info;
use townsfolk_common::{ConfigError, NpcId};

use crate::collaborators::Collaborators;
use crate::dialogue::DialogueScript;
use crate::npc::{Npc, NpcRuntime};
use crate::profile::NpcProfile;
use crate::route::WaypointRoute;
use crate::state::NpcState;

/// Error types for roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// NPC not found
    #[error("NPC not found: {0}")]
    NotFound(NpcId),
    /// NPC already registered
    #[error("NPC already registered: {0}")]
    AlreadyRegistered(NpcId),
}

/// Result type for roster operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// All NPCs of one simulation. NPCs share no state; each is ticked in turn.
#[derive(Debug, Default)]
pub struct NpcRoster {
    npcs: AHashMap<NpcId, Npc>,
}

impl NpcRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of NPCs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    /// Returns whether there are no NPCs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    /// Creates an NPC from its parts and adds it.
    pub fn spawn(
        &mut self,
        profile: NpcProfile,
        route: WaypointRoute,
        script: Option<DialogueScript>,
        collaborators: Collaborators,
    ) -> Result<NpcId, ConfigError> {
        let npc = Npc::init(profile, route, script, collaborators)?;
        let id = npc.id();
        self.npcs.insert(id, npc);
        Ok(id)
    }

    /// Adds an already constructed NPC.
    pub fn register(&mut self, npc: Npc) -> RosterResult<NpcId> {
        let id = npc.id();
        if self.npcs.contains_key(&id) {
            return Err(RosterError::AlreadyRegistered(id));
        }
        self.npcs.insert(id, npc);
        Ok(id)
    }

    /// Removes and disposes an NPC, returning its final runtime state.
    pub fn despawn(&mut self, id: NpcId) -> RosterResult<NpcRuntime> {
        let npc = self.npcs.remove(&id).ok_or(RosterError::NotFound(id))?;
        info!("Despawning {id}");
        Ok(npc.dispose())
    }

    /// Gets an NPC.
    #[must_use]
    pub fn get(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(&id)
    }

    /// Gets an NPC mutably, e.g. to forward input events.
    pub fn get_mut(&mut self, id: NpcId) -> Option<&mut Npc> {
        self.npcs.get_mut(&id)
    }

    /// Ticks every NPC by `dt`.
    pub fn tick_all(&mut self, dt: f32) {
        for npc in self.npcs.values_mut() {
            npc.tick(dt);
        }
    }

    /// Iterates over all NPCs.
    pub fn iter(&self) -> impl Iterator<Item = (NpcId, &Npc)> {
        self.npcs.iter().map(|(id, npc)| (*id, npc))
    }

    /// IDs of NPCs currently in `state`, in ascending order.
    #[must_use]
    pub fn in_state(&self, state: NpcState) -> Vec<NpcId> {
        let mut ids: Vec<NpcId> = self
            .npcs
            .iter()
            .filter(|(_, npc)| npc.state() == state)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
