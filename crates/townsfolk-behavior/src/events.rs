//! Event bus for observing NPC behavior.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use townsfolk_common::{NpcId, ScriptId};

use crate::state::NpcState;

/// Notable things an NPC did during a tick or in response to input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NpcEvent {
    /// The behavior state changed
    StateChanged {
        /// NPC ID
        npc: NpcId,
        /// Previous state
        from: NpcState,
        /// New state
        to: NpcState,
    },
    /// A waypoint was reached
    WaypointReached {
        /// NPC ID
        npc: NpcId,
        /// Index of the waypoint
        index: usize,
    },
    /// An interaction started
    InteractionStarted {
        /// NPC ID
        npc: NpcId,
        /// Script being read
        script: ScriptId,
    },
    /// A dialogue line was presented
    DialogueLineShown {
        /// NPC ID
        npc: NpcId,
        /// Line index
        index: usize,
    },
    /// An interaction ended
    InteractionFinished {
        /// NPC ID
        npc: NpcId,
        /// State resumed afterwards
        resumed: NpcState,
    },
    /// The talk affordance was shown or hidden
    AffordanceChanged {
        /// NPC ID
        npc: NpcId,
        /// New visibility
        visible: bool,
    },
}

impl NpcEvent {
    /// NPC the event concerns.
    #[must_use]
    pub const fn npc(&self) -> NpcId {
        match self {
            NpcEvent::StateChanged { npc, .. }
            | NpcEvent::WaypointReached { npc, .. }
            | NpcEvent::InteractionStarted { npc, .. }
            | NpcEvent::DialogueLineShown { npc, .. }
            | NpcEvent::InteractionFinished { npc, .. }
            | NpcEvent::AffordanceChanged { npc, .. } => *npc,
        }
    }
}

/// Event bus collecting events from any number of NPCs.
///
/// NPCs publish through cloned [`Sender`]s with `try_send`, so a full bus
/// drops new events instead of stalling a tick.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<NpcEvent>,
    receiver: Receiver<NpcEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<NpcEvent> {
        self.receiver.try_iter().collect()
    }

    /// Creates a new sender handle for an NPC to publish through.
    #[must_use]
    pub fn sender(&self) -> Sender<NpcEvent> {
        self.sender.clone()
    }
}
