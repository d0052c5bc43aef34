//! Cross-NPC choreography: chains of scripted steps where each beat starts
//! only once the previous beat's step has completed.
//!
//! ```text
//!   beat 0: npc A step 2 ──ticket completes──► beat 1: npc B step 0 ──► …
//! ```
//!
//! A beat whose step is superseded before completing (the host redirected
//! that NPC) abandons the rest of the chain.

use npc_core::NpcId;
use npc_sequence::StepTicket;

/// "Start step `step` on `npc`."
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Beat {
    pub npc:  NpcId,
    pub step: usize,
}

/// Progress of one running chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChoreographyState {
    /// Not handed to a world yet.
    Idle,
    /// Waiting on `ticket` from beat `beat`.
    Waiting { beat: usize, npc: NpcId, ticket: StepTicket },
    Finished,
    /// A beat's step was superseded, or its NPC could no longer take it.
    Abandoned { beat: usize },
}

#[derive(Clone, Debug)]
pub struct Choreography {
    name:  String,
    beats: Vec<Beat>,
    pub(crate) state: ChoreographyState,
}

impl Choreography {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), beats: Vec::new(), state: ChoreographyState::Idle }
    }

    /// Append a beat.
    pub fn then(mut self, npc: NpcId, step: usize) -> Self {
        self.beats.push(Beat { npc, step });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn beat(&self, index: usize) -> Option<Beat> {
        self.beats.get(index).copied()
    }

    pub fn state(&self) -> ChoreographyState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(
            self.state,
            ChoreographyState::Finished | ChoreographyState::Abandoned { .. }
        )
    }
}
