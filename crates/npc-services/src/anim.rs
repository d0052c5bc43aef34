//! Animation playback trait.

use npc_core::{ClipId, Millis};

/// Cross-fade used for every clip the core starts.  Hosts typically blend
/// over 0.2–0.4 s.
pub const DEFAULT_BLEND: Millis = Millis(250);

/// Fire-and-forget animation playback.
///
/// The core never waits on the animator.  When it needs a clip's duration
/// (action halves, blocking animate steps) it asks [`clip_length`] up front.
///
/// [`clip_length`]: Animation::clip_length
pub trait Animation {
    fn play(&mut self, clip: &ClipId, blend: Millis);

    /// Length of `clip`, or `None` if the clip is unknown / missing.
    fn clip_length(&self, clip: &ClipId) -> Option<Millis>;
}
