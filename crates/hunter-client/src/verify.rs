//! Diagnostic tracking of the frame sequence.
//!
//! The protocol has no correlation ids and the reducer deliberately accepts
//! frames in any order, so nothing here drops or rejects anything. The
//! tracker only logs sequences that usually indicate a confused backend:
//! transcript frames outside a response cycle and terminal frames without
//! an open cycle.

use hunter_core::event::{EventType, InboundEvent};
use log::{debug, warn};

/// Per-channel frame sequence tracker. Diagnostics only.
#[derive(Debug, Default)]
pub struct ProtocolTracker {
    cycle_open: bool,
}

impl ProtocolTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a response cycle is currently open.
    pub fn cycle_open(&self) -> bool {
        self.cycle_open
    }

    /// Record one frame, logging anything out of sequence.
    pub fn observe(&mut self, event: &InboundEvent) {
        match event.event_type() {
            EventType::Start => {
                if self.cycle_open {
                    warn!("start frame while a cycle is open; restarting the cycle");
                }
                self.cycle_open = true;
            }
            EventType::Stream => {
                if !self.cycle_open {
                    warn!("stream frame outside a response cycle");
                }
            }
            EventType::Complete => {
                if !self.cycle_open {
                    warn!("complete frame without an open cycle");
                }
                debug!("response cycle complete");
                self.cycle_open = false;
            }
            EventType::Error => {
                self.cycle_open = false;
            }
        }
    }
}
