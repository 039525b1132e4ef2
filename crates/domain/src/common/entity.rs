use serde::{Deserialize, Serialize};

/// Final disposition of one processed frame, handed back to the external
/// transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Forward the frame unchanged.
    Pass,
    /// The frame was rewritten in place into a truncation response;
    /// retransmit the buffer out the interface it arrived on.
    Transmit,
    /// Structurally invalid past the IP layer; reject the frame.
    Abort,
}
