//! Heuristic classification of transcript fragments.
//!
//! The backend interleaves final-answer fragments with verbose tool-call
//! transcripts on the same `stream` frame type, so the client has to decide
//! from content alone whether a fragment is user-facing. The decision is a
//! textual pattern filter and is lossy by construction: a long narration
//! fragment that avoids every noise marker passes, and a short genuine
//! answer without a recognizable heading is dropped.
//!
//! The whole decision is kept behind [`FragmentClassifier`] so a
//! tagged-protocol implementation can replace it without touching the
//! session reducer.

/// Literal substrings that mark a fragment as agent-internal noise.
pub const NOISE_MARKERS: [&str; 5] = ["Tool Calls:", "call_", "===", "Agent", "Running"];

/// Fragments longer than this many characters pass without a heading,
/// provided they carry no noise marker.
pub const FINAL_LENGTH_THRESHOLD: usize = 100;

/// True iff the fragment contains any of the [`NOISE_MARKERS`].
pub fn is_tool_call_content(fragment: &str) -> bool {
    NOISE_MARKERS.iter().any(|marker| fragment.contains(marker))
}

/// True iff the fragment should replace the displayed result.
///
/// A fragment is final when it contains `**Event Name**:` or a `## `
/// heading, or when it is longer than [`FINAL_LENGTH_THRESHOLD`] characters
/// and is not tool-call content. The heading checks come first: a fragment
/// carrying both a heading and a noise marker is still accepted.
pub fn is_final_response(fragment: &str) -> bool {
    fragment.contains("**Event Name**:")
        || fragment.contains("## ")
        || (fragment.chars().count() > FINAL_LENGTH_THRESHOLD && !is_tool_call_content(fragment))
}

/// Decision seam between the raw transcript and the displayed result.
pub trait FragmentClassifier: Send + Sync {
    /// Should this fragment replace the displayed result?
    fn is_final(&self, fragment: &str) -> bool;
}

/// The default content-heuristic classifier ([`is_final_response`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl FragmentClassifier for HeuristicClassifier {
    fn is_final(&self, fragment: &str) -> bool {
        is_final_response(fragment)
    }
}
