use serde::Deserialize;
use std::str::FromStr;

/// Behaviour when a change arrives for a build target that already has a
/// build in flight.
///
/// - `Supersede`: cancel the running build and start one for the new event,
///   so the latest trigger always wins (default behaviour).
/// - `Serialize`: park the latest job for that target and start it when the
///   running build finishes; intermediate jobs for the same target are
///   coalesced away.
/// - `Overlap`: start the new build immediately alongside the running one.
///   Whichever finishes last determines the file content (the historical
///   behaviour, kept available as a documented race).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    Supersede,
    Serialize,
    Overlap,
}

impl Default for OverlapPolicy {
    fn default() -> Self {
        OverlapPolicy::Supersede
    }
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supersede" => Ok(OverlapPolicy::Supersede),
            "serialize" => Ok(OverlapPolicy::Serialize),
            "overlap" => Ok(OverlapPolicy::Overlap),
            other => Err(format!(
                "invalid overlap policy: {other} (expected \"supersede\", \"serialize\" or \"overlap\")"
            )),
        }
    }
}
