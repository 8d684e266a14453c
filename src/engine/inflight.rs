// src/engine/inflight.rs

use std::collections::HashMap;

use tracing::debug;

use crate::engine::{BuildJob, BuildKey};
use crate::types::OverlapPolicy;
use super::core::CoreCommand;

/// Per-key build bookkeeping.
#[derive(Debug, Default)]
struct Entry {
    /// Number of build instances currently running for this key. Only the
    /// `Overlap` policy ever pushes this above 1.
    running: usize,
    /// Generation of the instance currently owning the slot. Completions
    /// carrying an older generation are stale and ignored (except under
    /// `Overlap`, where every instance is legitimate).
    generation: u64,
    /// Latest job parked while the key was busy (`Serialize` policy).
    pending: Option<BuildJob>,
}

/// Keyed table of in-flight builds.
///
/// Guarantees, depending on the configured [`OverlapPolicy`]:
/// - `Supersede`: at most one build per key; a newer job cancels the
///   running one and takes its slot, so the latest trigger always wins.
/// - `Serialize`: at most one build per key; a newer job waits until the
///   running one finishes, and only the newest waiter survives.
/// - `Overlap`: no exclusion; the table only counts instances.
///
/// Every started instance carries a generation. A cancelled instance
/// normally emits no completion event, but cancellation can lose the race
/// against the build finishing; the stale completion then arrives tagged
/// with the superseded generation and is dropped, so the slot stays owned
/// by the instance that superseded it.
#[derive(Debug)]
pub struct InflightTable {
    policy: OverlapPolicy,
    entries: HashMap<BuildKey, Entry>,
    next_generation: u64,
}

impl InflightTable {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
            next_generation: 0,
        }
    }

    /// True when no builds are running and nothing is parked.
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Account for a new job and decide what the IO shell should do.
    pub fn on_job(&mut self, job: BuildJob) -> Vec<CoreCommand> {
        let key = job.key();
        let generation = self.fresh_generation();
        let entry = self.entries.entry(key.clone()).or_default();

        if entry.running == 0 {
            entry.running = 1;
            entry.generation = generation;
            return vec![CoreCommand::StartBuild { job, generation }];
        }

        match self.policy {
            OverlapPolicy::Overlap => {
                entry.running += 1;
                entry.generation = generation;
                debug!(key = %key, running = entry.running, "overlapping build started");
                vec![CoreCommand::StartBuild { job, generation }]
            }
            OverlapPolicy::Supersede => {
                debug!(key = %key, "superseding in-flight build");
                // The new instance inherits the running slot; whether the
                // old one is cancelled in time or completes stale, its
                // generation no longer matches.
                entry.generation = generation;
                vec![
                    CoreCommand::CancelBuild(key),
                    CoreCommand::StartBuild { job, generation },
                ]
            }
            OverlapPolicy::Serialize => {
                debug!(key = %key, "parking job behind in-flight build");
                entry.pending = Some(job);
                Vec::new()
            }
        }
    }

    /// Account for a finished build; may release a parked job.
    pub fn on_finished(&mut self, key: &BuildKey, generation: u64) -> Vec<CoreCommand> {
        let Some(entry) = self.entries.get_mut(key) else {
            debug!(key = %key, "completion for unknown build key; ignoring");
            return Vec::new();
        };

        // Under Supersede/Serialize only the slot owner may drain it; a
        // stale completion means the instance was superseded after it
        // finished but before the cancel arrived.
        if self.policy != OverlapPolicy::Overlap && generation != entry.generation {
            debug!(key = %key, generation, current = entry.generation,
                "stale completion for superseded build; ignoring");
            return Vec::new();
        }

        entry.running = entry.running.saturating_sub(1);

        if entry.running == 0 {
            if let Some(job) = entry.pending.take() {
                entry.running = 1;
                entry.generation = self.next_generation;
                self.next_generation += 1;
                let generation = entry.generation;
                return vec![CoreCommand::StartBuild { job, generation }];
            }
            self.entries.remove(key);
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job(name: &str) -> BuildJob {
        BuildJob::Style {
            source: PathBuf::from(format!("src/definitions/{name}.less")),
        }
    }

    fn starts(commands: &[CoreCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, CoreCommand::StartBuild { .. }))
            .count()
    }

    fn started_generation(commands: &[CoreCommand]) -> u64 {
        commands
            .iter()
            .find_map(|c| match c {
                CoreCommand::StartBuild { generation, .. } => Some(*generation),
                _ => None,
            })
            .expect("no StartBuild in commands")
    }

    #[test]
    fn idle_key_starts_immediately() {
        let mut table = InflightTable::new(OverlapPolicy::Supersede);
        let cmds = table.on_job(job("button"));
        assert_eq!(starts(&cmds), 1);
        assert!(!table.is_idle());
    }

    #[test]
    fn supersede_cancels_then_starts() {
        let mut table = InflightTable::new(OverlapPolicy::Supersede);
        table.on_job(job("button"));
        let cmds = table.on_job(job("button"));
        assert!(matches!(cmds[0], CoreCommand::CancelBuild(_)));
        assert!(matches!(cmds[1], CoreCommand::StartBuild { .. }));

        // One completion (from the superseding instance) drains the key.
        table.on_finished(&job("button").key(), started_generation(&cmds));
        assert!(table.is_idle());
    }

    #[test]
    fn stale_completion_does_not_drain_the_slot() {
        let mut table = InflightTable::new(OverlapPolicy::Supersede);
        let first = table.on_job(job("button"));
        let first_gen = started_generation(&first);
        let second = table.on_job(job("button"));
        let second_gen = started_generation(&second);

        // The first instance finished before its cancellation arrived;
        // its completion must not free the slot the second one owns.
        assert!(table.on_finished(&job("button").key(), first_gen).is_empty());
        assert!(!table.is_idle());

        table.on_finished(&job("button").key(), second_gen);
        assert!(table.is_idle());
    }

    #[test]
    fn serialize_parks_latest_job_only() {
        let mut table = InflightTable::new(OverlapPolicy::Serialize);
        let first = table.on_job(job("button"));
        assert!(table.on_job(job("button")).is_empty());
        assert!(table.on_job(job("button")).is_empty());

        let cmds = table.on_finished(&job("button").key(), started_generation(&first));
        assert_eq!(starts(&cmds), 1);

        // The parked run completes; nothing further.
        let parked_gen = started_generation(&cmds);
        assert!(table.on_finished(&job("button").key(), parked_gen).is_empty());
        assert!(table.is_idle());
    }

    #[test]
    fn overlap_runs_both_and_counts_down() {
        let mut table = InflightTable::new(OverlapPolicy::Overlap);
        let first = table.on_job(job("button"));
        let second = table.on_job(job("button"));
        assert_eq!(starts(&first), 1);
        assert_eq!(starts(&second), 1);

        // Both instances are legitimate, whatever order they finish in.
        let key = job("button").key();
        table.on_finished(&key, started_generation(&first));
        assert!(!table.is_idle());
        table.on_finished(&key, started_generation(&second));
        assert!(table.is_idle());
    }

    #[test]
    fn distinct_keys_never_interact() {
        let mut table = InflightTable::new(OverlapPolicy::Supersede);
        assert_eq!(starts(&table.on_job(job("button"))), 1);
        assert_eq!(starts(&table.on_job(job("menu"))), 1);
    }
}
