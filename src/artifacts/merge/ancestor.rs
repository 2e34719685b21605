//! Common ancestor search for merges
//!
//! Finds the nearest common ancestor of two commits by walking both parent
//! chains simultaneously, newest commits first. Each commit is tagged with
//! the side(s) it was reached from; the first commit popped that has been
//! reached from both sides is the merge base. Processing in reverse
//! chronological order (a max-heap on commit timestamp) guarantees that the
//! first such commit is the most recent shared ancestor.
//!
//! Returns `None` when the histories share no commit at all, which callers
//! surface as `UnrelatedHistories`.
//!
//! Debug logging of the traversal is compiled in with the `debug_merge`
//! feature flag.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const FROM_SOURCE = 0b01;
        const FROM_TARGET = 0b10;
        const FROM_BOTH = Self::FROM_SOURCE.bits() | Self::FROM_TARGET.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::FROM_TARGET) {
            flags.push("TARGET");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// Nearest-common-ancestor finder over commits loaded on demand.
///
/// Generic over the loader so the traversal can be exercised against
/// synthetic in-memory histories as well as the object store.
pub struct AncestorFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> AncestorFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Nearest common ancestor of `source` and `target`, or `None` when the
    /// histories are unrelated. When one commit is an ancestor of the other,
    /// that commit itself is returned (the fast-forward case).
    pub fn find(&self, source: &ObjectId, target: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        if source == target {
            return Ok(Some(source.clone()));
        }

        let mut states: HashMap<ObjectId, VisitState> = HashMap::new();
        let mut queue = BinaryHeap::new();

        let source_commit = (self.commit_loader)(source)?;
        states.insert(source.clone(), VisitState::FROM_SOURCE);
        queue.push((source_commit.timestamp, source.clone()));

        let target_commit = (self.commit_loader)(target)?;
        states.insert(target.clone(), VisitState::FROM_TARGET);
        queue.push((target_commit.timestamp, target.clone()));

        while let Some((_, oid)) = queue.pop() {
            let state = states
                .get(&oid)
                .copied()
                .unwrap_or(VisitState::empty());

            debug_log!("processing commit {}: state={:?}", &oid, state);

            // reached from both sides: newest-first ordering makes this the
            // nearest shared commit
            if state.contains(VisitState::FROM_BOTH) {
                debug_log!("common ancestor found: {}", &oid);
                return Ok(Some(oid));
            }

            let commit = (self.commit_loader)(&oid)?;

            for parent_id in &commit.parents {
                let parent_state = states
                    .get(parent_id)
                    .copied()
                    .unwrap_or(VisitState::empty());
                let inherited = parent_state | state;

                // requeue only when this side adds new reachability
                if inherited != parent_state {
                    let parent = (self.commit_loader)(parent_id)?;
                    states.insert(parent_id.clone(), inherited);
                    queue.push((parent.timestamp, parent_id.clone()));
                }
            }
        }

        debug_log!("no common ancestor between {} and {}", source, target);
        Ok(None)
    }
}
