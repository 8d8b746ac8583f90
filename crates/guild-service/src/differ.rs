//! Roster differ
//!
//! Compares a live roster with the persisted members of the same guild.
//! Members are matched by `member_id`; a display name that changed for an id
//! present on both sides is reported as a rename, never as remove + add.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use guild_core::entities::{Member, MemberKey, Rename};
use guild_core::value_objects::MemberId;

/// Changes needed to bring the store in line with the live roster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterDiff {
    /// Live members missing from the store
    pub to_add: Vec<Member>,
    /// Persisted members missing from the live roster
    pub to_remove: Vec<MemberKey>,
    /// Live version of members present on both sides
    pub retained: Vec<Member>,
    pub renamed: Vec<Rename>,
}

impl RosterDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty() && self.renamed.is_empty()
    }

    pub fn removed_ids(&self) -> Vec<MemberId> {
        self.to_remove.iter().map(|k| k.member_id.clone()).collect()
    }

    /// Live members whose display name changed
    pub fn renamed_members(&self) -> Vec<Member> {
        let renamed: HashSet<&MemberId> = self.renamed.iter().map(|r| &r.member_id).collect();
        self.retained
            .iter()
            .filter(|m| renamed.contains(&m.member_id))
            .cloned()
            .collect()
    }
}

/// First occurrence wins when an id appears twice
fn dedup(members: &[Member]) -> Vec<&Member> {
    let mut seen = HashSet::with_capacity(members.len());
    let mut unique = Vec::with_capacity(members.len());
    for member in members {
        if seen.insert(&member.member_id) {
            unique.push(member);
        } else {
            warn!(member_id = %member.member_id, "Duplicate member in roster, keeping first");
        }
    }
    unique
}

/// Compute adds, removals, and renames in O(n)
pub fn diff(live: &[Member], persisted: &[Member]) -> RosterDiff {
    let live = dedup(live);
    let persisted = dedup(persisted);

    let stored: HashMap<&MemberId, &Member> = persisted
        .iter()
        .copied()
        .map(|m| (&m.member_id, m))
        .collect();
    let live_ids: HashSet<&MemberId> = live.iter().copied().map(|m| &m.member_id).collect();

    let mut result = RosterDiff::default();
    for member in live.iter().copied() {
        match stored.get(&member.member_id) {
            None => result.to_add.push(member.clone()),
            Some(previous) => {
                if previous.display_name != member.display_name {
                    result.renamed.push(Rename {
                        member_id: member.member_id.clone(),
                        previous_name: previous.display_name.clone(),
                        current_name: member.display_name.clone(),
                    });
                }
                result.retained.push(member.clone());
            }
        }
    }

    result.to_remove = persisted
        .iter()
        .filter(|m| !live_ids.contains(&m.member_id))
        .map(|m| m.key())
        .collect();

    result
}

/// Protection against acting on an empty or truncated live roster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemovalGuard {
    min_live_ratio: f64,
}

impl Default for RemovalGuard {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl RemovalGuard {
    pub fn new(min_live_ratio: f64) -> Self {
        Self {
            min_live_ratio: min_live_ratio.clamp(0.0, 1.0),
        }
    }

    /// Whether removals computed from these roster sizes may be applied
    pub fn allows_removals(&self, live: usize, persisted: usize) -> bool {
        if persisted == 0 {
            return true;
        }
        if live == 0 {
            return false;
        }
        live as f64 >= persisted as f64 * self.min_live_ratio
    }
}
