//! Archive & purge manager
//!
//! Removed members are first copied into the archive, then deleted from the
//! active store. Only ids the archive confirms are deleted, so a failed or
//! partial archive step never loses data; the rest stay in the active store
//! and are picked up again by the next run.

use std::collections::{HashMap, HashSet};

use tracing::{error, info, instrument, warn};

use guild_core::entities::{ArchiveRecord, Member};
use guild_core::value_objects::{GuildId, MemberId};
use guild_core::FailureKind;

use crate::context::JobContext;
use crate::report::Stage;

/// Progress of one archive & purge pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveOutcome {
    /// Members confirmed present in the archive
    pub archived: usize,
    /// Members deleted from the active store
    pub purged: u64,
    /// Members left in the active store for the next run
    pub deferred: usize,
    pub failure: Option<(Stage, FailureKind)>,
}

/// Archive & purge manager
pub struct ArchiveManager<'a> {
    ctx: &'a JobContext,
}

impl<'a> ArchiveManager<'a> {
    pub fn new(ctx: &'a JobContext) -> Self {
        Self { ctx }
    }

    /// Archive `to_remove`, then purge the confirmed part. Never fails.
    #[instrument(skip(self, to_remove), fields(batch_size = to_remove.len()))]
    pub async fn archive_and_purge(&self, to_remove: &[Member]) -> ArchiveOutcome {
        if to_remove.is_empty() {
            return ArchiveOutcome::default();
        }

        let mut seen = HashSet::new();
        let records: Vec<ArchiveRecord> = to_remove
            .iter()
            .filter(|m| seen.insert(&m.member_id))
            .map(ArchiveRecord::from_member)
            .collect();
        let confirmed = match self.ctx.archive_repo().insert_archive_records(&records).await {
            Ok(confirmed) => confirmed,
            Err(e) => {
                error!(
                    batch_size = records.len(),
                    error = %e,
                    code = e.code(),
                    "Archive step failed, nothing will be purged"
                );
                return ArchiveOutcome {
                    deferred: records.len(),
                    failure: Some((Stage::Archive, e.failure_kind())),
                    ..ArchiveOutcome::default()
                };
            }
        };

        // Purge only what was asked for and confirmed, each id once
        let confirmed: HashSet<MemberId> = confirmed
            .into_iter()
            .filter(|id| seen.contains(id))
            .collect();
        let purge: Vec<MemberId> = confirmed.into_iter().collect();
        let deferred = records.len().saturating_sub(purge.len());
        if deferred > 0 {
            warn!(deferred, "Some members were not confirmed in the archive and stay active");
        }

        let mut outcome = ArchiveOutcome {
            archived: purge.len(),
            deferred,
            ..ArchiveOutcome::default()
        };
        if purge.is_empty() {
            return outcome;
        }

        match self.ctx.member_repo().delete_members(&purge).await {
            Ok(purged) => {
                info!(archived = outcome.archived, purged, "Archived and purged members");
                outcome.purged = purged;
            }
            Err(e) => {
                error!(
                    batch_size = purge.len(),
                    error = %e,
                    code = e.code(),
                    "Purge step failed, archived members stay active"
                );
                outcome.deferred += purge.len();
                outcome.failure = Some((Stage::Purge, e.failure_kind()));
            }
        }
        outcome
    }

    /// Archive and purge every member not affiliated with a configured guild.
    ///
    /// `departed` holds members as they were stored before this run detached
    /// them. A candidate found there is archived from that copy so its record
    /// keeps the guild it left; members that rejoined a guild since are no
    /// longer candidates and stay active.
    #[instrument(skip(self, configured, departed), fields(guilds = configured.len(), departed = departed.len()))]
    pub async fn sweep(&self, configured: &[GuildId], departed: &[Member]) -> ArchiveOutcome {
        match self.ctx.member_repo().list_archive_candidates(configured).await {
            Ok(candidates) if candidates.is_empty() => {
                info!("No members to archive");
                ArchiveOutcome::default()
            }
            Ok(candidates) => {
                let before: HashMap<&MemberId, &Member> =
                    departed.iter().map(|m| (&m.member_id, m)).collect();
                let candidates: Vec<Member> = candidates
                    .into_iter()
                    .map(|c| match before.get(&c.member_id) {
                        Some(&former) if c.guild_id.is_none() => former.clone(),
                        _ => c,
                    })
                    .collect();
                self.archive_and_purge(&candidates).await
            }
            Err(e) => {
                error!(error = %e, code = e.code(), "Failed to list archive candidates");
                ArchiveOutcome {
                    failure: Some((Stage::Archive, e.failure_kind())),
                    ..ArchiveOutcome::default()
                }
            }
        }
    }
}
