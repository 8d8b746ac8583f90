//! Roster sync scenarios
//!
//! Run with: cargo test -p integration-tests --test roster_sync_tests

use guild_common::ExitStatus;
use guild_core::value_objects::GuildId;
use guild_core::FailureKind;
use guild_service::{ArchiveManager, JobSettings, RosterSyncJob, Stage};
use integration_tests::*;

// ============================================================================
// Reconciliation
// ============================================================================

#[tokio::test]
async fn test_join_stay_leave() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("B", "Bob", "G1"));
    store.add_member(member("C", "Cara", "G1"));
    let source = FakeRoster::new().with_guild(roster("G1", &[("A", "Alice"), ("B", "Bob")]));
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert!(report.is_clean(), "unexpected failures: {:?}", report.failures());
    assert_eq!(store.member_ids(), vec!["A", "B"]);
    assert_eq!(store.archived_ids(), vec!["C"]);
    assert_eq!(report.counter("inserted"), 1);
    assert_eq!(report.counter("detached"), 1);
    assert_eq!(report.counter("archived"), 1);
    assert_eq!(report.counter("purged"), 1);

    let record = store.archive_record("C").unwrap();
    assert_eq!(record.display_name(), "Cara");
    assert_eq!(record.former_guild_id(), Some(&GuildId::from("G1")));
    assert_eq!(report.exit_status(), ExitStatus::Clean);
}

#[tokio::test]
async fn test_rename_is_applied_without_churn() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    let source = FakeRoster::new().with_guild(roster("G1", &[("A", "Alicia")]));
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(store.member("A").unwrap().display_name, "Alicia");
    assert_eq!(report.counter("renamed"), 1);
    assert_eq!(report.counter("inserted"), 0);
    assert!(store.archived_ids().is_empty());
}

#[tokio::test]
async fn test_stats_are_refreshed() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    let mut live = roster("G1", &[("A", "Alice")]);
    live.members[0].galactic_power = 7_250_000;
    let source = FakeRoster::new().with_guild(live);
    let ctx = store.context(JobSettings::default());

    RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(store.member("A").unwrap().galactic_power, 7_250_000);
}

#[tokio::test]
async fn test_member_moving_between_guilds_is_not_archived() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_guild(guild("G2"));
    store.add_member(member("A", "Alice", "G1"));
    let source = FakeRoster::new()
        .with_guild(roster("G1", &[]))
        .with_guild(roster("G2", &[("A", "Alice")]));
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert!(report.is_clean(), "unexpected failures: {:?}", report.failures());
    let moved = store.member("A").unwrap();
    assert_eq!(moved.guild_id, Some(GuildId::from("G2")));
    assert!(store.archived_ids().is_empty());
}

#[tokio::test]
async fn test_sync_is_idempotent() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("B", "Bob", "G1"));
    let source = FakeRoster::new().with_guild(roster("G1", &[("A", "Alice"), ("B", "Bob")]));
    let ctx = store.context(JobSettings::default());

    RosterSyncJob::new(&ctx, &source).run().await;
    let second = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(store.member_ids(), vec!["A", "B"]);
    assert_eq!(second.counter("inserted"), 0);
    assert_eq!(second.counter("detached"), 0);
    assert_eq!(second.counter("archived"), 0);
}

// ============================================================================
// Removal guard
// ============================================================================

#[tokio::test]
async fn test_empty_live_roster_removes_nobody() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    store.add_member(member("B", "Bob", "G1"));
    let source = FakeRoster::new().with_guild(roster("G1", &[]));
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(store.member_ids(), vec!["A", "B"]);
    assert!(store.archived_ids().is_empty());
    assert_eq!(report.suppressed_removals(), &[GuildId::from("G1")]);
}

#[tokio::test]
async fn test_small_roster_still_adds_members() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    for (id, name) in [("A", "Alice"), ("B", "Bob"), ("C", "Cara"), ("D", "Dan")] {
        store.add_member(member(id, name, "G1"));
    }
    let source = FakeRoster::new().with_guild(roster("G1", &[("E", "Eve")]));
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(store.member_ids(), vec!["A", "B", "C", "D", "E"]);
    assert_eq!(report.counter("detached"), 0);
    assert_eq!(report.suppressed_removals().len(), 1);
}

#[tokio::test]
async fn test_guard_ratio_is_configurable() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    store.add_member(member("B", "Bob", "G1"));
    let source = FakeRoster::new().with_guild(roster("G1", &[("A", "Alice")]));
    let settings = JobSettings {
        min_live_ratio: 0.9,
        ..JobSettings::default()
    };
    let ctx = store.context(settings);

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(store.member_ids(), vec!["A", "B"]);
    assert_eq!(report.suppressed_removals().len(), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_unreachable_guild_does_not_stop_others() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_guild(guild("G2"));
    store.add_member(member("A", "Alice", "G1"));
    let source = FakeRoster::new()
        .unreachable("G1")
        .with_guild(roster("G2", &[("B", "Bob")]));
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(source.fetches(), 2);
    assert_eq!(report.guilds_attempted(), 2);
    assert_eq!(store.member_ids(), vec!["A", "B"]);
    assert!(store.archived_ids().is_empty());

    let failure = &report.failures()[0];
    assert_eq!(failure.stage, Stage::FetchRoster);
    assert_eq!(failure.guild_id, Some(GuildId::from("G1")));
    assert_eq!(report.exit_status(), ExitStatus::Connectivity);
}

#[tokio::test]
async fn test_malformed_roster_skips_guild() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    let source = FakeRoster::new().malformed("G1");
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(store.member("A").unwrap().guild_id, Some(GuildId::from("G1")));
    assert!(store.archived_ids().is_empty());
    assert!(report.suppressed_removals().is_empty());
    let failure = &report.failures()[0];
    assert_eq!(failure.stage, Stage::FetchRoster);
    assert_eq!(failure.kind, FailureKind::DataShape);
    assert_ne!(report.exit_status(), ExitStatus::Clean);
}

#[tokio::test]
async fn test_guild_list_failure_aborts_run() {
    let store = MemoryStore::new();
    store.fail("list_guilds");
    let source = FakeRoster::new();
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(source.fetches(), 0);
    assert_eq!(report.failures()[0].stage, Stage::LoadGuilds);
    assert_eq!(report.exit_status(), ExitStatus::Connectivity);
}

#[tokio::test]
async fn test_failed_insert_still_detaches_leavers() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("B", "Bob", "G1"));
    store.add_member(member("C", "Cara", "G1"));
    store.fail("insert_members");
    let source = FakeRoster::new().with_guild(roster("G1", &[("A", "Alice"), ("B", "Bob")]));
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(store.member_ids(), vec!["B"]);
    assert_eq!(store.archived_ids(), vec!["C"]);
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].stage, Stage::InsertMembers);
}

// ============================================================================
// Archive & purge
// ============================================================================

#[tokio::test]
async fn test_failed_archive_purges_nothing() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    store.add_member(member("C", "Cara", "G1"));
    store.fail("insert_archive_records");
    let source = FakeRoster::new().with_guild(roster("G1", &[("A", "Alice")]));
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    // Detached but still stored, so the next run retries
    assert_eq!(store.member_ids(), vec!["A", "C"]);
    assert_eq!(store.member("C").unwrap().guild_id, None);
    assert_eq!(report.counter("deferred"), 1);
    assert_eq!(report.failures()[0].stage, Stage::Archive);
}

#[tokio::test]
async fn test_only_confirmed_members_are_purged() {
    let store = MemoryStore::new();
    let mut leavers = vec![member("C", "Cara", "G1"), member("D", "Dan", "G1")];
    for leaver in &mut leavers {
        leaver.detach();
        store.add_member(leaver.clone());
    }
    store.withhold_confirmation("D");
    let ctx = store.context(JobSettings::default());

    let outcome = ArchiveManager::new(&ctx).archive_and_purge(&leavers).await;

    assert_eq!(outcome.archived, 1);
    assert_eq!(outcome.purged, 1);
    assert_eq!(outcome.deferred, 1);
    assert!(outcome.failure.is_none());
    assert_eq!(store.member_ids(), vec!["D"]);
}

#[tokio::test]
async fn test_archiving_twice_is_harmless() {
    let store = MemoryStore::new();
    let mut leaver = member("C", "Cara", "G1");
    leaver.detach();
    store.add_member(leaver.clone());
    let ctx = store.context(JobSettings::default());
    let manager = ArchiveManager::new(&ctx);

    let first = manager.archive_and_purge(&[leaver.clone()]).await;
    let second = manager.archive_and_purge(&[leaver]).await;

    assert_eq!(first.purged, 1);
    assert_eq!(second.archived, 1);
    assert_eq!(second.purged, 0);
    assert_eq!(store.archived_ids(), vec!["C"]);
    assert!(store.member_ids().is_empty());
}

#[tokio::test]
async fn test_duplicate_member_is_archived_once() {
    let store = MemoryStore::new();
    let mut leaver = member("C", "Cara", "G1");
    leaver.detach();
    store.add_member(leaver.clone());
    let ctx = store.context(JobSettings::default());

    let outcome = ArchiveManager::new(&ctx)
        .archive_and_purge(&[leaver.clone(), leaver])
        .await;

    assert_eq!(outcome.archived, 1);
    assert_eq!(outcome.purged, 1);
    assert_eq!(outcome.deferred, 0);
    assert!(outcome.failure.is_none());
    assert_eq!(store.archived_ids(), vec!["C"]);
    assert!(store.member_ids().is_empty());
}

#[tokio::test]
async fn test_leaver_detached_in_earlier_run_is_archived_without_guild() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    let mut stale = member("C", "Cara", "G1");
    stale.detach();
    store.add_member(stale);
    let source = FakeRoster::new().with_guild(roster("G1", &[("A", "Alice")]));
    let ctx = store.context(JobSettings::default());

    let report = RosterSyncJob::new(&ctx, &source).run().await;

    assert_eq!(report.counter("archived"), 1);
    assert_eq!(store.archive_record("C").unwrap().former_guild_id(), None);
}

#[tokio::test]
async fn test_departed_copy_is_used_for_detached_candidates() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    let former = member("C", "Cara", "G1");
    let mut detached = former.clone();
    detached.detach();
    store.add_member(detached);
    let ctx = store.context(JobSettings::default());

    let outcome = ArchiveManager::new(&ctx)
        .sweep(&[GuildId::from("G1")], &[former])
        .await;

    assert_eq!(outcome.purged, 1);
    assert_eq!(
        store.archive_record("C").unwrap().former_guild_id(),
        Some(&GuildId::from("G1"))
    );
}

#[tokio::test]
async fn test_failed_purge_keeps_members() {
    let store = MemoryStore::new();
    let mut leaver = member("C", "Cara", "G1");
    leaver.detach();
    store.add_member(leaver.clone());
    store.fail("delete_members");
    let ctx = store.context(JobSettings::default());

    let outcome = ArchiveManager::new(&ctx).archive_and_purge(&[leaver]).await;

    assert_eq!(outcome.purged, 0);
    assert_eq!(outcome.deferred, 1);
    assert_eq!(outcome.failure, Some((Stage::Purge, FailureKind::Connectivity)));
    assert_eq!(store.member_ids(), vec!["C"]);
    assert_eq!(store.archived_ids(), vec!["C"]);
}

#[tokio::test]
async fn test_sweep_archives_members_of_removed_guilds() {
    let store = MemoryStore::new();
    store.add_member(member("A", "Alice", "G1"));
    store.add_member(member("Z", "Zed", "OLD"));
    let ctx = store.context(JobSettings::default());

    let outcome = ArchiveManager::new(&ctx)
        .sweep(&[GuildId::from("G1")], &[])
        .await;

    assert_eq!(outcome.archived, 1);
    assert_eq!(store.member_ids(), vec!["A"]);
    assert_eq!(
        store.archive_record("Z").unwrap().former_guild_id(),
        Some(&GuildId::from("OLD"))
    );
}
