//! Ticket, GP, raid result and raid score logging scenarios
//!
//! Run with: cargo test -p integration-tests --test logging_tests

use chrono::{NaiveDate, NaiveDateTime};

use guild_common::ExitStatus;
use guild_core::entities::{RaidResult, RaidScoreLog, TicketLog};
use guild_core::value_objects::{GuildId, MemberId};
use guild_core::FailureKind;
use guild_service::{GpLogJob, JobSettings, RaidResultJob, RaidScoreJob, Stage, TicketLogJob};
use guild_source::GuildSnapshot;
use integration_tests::*;

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap()
}

fn ticket_roster() -> GuildSnapshot {
    GuildSnapshot::new(
        GuildId::from("G1"),
        vec![
            member_with_tickets("A", "Alice", "G1", 150),
            member_with_tickets("B", "Bob", "G1", 0),
            member_with_tickets("C", "Cara", "G1", -40),
        ],
    )
}

// ============================================================================
// Tickets
// ============================================================================

#[tokio::test]
async fn test_tickets_logged_right_before_reset() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    let source = FakeRoster::new().with_guild(ticket_roster());
    let ctx = store.context(JobSettings::default());

    let report = TicketLogJob::new(&ctx, &source).run_at(at(19, 29)).await;

    assert!(report.is_clean());
    assert_eq!(
        store.ticket_logs(),
        vec![TicketLog::new(MemberId::from("A"), 150)]
    );
    assert_eq!(report.counter("ticket_logs"), 1);
}

#[tokio::test]
async fn test_tickets_skipped_outside_window() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    let source = FakeRoster::new().with_guild(ticket_roster());
    let ctx = store.context(JobSettings::default());

    let report = TicketLogJob::new(&ctx, &source).run_at(at(12, 0)).await;

    assert_eq!(source.fetches(), 0);
    assert!(store.ticket_logs().is_empty());
    assert_eq!(report.counter("outside_window"), 1);
    assert_eq!(report.exit_status(), ExitStatus::Clean);
}

#[tokio::test]
async fn test_ticket_window_follows_settings() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    let source = FakeRoster::new().with_guild(ticket_roster());
    let settings = JobSettings {
        reset_window: chrono::Duration::minutes(30),
        ..JobSettings::default()
    };
    let ctx = store.context(settings);

    TicketLogJob::new(&ctx, &source).run_at(at(19, 5)).await;

    assert_eq!(store.ticket_logs().len(), 1);
}

#[tokio::test]
async fn test_ticket_insert_failure_is_reported() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.fail("insert_ticket_logs");
    let source = FakeRoster::new().with_guild(ticket_roster());
    let ctx = store.context(JobSettings::default());

    let report = TicketLogJob::new(&ctx, &source).run_at(at(19, 30)).await;

    assert_eq!(report.failures()[0].stage, Stage::LogTickets);
    assert_eq!(report.exit_status(), ExitStatus::Connectivity);
}

// ============================================================================
// GP
// ============================================================================

#[tokio::test]
async fn test_gp_logged_per_guild_member() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    let mut leaver = member("Z", "Zed", "G1");
    leaver.detach();
    store.add_member(leaver);
    let ctx = store.context(JobSettings::default());

    let report = GpLogJob::new(&ctx).run().await;

    let logs = store.gp_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].member_id, MemberId::from("A"));
    assert_eq!(logs[0].galactic_power, 5_000_000);
    assert_eq!(report.counter("gp_logs"), 1);
}

// ============================================================================
// Raid results
// ============================================================================

#[tokio::test]
async fn test_raid_results_cover_every_member() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    store.add_member(member("B", "Bob", "G1"));
    let mut live = roster("G1", &[("A", "Alice"), ("B", "Bob")]);
    live.raids.push(raid("order66", &[("A", 12_000_000)]));
    let source = FakeRoster::new().with_guild(live);
    let ctx = store.context(JobSettings::default());

    let report = RaidResultJob::new(&ctx, &source).run().await;

    assert!(report.is_clean());
    let mut results = store.raid_results();
    results.sort_by(|a, b| a.member_id.cmp(&b.member_id));
    assert_eq!(
        results,
        vec![
            RaidResult {
                member_id: MemberId::from("A"),
                last_raid_result: Some(12_000_000),
            },
            RaidResult {
                member_id: MemberId::from("B"),
                last_raid_result: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_missing_raid_skips_guild() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_member(member("A", "Alice", "G1"));
    let mut live = roster("G1", &[("A", "Alice")]);
    live.raids.push(raid("other-raid", &[("A", 1)]));
    let source = FakeRoster::new().with_guild(live);
    let ctx = store.context(JobSettings::default());

    let report = RaidResultJob::new(&ctx, &source).run().await;

    assert!(store.raid_results().is_empty());
    let failure = &report.failures()[0];
    assert_eq!(failure.stage, Stage::RaidResults);
    assert_eq!(failure.kind, FailureKind::DataShape);
    assert_eq!(failure.detail.as_deref(), Some("order66"));
}

// ============================================================================
// Raid score
// ============================================================================

#[tokio::test]
async fn test_raid_scores_copied_from_performance_view() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.add_guild(guild("G2"));
    let logs = vec![
        RaidScoreLog {
            member_id: MemberId::from("A"),
            raid_score: Some(12_000_000.0),
            percent_of_average: Some(120.0),
        },
        RaidScoreLog {
            member_id: MemberId::from("B"),
            raid_score: None,
            percent_of_average: None,
        },
    ];
    store.set_raid_performance("G1", logs.clone());
    let ctx = store.context(JobSettings::default());

    let report = RaidScoreJob::new(&ctx).run().await;

    assert!(report.is_clean());
    assert_eq!(store.raid_score_logs(), logs);
    assert_eq!(report.counter("raid_score_logs"), 2);
    assert_eq!(report.guilds_attempted(), 2);
}

#[tokio::test]
async fn test_raid_score_read_failure_is_reported() {
    let store = MemoryStore::new();
    store.add_guild(guild("G1"));
    store.fail("list_raid_performance");
    let ctx = store.context(JobSettings::default());

    let report = RaidScoreJob::new(&ctx).run().await;

    assert!(store.raid_score_logs().is_empty());
    assert_eq!(report.failures()[0].stage, Stage::ReadView);
}
