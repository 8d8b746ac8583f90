//! In-memory stand-ins for the store, the roster API and the sink
//!
//! Each fake records what the jobs asked of it, and individual operations
//! can be switched to fail so error paths run without a real outage.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use guild_core::entities::{
    ArchiveRecord, GpLog, Guild, Member, RaidResult, RaidScoreLog, TicketLog, ViewKind,
};
use guild_core::traits::{
    ActivityLogRepository, ArchiveRepository, GuildRepository, MemberRepository, RepoResult,
    ViewRepository,
};
use guild_core::value_objects::{Cell, GuildId, MemberId, OrderClause, Timeframe};
use guild_core::DomainError;
use guild_service::{JobContext, JobSettings};
use guild_sink::{SheetClient, SheetTable, SinkError, SinkResult};
use guild_source::{GuildSnapshot, RosterSource, SourceError, SourceResult};

// ============================================================================
// Store
// ============================================================================

/// One view query as the job issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewQuery {
    pub kind: ViewKind,
    pub order: OrderClause,
    pub timeframe: Timeframe,
}

#[derive(Default)]
struct StoreState {
    guilds: Vec<Guild>,
    members: Vec<Member>,
    archive: Vec<ArchiveRecord>,
    views: HashMap<(GuildId, ViewKind), Vec<Vec<Cell>>>,
    view_queries: Vec<ViewQuery>,
    raid_performance: HashMap<GuildId, Vec<RaidScoreLog>>,
    raid_results: Vec<RaidResult>,
    ticket_logs: Vec<TicketLog>,
    gp_logs: Vec<GpLog>,
    raid_score_logs: Vec<RaidScoreLog>,
    failing: HashSet<&'static str>,
    unconfirmed: HashSet<MemberId>,
}

/// Store implementing every repository trait over plain collections
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_guild(&self, guild: Guild) {
        self.state.lock().guilds.push(guild);
    }

    pub fn add_member(&self, member: Member) {
        self.state.lock().members.push(member);
    }

    pub fn set_view(&self, guild_id: &str, kind: ViewKind, rows: Vec<Vec<Cell>>) {
        self.state
            .lock()
            .views
            .insert((GuildId::from(guild_id), kind), rows);
    }

    pub fn set_raid_performance(&self, guild_id: &str, logs: Vec<RaidScoreLog>) {
        self.state
            .lock()
            .raid_performance
            .insert(GuildId::from(guild_id), logs);
    }

    /// Make every later call of `operation` fail with a connectivity error
    pub fn fail(&self, operation: &'static str) {
        self.state.lock().failing.insert(operation);
    }

    /// Accept the archive record of `member_id` without confirming it
    pub fn withhold_confirmation(&self, member_id: &str) {
        self.state.lock().unconfirmed.insert(MemberId::from(member_id));
    }

    pub fn member(&self, member_id: &str) -> Option<Member> {
        let id = MemberId::from(member_id);
        self.state
            .lock()
            .members
            .iter()
            .find(|m| m.member_id == id)
            .cloned()
    }

    /// Sorted ids of every stored member
    pub fn member_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .state
            .lock()
            .members
            .iter()
            .map(|m| m.member_id.as_str().to_string())
            .collect();
        ids.sort();
        ids
    }

    /// Sorted ids of every archived member
    pub fn archived_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .state
            .lock()
            .archive
            .iter()
            .map(|r| r.member_id().as_str().to_string())
            .collect();
        ids.sort();
        ids
    }

    pub fn archive_record(&self, member_id: &str) -> Option<ArchiveRecord> {
        let id = MemberId::from(member_id);
        self.state
            .lock()
            .archive
            .iter()
            .find(|r| *r.member_id() == id)
            .cloned()
    }

    pub fn view_queries(&self) -> Vec<ViewQuery> {
        self.state.lock().view_queries.clone()
    }

    pub fn raid_results(&self) -> Vec<RaidResult> {
        self.state.lock().raid_results.clone()
    }

    pub fn ticket_logs(&self) -> Vec<TicketLog> {
        self.state.lock().ticket_logs.clone()
    }

    pub fn gp_logs(&self) -> Vec<GpLog> {
        self.state.lock().gp_logs.clone()
    }

    pub fn raid_score_logs(&self) -> Vec<RaidScoreLog> {
        self.state.lock().raid_score_logs.clone()
    }

    /// Job context whose repositories all point at this store
    pub fn context(self: &Arc<Self>, settings: JobSettings) -> JobContext {
        JobContext::new(
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            settings,
        )
    }

    fn check(state: &StoreState, operation: &'static str) -> RepoResult<()> {
        if state.failing.contains(operation) {
            return Err(DomainError::Connectivity(format!("{operation}: connection reset")));
        }
        Ok(())
    }
}

#[async_trait]
impl GuildRepository for MemoryStore {
    async fn list_guilds(&self) -> RepoResult<Vec<Guild>> {
        let state = self.state.lock();
        Self::check(&state, "list_guilds")?;
        Ok(state.guilds.clone())
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn list_members(&self, guild_id: Option<&GuildId>) -> RepoResult<Vec<Member>> {
        let state = self.state.lock();
        Self::check(&state, "list_members")?;
        Ok(state
            .members
            .iter()
            .filter(|m| guild_id.is_none_or(|g| m.belongs_to(g)))
            .cloned()
            .collect())
    }

    async fn list_archive_candidates(&self, configured: &[GuildId]) -> RepoResult<Vec<Member>> {
        let state = self.state.lock();
        Self::check(&state, "list_archive_candidates")?;
        Ok(state
            .members
            .iter()
            .filter(|m| m.guild_id.as_ref().is_none_or(|g| !configured.contains(g)))
            .cloned()
            .collect())
    }

    async fn insert_members(&self, members: &[Member]) -> RepoResult<u64> {
        let mut state = self.state.lock();
        Self::check(&state, "insert_members")?;
        let mut inserted = 0;
        for member in members {
            if state.members.iter().all(|m| m.member_id != member.member_id) {
                state.members.push(member.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn update_member_stats(&self, members: &[Member]) -> RepoResult<u64> {
        let mut state = self.state.lock();
        Self::check(&state, "update_member_stats")?;
        let mut updated = 0;
        for member in members {
            if let Some(stored) = state.members.iter_mut().find(|m| m.member_id == member.member_id) {
                stored.galactic_power = member.galactic_power;
                stored.last_activity = member.last_activity;
                if member.guild_id.is_some() {
                    stored.guild_id.clone_from(&member.guild_id);
                }
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn rename_members(&self, members: &[Member]) -> RepoResult<u64> {
        let mut state = self.state.lock();
        Self::check(&state, "rename_members")?;
        let mut renamed = 0;
        for member in members {
            if let Some(stored) = state.members.iter_mut().find(|m| m.member_id == member.member_id) {
                stored.display_name.clone_from(&member.display_name);
                renamed += 1;
            }
        }
        Ok(renamed)
    }

    async fn clear_guild(&self, member_ids: &[MemberId]) -> RepoResult<u64> {
        let mut state = self.state.lock();
        Self::check(&state, "clear_guild")?;
        let mut cleared = 0;
        for stored in &mut state.members {
            if member_ids.contains(&stored.member_id) {
                stored.detach();
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn delete_members(&self, member_ids: &[MemberId]) -> RepoResult<u64> {
        let mut state = self.state.lock();
        Self::check(&state, "delete_members")?;
        let before = state.members.len();
        state.members.retain(|m| !member_ids.contains(&m.member_id));
        Ok((before - state.members.len()) as u64)
    }

    async fn update_raid_results(&self, results: &[RaidResult]) -> RepoResult<u64> {
        let mut state = self.state.lock();
        Self::check(&state, "update_raid_results")?;
        state.raid_results.extend_from_slice(results);
        Ok(results.len() as u64)
    }
}

#[async_trait]
impl ArchiveRepository for MemoryStore {
    async fn insert_archive_records(&self, records: &[ArchiveRecord]) -> RepoResult<Vec<MemberId>> {
        let mut state = self.state.lock();
        Self::check(&state, "insert_archive_records")?;
        let mut confirmed = Vec::new();
        for record in records {
            if state.archive.iter().all(|r| r.member_id() != record.member_id()) {
                state.archive.push(record.clone());
            }
            if !state.unconfirmed.contains(record.member_id()) {
                confirmed.push(record.member_id().clone());
            }
        }
        Ok(confirmed)
    }
}

#[async_trait]
impl ViewRepository for MemoryStore {
    async fn read_view(
        &self,
        guild_id: &GuildId,
        kind: ViewKind,
        order: OrderClause,
        timeframe: Timeframe,
    ) -> RepoResult<Vec<Vec<Cell>>> {
        let mut state = self.state.lock();
        Self::check(&state, "read_view")?;
        state.view_queries.push(ViewQuery {
            kind,
            order,
            timeframe,
        });
        Ok(state
            .views
            .get(&(guild_id.clone(), kind))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_raid_performance(&self, guild_id: &GuildId) -> RepoResult<Vec<RaidScoreLog>> {
        let state = self.state.lock();
        Self::check(&state, "list_raid_performance")?;
        Ok(state
            .raid_performance
            .get(guild_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ActivityLogRepository for MemoryStore {
    async fn insert_ticket_logs(&self, logs: &[TicketLog]) -> RepoResult<u64> {
        let mut state = self.state.lock();
        Self::check(&state, "insert_ticket_logs")?;
        state.ticket_logs.extend_from_slice(logs);
        Ok(logs.len() as u64)
    }

    async fn insert_gp_logs(&self, logs: &[GpLog]) -> RepoResult<u64> {
        let mut state = self.state.lock();
        Self::check(&state, "insert_gp_logs")?;
        state.gp_logs.extend_from_slice(logs);
        Ok(logs.len() as u64)
    }

    async fn insert_raid_score_logs(&self, logs: &[RaidScoreLog]) -> RepoResult<u64> {
        let mut state = self.state.lock();
        Self::check(&state, "insert_raid_score_logs")?;
        state.raid_score_logs.extend_from_slice(logs);
        Ok(logs.len() as u64)
    }
}

// ============================================================================
// Roster source
// ============================================================================

/// Roster API answering from prepared snapshots
#[derive(Default)]
pub struct FakeRoster {
    snapshots: HashMap<GuildId, GuildSnapshot>,
    unreachable: HashSet<GuildId>,
    malformed: HashSet<GuildId>,
    fetches: Mutex<Vec<GuildId>>,
}

impl FakeRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guild(mut self, snapshot: GuildSnapshot) -> Self {
        self.snapshots.insert(snapshot.guild_id.clone(), snapshot);
        self
    }

    /// Requests for `guild_id` time out
    pub fn unreachable(mut self, guild_id: &str) -> Self {
        self.unreachable.insert(GuildId::from(guild_id));
        self
    }

    /// Responses for `guild_id` lack the member list
    pub fn malformed(mut self, guild_id: &str) -> Self {
        self.malformed.insert(GuildId::from(guild_id));
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.lock().len()
    }
}

#[async_trait]
impl RosterSource for FakeRoster {
    async fn fetch_guild(&self, guild_id: &GuildId) -> SourceResult<GuildSnapshot> {
        self.fetches.lock().push(guild_id.clone());
        if self.unreachable.contains(guild_id) {
            return Err(SourceError::Transport("operation timed out".to_string()));
        }
        if self.malformed.contains(guild_id) {
            return Err(SourceError::Decode("missing field `member`".to_string()));
        }
        self.snapshots
            .get(guild_id)
            .cloned()
            .ok_or(SourceError::Status(404))
    }
}

// ============================================================================
// Sink
// ============================================================================

/// Spreadsheets held in memory, keyed by target then view
#[derive(Default)]
pub struct FakeSheets {
    targets: Mutex<HashMap<String, HashMap<String, SheetTable>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeSheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a view; missing targets are created
    pub fn with_view(self, target: &str, view: &str, table: SheetTable) -> Self {
        self.targets
            .lock()
            .entry(target.to_string())
            .or_default()
            .insert(view.to_string(), table);
        self
    }

    /// Every view of `target`, each holding only its header row
    pub fn with_target(self, target: &str) -> Self {
        ViewKind::ALL.into_iter().fold(self, |sheets, kind| {
            sheets.with_view(target, kind.sheet_name(), vec![header(kind)])
        })
    }

    pub fn table(&self, target: &str, view: &str) -> Option<SheetTable> {
        self.targets
            .lock()
            .get(target)
            .and_then(|views| views.get(view))
            .cloned()
    }

    /// Number of calls of `operation` (`read_all`, `clear_range`, `write_range`)
    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.as_str() == operation)
            .count()
    }

    fn with_table<T>(
        &self,
        target: &str,
        view: &str,
        f: impl FnOnce(&mut SheetTable) -> T,
    ) -> SinkResult<T> {
        let mut targets = self.targets.lock();
        let views = targets
            .get_mut(target)
            .ok_or_else(|| SinkError::TargetNotFound(target.to_string()))?;
        let table = views.get_mut(view).ok_or_else(|| SinkError::ViewNotFound {
            target: target.to_string(),
            view: view.to_string(),
        })?;
        Ok(f(table))
    }
}

/// Column names of a view followed by the metadata column
pub fn header(kind: ViewKind) -> Vec<Cell> {
    kind.spec()
        .columns
        .iter()
        .map(|c| Cell::from(c.name))
        .chain(std::iter::once(Cell::from("sort")))
        .collect()
}

/// Column count of an `A2:H51` style range
fn range_width(range: &str) -> usize {
    range
        .split(':')
        .nth(1)
        .and_then(|end| end.bytes().next())
        .map_or(0, |letter| usize::from(letter - b'A') + 1)
}

#[async_trait]
impl SheetClient for FakeSheets {
    async fn read_all(&self, target: &str, view: &str) -> SinkResult<SheetTable> {
        self.calls.lock().push("read_all".to_string());
        self.with_table(target, view, |table| table.clone())
    }

    async fn clear_range(&self, target: &str, view: &str, range: &str) -> SinkResult<()> {
        self.calls.lock().push("clear_range".to_string());
        let width = range_width(range);
        self.with_table(target, view, |table| {
            for row in table.iter_mut().skip(1) {
                for cell in row.iter_mut().take(width) {
                    *cell = Cell::Empty;
                }
            }
        })
    }

    async fn write_range(
        &self,
        target: &str,
        view: &str,
        range: &str,
        rows: &[Vec<Cell>],
    ) -> SinkResult<()> {
        self.calls.lock().push("write_range".to_string());
        let width = range_width(range);
        self.with_table(target, view, |table| {
            for (i, fresh) in rows.iter().enumerate() {
                if table.len() <= i + 1 {
                    table.resize(i + 2, Vec::new());
                }
                let row = &mut table[i + 1];
                if row.len() < width {
                    row.resize(width, Cell::Empty);
                }
                for (j, cell) in fresh.iter().take(width).enumerate() {
                    row[j] = cell.clone();
                }
            }
        })
    }
}
