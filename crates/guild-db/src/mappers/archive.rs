//! ArchiveRecord entity -> column arrays

use guild_core::entities::ArchiveRecord;

/// Column arrays for appending archive records
#[derive(Debug, Default)]
pub struct ArchiveColumns {
    pub player_ids: Vec<String>,
    pub nicknames: Vec<String>,
    pub total_gp: Vec<i64>,
    pub guild_ids: Vec<Option<String>>,
}

impl ArchiveColumns {
    pub fn new(records: &[ArchiveRecord]) -> Self {
        let mut columns = Self::default();
        for record in records {
            columns.push(record);
        }
        columns
    }

    fn push(&mut self, record: &ArchiveRecord) {
        self.player_ids.push(record.member_id().as_str().to_owned());
        self.nicknames.push(record.display_name().to_owned());
        self.total_gp.push(record.galactic_power());
        self.guild_ids
            .push(record.former_guild_id().map(|id| id.as_str().to_owned()));
    }
}
