use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{IngestError, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations/");

/// Handle to the match-stats database. All writes go through [`Store::upsert`],
/// which replaces on the (match_id, map_name, player_name) key, so re-ingesting
/// a match is a no-op apart from refreshing the stored values.
pub struct Store {
    connection: diesel::sqlite::SqliteConnection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub rows: i64,
    pub matches: i64,
    pub events: i64,
}

impl Store {
    pub fn open(database_url: &str) -> Result<Self> {
        let connection = diesel::sqlite::SqliteConnection::establish(database_url)?;
        Ok(Self { connection })
    }

    pub fn migrate(&mut self) -> Result<()> {
        self.connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| IngestError::Migration(e.to_string()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self, row), fields(match_id = %row.match_id, map = %row.map_name, player = %row.player_name))]
    pub fn upsert(&mut self, row: crate::models::MapStatRow) -> Result<()> {
        let query = diesel::replace_into(crate::schema::map_stats::dsl::map_stats).values(row);

        query.execute(&mut self.connection)?;

        Ok(())
    }

    pub fn summary(&mut self) -> Result<StoreSummary> {
        use crate::schema::map_stats::dsl;

        let rows: i64 = dsl::map_stats
            .select(diesel::dsl::count_star())
            .first(&mut self.connection)?;

        let matches: Vec<String> = dsl::map_stats
            .select(dsl::match_id)
            .distinct()
            .load(&mut self.connection)?;

        let events: Vec<Option<String>> = dsl::map_stats
            .select(dsl::event_id)
            .distinct()
            .load(&mut self.connection)?;

        Ok(StoreSummary {
            rows,
            matches: matches.len() as i64,
            events: events.iter().filter(|e| e.is_some()).count() as i64,
        })
    }

    /// Per-class row counts over the whole table, for the distribution audit.
    pub fn game_type_distribution(&mut self) -> Result<analysis::audit::Distribution> {
        use crate::schema::map_stats::dsl;

        let counts: Vec<(String, i64)> = dsl::map_stats
            .group_by(dsl::game_type)
            .select((dsl::game_type, diesel::dsl::count_star()))
            .load(&mut self.connection)?;

        let mut dist = analysis::audit::Distribution::default();
        for (name, count) in counts {
            match analysis::GameType::from_str(&name) {
                Some(analysis::GameType::Playoffs) => dist.playoffs += count as u64,
                Some(analysis::GameType::RegularSeason) => dist.regular += count as u64,
                Some(analysis::GameType::Excluded) => dist.excluded += count as u64,
                None => {
                    tracing::warn!("Unrecognized game_type in store: {:?}", name);
                }
            }
        }

        Ok(dist)
    }

    pub fn contains_match(&mut self, match_id: &str) -> Result<bool> {
        use crate::schema::map_stats::dsl;

        let count: i64 = dsl::map_stats
            .filter(dsl::match_id.eq(match_id))
            .select(diesel::dsl::count_star())
            .first(&mut self.connection)?;

        Ok(count > 0)
    }

    pub fn rows_for_match(&mut self, match_id: &str) -> Result<Vec<crate::models::MapStatRow>> {
        use crate::schema::map_stats::dsl;

        let rows = dsl::map_stats
            .filter(dsl::match_id.eq(match_id))
            .order((dsl::map_index.asc(), dsl::player_name.asc()))
            .select(crate::models::MapStatRow::as_select())
            .load(&mut self.connection)?;

        Ok(rows)
    }
}
