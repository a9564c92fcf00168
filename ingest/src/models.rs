use diesel::prelude::*;

use crate::normalize::CanonicalRow;

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::map_stats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MapStatRow {
    pub event_id: Option<String>,
    pub event_name: Option<String>,
    pub bracket_stage: Option<String>,
    pub match_id: String,
    pub match_datetime: Option<chrono::NaiveDateTime>,
    pub patch: Option<String>,
    pub map_name: String,
    pub map_index: i32,
    pub team1_name: Option<String>,
    pub team1_score: Option<i32>,
    pub team2_name: Option<String>,
    pub team2_score: Option<i32>,
    pub team1_attacker_rounds: Option<i32>,
    pub team1_defender_rounds: Option<i32>,
    pub team2_attacker_rounds: Option<i32>,
    pub team2_defender_rounds: Option<i32>,
    pub map_duration: Option<String>,
    pub winner: Option<String>,
    pub rounds_played: Option<i32>,
    pub player_name: String,
    pub player_team: String,
    pub player_country: String,
    pub agent_played: String,
    pub rating_2_0: Option<f64>,
    pub acs: Option<f64>,
    pub kd_ratio: Option<f64>,
    pub kda_ratio: Option<f64>,
    pub kast_pct: Option<f64>,
    pub adr: Option<f64>,
    pub kpr: Option<f64>,
    pub apr: Option<f64>,
    pub fkpr: Option<f64>,
    pub fdpr: Option<f64>,
    pub hs_pct: Option<f64>,
    pub total_kills: Option<i32>,
    pub total_deaths: Option<i32>,
    pub total_assists: Option<i32>,
    pub total_first_kills: Option<i32>,
    pub total_first_deaths: Option<i32>,
    pub game_type: String,
}

impl From<CanonicalRow> for MapStatRow {
    fn from(row: CanonicalRow) -> Self {
        Self {
            event_id: row.event_id,
            event_name: row.event_name,
            bracket_stage: row.bracket_stage,
            match_id: row.match_id,
            match_datetime: row.match_datetime,
            patch: row.patch,
            map_name: row.map_name,
            map_index: row.map_index,
            team1_name: row.team1_name,
            team1_score: row.team1_score,
            team2_name: row.team2_name,
            team2_score: row.team2_score,
            team1_attacker_rounds: row.team1_attacker_rounds,
            team1_defender_rounds: row.team1_defender_rounds,
            team2_attacker_rounds: row.team2_attacker_rounds,
            team2_defender_rounds: row.team2_defender_rounds,
            map_duration: row.map_duration,
            winner: row.winner,
            rounds_played: row.rounds_played,
            player_name: row.player_name,
            player_team: row.player_team,
            player_country: row.player_country,
            agent_played: row.agent_played,
            rating_2_0: row.rating_2_0,
            acs: row.acs,
            kd_ratio: row.kd_ratio,
            kda_ratio: row.kda_ratio,
            kast_pct: row.kast_pct,
            adr: row.adr,
            kpr: row.kpr,
            apr: row.apr,
            fkpr: row.fkpr,
            fdpr: row.fdpr,
            hs_pct: row.hs_pct,
            total_kills: row.total_kills,
            total_deaths: row.total_deaths,
            total_assists: row.total_assists,
            total_first_kills: row.total_first_kills,
            total_first_deaths: row.total_first_deaths,
            game_type: row.game_type.as_str().to_string(),
        }
    }
}
