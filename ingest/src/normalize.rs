use analysis::rates::{per_round_rates, StatTotals};
use analysis::GameType;

use crate::extract::{MapSection, MatchDocument, RawPlayerRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatColumn {
    Rating,
    Acs,
    KastPct,
    Adr,
    HsPct,
    Kills,
    Deaths,
    Assists,
    FirstKills,
    FirstDeaths,
}

// Scoreboard header spellings, lower-cased. Both the title-attribute long
// forms and the visible short forms occur, depending on the page variant.
// The scoreboard's own K/D and KDA columns have no canonical destination:
// the stored ratios are derived from the kill/death/assist totals instead.
pub static STAT_HEADERS: phf::Map<&'static str, StatColumn> = phf::phf_map! {
    "rating 2.0" => StatColumn::Rating,
    "rating" => StatColumn::Rating,
    "r2.0" => StatColumn::Rating,
    "r" => StatColumn::Rating,
    "acs" => StatColumn::Acs,
    "average combat score" => StatColumn::Acs,
    "kast" => StatColumn::KastPct,
    "adr" => StatColumn::Adr,
    "average damage per round" => StatColumn::Adr,
    "hs%" => StatColumn::HsPct,
    "headshot %" => StatColumn::HsPct,
    "k" => StatColumn::Kills,
    "kills" => StatColumn::Kills,
    "d" => StatColumn::Deaths,
    "deaths" => StatColumn::Deaths,
    "a" => StatColumn::Assists,
    "assists" => StatColumn::Assists,
    "fk" => StatColumn::FirstKills,
    "first kills" => StatColumn::FirstKills,
    "fd" => StatColumn::FirstDeaths,
    "first deaths" => StatColumn::FirstDeaths,
};

/// One fully resolved per-player, per-map record in the persisted column
/// order. Every derived field is filled in before a value of this type
/// exists, so partially resolved rows are unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
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
    pub game_type: GameType,
}

/// Flatten an extracted match into canonical rows, one per player per map
/// section, with rates and classification resolved.
pub fn canonical_rows(document: &MatchDocument, match_id: &str) -> Vec<CanonicalRow> {
    document
        .maps
        .iter()
        .flat_map(|map| {
            map.players
                .iter()
                .map(|player| canonical_row(document, map, player, match_id))
        })
        .collect()
}

fn canonical_row(
    document: &MatchDocument,
    map: &MapSection,
    player: &RawPlayerRow,
    match_id: &str,
) -> CanonicalRow {
    let mut rating_2_0 = None;
    let mut acs = None;
    let mut kast_pct = None;
    let mut adr = None;
    let mut hs_pct = None;
    let mut total_kills = None;
    let mut total_deaths = None;
    let mut total_assists = None;
    let mut total_first_kills = None;
    let mut total_first_deaths = None;

    for (header, value) in &player.stats {
        let column = match STAT_HEADERS.get(header.to_lowercase().as_str()) {
            Some(c) => c,
            None => continue,
        };
        match column {
            StatColumn::Rating => rating_2_0 = parse_float(value),
            StatColumn::Acs => acs = parse_float(value),
            StatColumn::KastPct => kast_pct = parse_float(value),
            StatColumn::Adr => adr = parse_float(value),
            StatColumn::HsPct => hs_pct = parse_float(value),
            StatColumn::Kills => total_kills = parse_int(value),
            StatColumn::Deaths => total_deaths = parse_int(value),
            StatColumn::Assists => total_assists = parse_int(value),
            StatColumn::FirstKills => total_first_kills = parse_int(value),
            StatColumn::FirstDeaths => total_first_deaths = parse_int(value),
        }
    }

    let rounds_played = map.rounds_played();
    let rates = per_round_rates(
        StatTotals {
            kills: total_kills.map(i64::from),
            deaths: total_deaths.map(i64::from),
            assists: total_assists.map(i64::from),
            first_kills: total_first_kills.map(i64::from),
            first_deaths: total_first_deaths.map(i64::from),
        },
        rounds_played.map(i64::from),
    );

    let game_type = analysis::classify::classify(
        document.bracket_stage.as_deref(),
        document.event_name.as_deref(),
    );

    CanonicalRow {
        event_id: document.event_id.clone(),
        event_name: document.event_name.clone(),
        bracket_stage: document.bracket_stage.clone(),
        match_id: match_id.to_string(),
        match_datetime: document.date,
        patch: document.patch.clone(),
        map_name: map.map_name.clone(),
        map_index: map.map_index,
        team1_name: Some(document.team1_name.clone()),
        team1_score: map.team1_score,
        team2_name: Some(document.team2_name.clone()),
        team2_score: map.team2_score,
        team1_attacker_rounds: map.team1_attacker_rounds,
        team1_defender_rounds: map.team1_defender_rounds,
        team2_attacker_rounds: map.team2_attacker_rounds,
        team2_defender_rounds: map.team2_defender_rounds,
        map_duration: map.map_duration.clone(),
        winner: map.winner.clone(),
        rounds_played,
        player_name: player.player_name.clone(),
        player_team: player.player_team.clone(),
        player_country: player.player_country.clone(),
        agent_played: player.agent.clone(),
        rating_2_0,
        acs,
        kd_ratio: rates.kd_ratio,
        kda_ratio: rates.kda_ratio,
        kast_pct,
        adr,
        kpr: rates.kpr,
        apr: rates.apr,
        fkpr: rates.fkpr,
        fdpr: rates.fdpr,
        hs_pct,
        total_kills,
        total_deaths,
        total_assists,
        total_first_kills,
        total_first_deaths,
        game_type,
    }
}

fn parse_float(value: &str) -> Option<f64> {
    value.trim().trim_end_matches('%').parse().ok()
}

fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}
