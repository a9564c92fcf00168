use ingest::models::MapStatRow;
use ingest::store::{Store, StoreSummary};
use pretty_assertions::assert_eq;

fn open_store() -> Store {
    let mut store = Store::open(":memory:").unwrap();
    store.migrate().unwrap();
    store
}

fn sample_row(match_id: &str, map_name: &str, player_name: &str) -> MapStatRow {
    MapStatRow {
        event_id: Some("2097".to_string()),
        event_name: Some("Champions Tour 2024: Americas Stage 2".to_string()),
        bracket_stage: Some("Playoffs: Grand Final".to_string()),
        match_id: match_id.to_string(),
        match_datetime: chrono::NaiveDate::from_ymd_opt(2024, 7, 21)
            .and_then(|d| d.and_hms_opt(21, 0, 0)),
        patch: Some("8.11".to_string()),
        map_name: map_name.to_string(),
        map_index: 1,
        team1_name: Some("Team Alpha".to_string()),
        team1_score: Some(13),
        team2_name: Some("Team Beta".to_string()),
        team2_score: Some(7),
        team1_attacker_rounds: Some(7),
        team1_defender_rounds: Some(6),
        team2_attacker_rounds: Some(3),
        team2_defender_rounds: Some(4),
        map_duration: Some("41:18".to_string()),
        winner: Some("Team Alpha".to_string()),
        rounds_played: Some(20),
        player_name: player_name.to_string(),
        player_team: "ALPHA".to_string(),
        player_country: "United States".to_string(),
        agent_played: "jett".to_string(),
        rating_2_0: Some(1.24),
        acs: Some(255.0),
        kd_ratio: Some(1.417),
        kda_ratio: Some(1.833),
        kast_pct: Some(72.0),
        adr: Some(160.4),
        kpr: Some(0.85),
        apr: Some(0.25),
        fkpr: Some(0.15),
        fdpr: Some(0.05),
        hs_pct: Some(28.0),
        total_kills: Some(17),
        total_deaths: Some(12),
        total_assists: Some(5),
        total_first_kills: Some(3),
        total_first_deaths: Some(1),
        game_type: "Playoffs".to_string(),
    }
}

#[test]
fn fresh_database_starts_empty() {
    let mut store = open_store();

    assert_eq!(
        StoreSummary {
            rows: 0,
            matches: 0,
            events: 0,
        },
        store.summary().unwrap()
    );
    assert!(!store.contains_match("353177").unwrap());
}

#[test]
fn upsert_replaces_on_the_player_map_key() {
    let mut store = open_store();

    store
        .upsert(sample_row("353177", "Ascent", "PlayerOne"))
        .unwrap();

    let mut updated = sample_row("353177", "Ascent", "PlayerOne");
    updated.acs = Some(240.0);
    updated.total_kills = Some(16);
    store.upsert(updated.clone()).unwrap();

    let rows = store.rows_for_match("353177").unwrap();
    assert_eq!(vec![updated], rows);
    assert_eq!(1, store.summary().unwrap().rows);
}

#[test]
fn aggregate_and_per_map_rows_coexist() {
    let mut store = open_store();

    let mut aggregate = sample_row("353177", "All Maps", "PlayerOne");
    aggregate.map_index = 0;
    store.upsert(aggregate).unwrap();
    store
        .upsert(sample_row("353177", "Ascent", "PlayerOne"))
        .unwrap();

    let rows = store.rows_for_match("353177").unwrap();
    assert_eq!(2, rows.len());
    assert_eq!("All Maps", rows[0].map_name);
    assert_eq!("Ascent", rows[1].map_name);
}

#[test]
fn summary_counts_distinct_matches_and_events() {
    let mut store = open_store();

    store
        .upsert(sample_row("353177", "Ascent", "PlayerOne"))
        .unwrap();
    store
        .upsert(sample_row("353177", "Ascent", "PlayerTwo"))
        .unwrap();

    let mut other = sample_row("400001", "Bind", "PlayerOne");
    other.event_id = None;
    store.upsert(other).unwrap();

    assert_eq!(
        StoreSummary {
            rows: 3,
            matches: 2,
            events: 1,
        },
        store.summary().unwrap()
    );
}

#[test]
fn distribution_reflects_stored_game_types() {
    let mut store = open_store();

    store
        .upsert(sample_row("353177", "Ascent", "PlayerOne"))
        .unwrap();

    let mut regular = sample_row("353178", "Bind", "PlayerOne");
    regular.game_type = "Regular Season".to_string();
    store.upsert(regular).unwrap();

    let mut regular_two = sample_row("353178", "Bind", "PlayerTwo");
    regular_two.game_type = "Regular Season".to_string();
    store.upsert(regular_two).unwrap();

    let mut excluded = sample_row("353179", "Haven", "PlayerOne");
    excluded.game_type = "Excluded".to_string();
    store.upsert(excluded).unwrap();

    let dist = store.game_type_distribution().unwrap();
    assert_eq!(1, dist.playoffs);
    assert_eq!(2, dist.regular);
    assert_eq!(1, dist.excluded);
}

#[test]
fn rows_for_match_order_by_map_then_player() {
    let mut store = open_store();

    let mut haven = sample_row("353177", "Haven", "BetaOne");
    haven.map_index = 2;
    store.upsert(haven).unwrap();
    store
        .upsert(sample_row("353177", "Ascent", "PlayerTwo"))
        .unwrap();
    store
        .upsert(sample_row("353177", "Ascent", "PlayerOne"))
        .unwrap();
    let mut aggregate = sample_row("353177", "All Maps", "PlayerOne");
    aggregate.map_index = 0;
    store.upsert(aggregate).unwrap();

    let rows = store.rows_for_match("353177").unwrap();
    let order: Vec<(i32, &str)> = rows
        .iter()
        .map(|r| (r.map_index, r.player_name.as_str()))
        .collect();
    assert_eq!(
        vec![
            (0, "PlayerOne"),
            (1, "PlayerOne"),
            (1, "PlayerTwo"),
            (2, "BetaOne"),
        ],
        order
    );
}

#[test]
fn parsed_rows_survive_a_round_trip() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../testfiles/match.html");
    let html = std::fs::read_to_string(path).unwrap();
    let document = ingest::extract::parse_match(&html).unwrap();

    let mut store = open_store();
    for row in ingest::normalize::canonical_rows(&document, "353177") {
        store.upsert(row.into()).unwrap();
    }

    assert_eq!(
        StoreSummary {
            rows: 12,
            matches: 1,
            events: 1,
        },
        store.summary().unwrap()
    );
    assert!(store.contains_match("353177").unwrap());
    assert_eq!(12, store.game_type_distribution().unwrap().playoffs);

    let rows = store.rows_for_match("353177").unwrap();
    assert_eq!("All Maps", rows[0].map_name);
    assert_eq!(Some(2), rows[0].rounds_played);
}
