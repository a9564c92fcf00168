use analysis::GameType;
use ingest::extract::{AggregationLevel, MapSection, MatchDocument, RawPlayerRow};
use ingest::normalize::{canonical_rows, CanonicalRow};
use pretty_assertions::assert_eq;

fn fixture() -> String {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../testfiles/match.html");
    std::fs::read_to_string(path).unwrap()
}

fn synthetic_document(maps: Vec<MapSection>) -> MatchDocument {
    MatchDocument {
        event_id: Some("9001".to_string()),
        event_name: Some("Challengers League: North".to_string()),
        bracket_stage: Some("Week 3".to_string()),
        date: None,
        patch: None,
        team1_name: "Alpha".to_string(),
        team1_score: Some(2),
        team2_name: "Beta".to_string(),
        team2_score: Some(1),
        maps,
    }
}

fn synthetic_map(players: Vec<RawPlayerRow>) -> MapSection {
    MapSection {
        level: AggregationLevel::SingleMap,
        map_name: "Ascent".to_string(),
        map_index: 1,
        team1_score: Some(13),
        team2_score: Some(7),
        team1_attacker_rounds: Some(7),
        team1_defender_rounds: Some(6),
        team2_attacker_rounds: Some(3),
        team2_defender_rounds: Some(4),
        map_duration: Some("41:18".to_string()),
        winner: Some("Alpha".to_string()),
        players,
    }
}

fn player(stats: Vec<(&str, &str)>) -> RawPlayerRow {
    RawPlayerRow {
        player_name: "TestPlayer".to_string(),
        player_team: "ALPHA".to_string(),
        player_country: "Sweden".to_string(),
        agent: "jett".to_string(),
        stats: stats
            .into_iter()
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect(),
    }
}

fn row<'a>(rows: &'a [CanonicalRow], map: &str, name: &str) -> &'a CanonicalRow {
    rows.iter()
        .find(|r| r.map_name == map && r.player_name == name)
        .unwrap()
}

#[test]
fn parsed_document_flattens_to_one_row_per_player_per_section() {
    let doc = ingest::extract::parse_match(&fixture()).unwrap();
    let rows = canonical_rows(&doc, "353177");

    assert_eq!(12, rows.len());
    assert!(rows.iter().all(|r| r.match_id == "353177"));
    assert!(rows.iter().all(|r| r.game_type == GameType::Playoffs));
}

#[test]
fn canonical_row_carries_match_and_map_context() {
    let doc = ingest::extract::parse_match(&fixture()).unwrap();
    let rows = canonical_rows(&doc, "353177");

    let one = row(&rows, "Ascent", "PlayerOne");
    assert_eq!(Some("2097".to_string()), one.event_id);
    assert_eq!(
        Some("Champions Tour 2024: Americas Stage 2".to_string()),
        one.event_name
    );
    assert_eq!(Some("Playoffs: Grand Final".to_string()), one.bracket_stage);
    assert_eq!(
        Some(
            chrono::NaiveDate::from_ymd_opt(2024, 7, 21)
                .unwrap()
                .and_hms_opt(21, 0, 0)
                .unwrap()
        ),
        one.match_datetime
    );
    assert_eq!(Some("8.11".to_string()), one.patch);
    assert_eq!(1, one.map_index);
    assert_eq!(Some("Team Alpha".to_string()), one.team1_name);
    assert_eq!(Some(13), one.team1_score);
    assert_eq!(Some("Team Beta".to_string()), one.team2_name);
    assert_eq!(Some(7), one.team2_score);
    assert_eq!(Some(7), one.team1_attacker_rounds);
    assert_eq!(Some(6), one.team1_defender_rounds);
    assert_eq!(Some(3), one.team2_attacker_rounds);
    assert_eq!(Some(4), one.team2_defender_rounds);
    assert_eq!(Some("41:18".to_string()), one.map_duration);
    assert_eq!(Some("Team Alpha".to_string()), one.winner);
    assert_eq!(Some(20), one.rounds_played);
    assert_eq!("ALPHA", one.player_team);
    assert_eq!("United States", one.player_country);
    assert_eq!("jett", one.agent_played);
}

#[test]
fn scoreboard_stats_parse_with_percent_signs_stripped() {
    let doc = ingest::extract::parse_match(&fixture()).unwrap();
    let rows = canonical_rows(&doc, "353177");

    let one = row(&rows, "Ascent", "PlayerOne");
    assert_eq!(Some(1.24), one.rating_2_0);
    assert_eq!(Some(255.0), one.acs);
    assert_eq!(Some(72.0), one.kast_pct);
    assert_eq!(Some(160.4), one.adr);
    assert_eq!(Some(28.0), one.hs_pct);
    assert_eq!(Some(17), one.total_kills);
    assert_eq!(Some(12), one.total_deaths);
    assert_eq!(Some(5), one.total_assists);
    assert_eq!(Some(3), one.total_first_kills);
    assert_eq!(Some(1), one.total_first_deaths);
}

#[test]
fn rates_derive_from_totals_and_round_counts() {
    let doc = ingest::extract::parse_match(&fixture()).unwrap();
    let rows = canonical_rows(&doc, "353177");

    let one = row(&rows, "Ascent", "PlayerOne");
    assert_eq!(Some(0.85), one.kpr);
    assert_eq!(Some(0.25), one.apr);
    assert_eq!(Some(0.15), one.fkpr);
    assert_eq!(Some(0.05), one.fdpr);
    assert_eq!(Some(1.417), one.kd_ratio);
    assert_eq!(Some(1.833), one.kda_ratio);
}

#[test]
fn aggregate_rows_rate_against_the_match_score_sum() {
    let doc = ingest::extract::parse_match(&fixture()).unwrap();
    let rows = canonical_rows(&doc, "353177");

    // The aggregate section carries the match-level 2:0, so its round count
    // is 2 and the per-round rates scale accordingly.
    let one = row(&rows, "All Maps", "PlayerOne");
    assert_eq!(0, one.map_index);
    assert_eq!(Some(2), one.rounds_played);
    assert_eq!(Some(15.0), one.kpr);
    assert_eq!(Some(5.5), one.apr);
    assert_eq!(Some(1.2), one.kd_ratio);
    assert_eq!(Some(1.64), one.kda_ratio);
}

#[test]
fn blank_cells_normalize_to_null() {
    let doc = ingest::extract::parse_match(&fixture()).unwrap();
    let rows = canonical_rows(&doc, "353177");

    let beta_two = row(&rows, "All Maps", "BetaTwo");
    assert_eq!(None, beta_two.adr);
    assert_eq!(Some(20), beta_two.total_kills);
    assert_eq!(Some(28), beta_two.total_deaths);
    assert_eq!(Some(0.714), beta_two.kd_ratio);
    assert_eq!(Some(1.071), beta_two.kda_ratio);
}

#[test]
fn derived_ratios_supersede_scoreboard_claims() {
    let map = synthetic_map(vec![player(vec![
        ("Kills", "10"),
        ("Deaths", "5"),
        ("Assists", "5"),
        ("K/D", "0.50"),
        ("KDA", "0.75"),
    ])]);
    let doc = synthetic_document(vec![map]);

    let rows = canonical_rows(&doc, "42");
    assert_eq!(Some(2.0), rows[0].kd_ratio);
    assert_eq!(Some(3.0), rows[0].kda_ratio);
}

#[test]
fn unknown_headers_are_dropped() {
    let map = synthetic_map(vec![player(vec![
        ("Multi Kills", "4"),
        ("Clutches", "1"),
    ])]);
    let doc = synthetic_document(vec![map]);

    let rows = canonical_rows(&doc, "42");
    let r = &rows[0];
    assert_eq!(None, r.rating_2_0);
    assert_eq!(None, r.acs);
    assert_eq!(None, r.total_kills);
    // Missing totals still rate as zero once a round count exists.
    assert_eq!(Some(0.0), r.kpr);
    assert_eq!(None, r.kd_ratio);
}

#[test]
fn short_header_spellings_resolve_too() {
    let map = synthetic_map(vec![player(vec![
        ("R2.0", "1.10"),
        ("ACS", "231"),
        ("K", "15"),
        ("D", "10"),
        ("A", "4"),
        ("KAST", "71%"),
        ("ADR", "148.9"),
        ("HS%", "24%"),
        ("FK", "2"),
        ("FD", "1"),
    ])]);
    let doc = synthetic_document(vec![map]);

    let rows = canonical_rows(&doc, "42");
    let r = &rows[0];
    assert_eq!(Some(1.10), r.rating_2_0);
    assert_eq!(Some(231.0), r.acs);
    assert_eq!(Some(15), r.total_kills);
    assert_eq!(Some(10), r.total_deaths);
    assert_eq!(Some(4), r.total_assists);
    assert_eq!(Some(71.0), r.kast_pct);
    assert_eq!(Some(148.9), r.adr);
    assert_eq!(Some(24.0), r.hs_pct);
    assert_eq!(Some(2), r.total_first_kills);
    assert_eq!(Some(1), r.total_first_deaths);
    assert_eq!(Some(1.5), r.kd_ratio);
}

#[test]
fn missing_round_counts_leave_every_rate_null() {
    let mut map = synthetic_map(vec![player(vec![("Kills", "15"), ("Deaths", "10")])]);
    map.team2_score = None;
    let doc = synthetic_document(vec![map]);

    let rows = canonical_rows(&doc, "42");
    let r = &rows[0];
    assert_eq!(None, r.rounds_played);
    assert_eq!(None, r.kpr);
    assert_eq!(None, r.apr);
    assert_eq!(None, r.fkpr);
    assert_eq!(None, r.fdpr);
    assert_eq!(None, r.kd_ratio);
    assert_eq!(None, r.kda_ratio);
}

#[test]
fn ambiguous_stage_classifies_as_regular_season() {
    let mut doc = synthetic_document(vec![synthetic_map(vec![player(vec![])])]);
    doc.bracket_stage = None;
    doc.event_name = None;

    let rows = canonical_rows(&doc, "42");
    assert_eq!(GameType::RegularSeason, rows[0].game_type);
}
