use scraper::{CaseSensitivity, ElementRef, Html, Selector};

use crate::error::{IngestError, Result};

/// Distinguishes the synthetic aggregate section from a single played map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationLevel {
    AllMaps,
    SingleMap,
}

pub const ALL_MAPS_NAME: &str = "All Maps";

#[derive(Debug, Clone, PartialEq)]
pub struct MatchDocument {
    pub event_id: Option<String>,
    pub event_name: Option<String>,
    pub bracket_stage: Option<String>,
    pub date: Option<chrono::NaiveDateTime>,
    pub patch: Option<String>,
    pub team1_name: String,
    pub team1_score: Option<i32>,
    pub team2_name: String,
    pub team2_score: Option<i32>,
    pub maps: Vec<MapSection>,
}

impl MatchDocument {
    pub fn winner(&self) -> Option<&str> {
        winner_name(
            (&self.team1_name, self.team1_score),
            (&self.team2_name, self.team2_score),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSection {
    pub level: AggregationLevel,
    pub map_name: String,
    pub map_index: i32,
    pub team1_score: Option<i32>,
    pub team2_score: Option<i32>,
    pub team1_attacker_rounds: Option<i32>,
    pub team1_defender_rounds: Option<i32>,
    pub team2_attacker_rounds: Option<i32>,
    pub team2_defender_rounds: Option<i32>,
    pub map_duration: Option<String>,
    pub winner: Option<String>,
    pub players: Vec<RawPlayerRow>,
}

impl MapSection {
    /// Total rounds on this map, only when both team scores parsed.
    pub fn rounds_played(&self) -> Option<i32> {
        Some(self.team1_score? + self.team2_score?)
    }
}

/// One scoreboard row as it appears on the page: typed identity plus the
/// raw (header, cell) stat pairs in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlayerRow {
    pub player_name: String,
    pub player_team: String,
    pub player_country: String,
    pub agent: String,
    pub stats: Vec<(String, String)>,
}

fn selector(source: &'static str) -> Result<Selector> {
    Selector::parse(source).map_err(|_| IngestError::Structure { context: source })
}

fn first_text(element: &ElementRef, sel: &Selector) -> Option<String> {
    element
        .select(sel)
        .next()
        .and_then(|e| e.text().next())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn collapsed_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn winner_name<'a>(
    team1: (&'a str, Option<i32>),
    team2: (&'a str, Option<i32>),
) -> Option<&'a str> {
    match (team1.1, team2.1) {
        (Some(a), Some(b)) if a > b => Some(team1.0),
        (Some(a), Some(b)) if b > a => Some(team2.0),
        _ => None,
    }
}

/// A cell that only carries a separator placeholder holds no value.
fn is_lone_separator(text: &str) -> bool {
    matches!(text, "/" | "-" | "\u{2013}" | "\u{2014}")
}

#[tracing::instrument(skip(html))]
pub fn parse_match(html: &str) -> Result<MatchDocument> {
    let document = Html::parse_document(html);

    let header_selector = selector("div.match-header")?;
    let header = document
        .select(&header_selector)
        .next()
        .ok_or(IngestError::Structure {
            context: "match header (div.match-header)",
        })?;

    let event_link_selector = selector("div.match-header-super a.match-header-event")?;
    let event_href = header
        .select(&event_link_selector)
        .next()
        .and_then(|e| e.value().attr("href"));
    let event_id = event_href.and_then(|href| {
        href.strip_prefix("/event/")
            .and_then(|rest| rest.split('/').next())
            .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
    });

    let event_name_selector =
        selector("div.match-header-super a.match-header-event div div:first-child")?;
    let event_name = header
        .select(&event_name_selector)
        .next()
        .map(|e| collapsed_text(&e))
        .filter(|t| !t.is_empty());

    let stage_selector =
        selector("div.match-header-super a.match-header-event div div.match-header-event-series")?;
    let bracket_stage = header
        .select(&stage_selector)
        .next()
        .map(|e| collapsed_text(&e))
        .filter(|t| !t.is_empty());

    let date_selector = selector("div.match-header-super div.match-header-date div.moment-tz-convert")?;
    let date = header
        .select(&date_selector)
        .next()
        .and_then(|e| e.value().attr("data-utc-ts"))
        .and_then(|ts| chrono::NaiveDateTime::parse_from_str(ts.trim(), "%Y-%m-%d %H:%M:%S").ok());

    let date_child_selector = selector("div.match-header-super div.match-header-date > div")?;
    let patch = header
        .select(&date_child_selector)
        .map(|e| collapsed_text(&e))
        .find(|t| t.starts_with("Patch "))
        .map(|t| t.trim_start_matches("Patch ").trim().to_string())
        .filter(|t| !t.is_empty());

    let team_name_selector = selector("div.match-header-vs a.match-header-link div.wf-title-med")?;
    let mut team_names = header
        .select(&team_name_selector)
        .map(|e| collapsed_text(&e))
        .filter(|t| !t.is_empty());
    let team1_name = team_names.next().ok_or(IngestError::Structure {
        context: "first team name (div.wf-title-med)",
    })?;
    let team2_name = team_names.next().ok_or(IngestError::Structure {
        context: "second team name (div.wf-title-med)",
    })?;

    let score_selector = selector("div.match-header-vs-score span")?;
    let mut match_scores = header
        .select(&score_selector)
        .filter_map(|e| e.text().next())
        .filter_map(|t| t.trim().parse::<i32>().ok());
    let team1_score = match_scores.next();
    let team2_score = match_scores.next();

    let maps = parse_map_sections(&document, (&team1_name, team1_score), (&team2_name, team2_score))?;

    if maps.iter().all(|m| m.players.is_empty()) {
        return Err(IngestError::EmptyResult);
    }

    tracing::debug!(
        maps = maps.len(),
        rows = maps.iter().map(|m| m.players.len()).sum::<usize>(),
        "parsed match document"
    );

    Ok(MatchDocument {
        event_id,
        event_name,
        bracket_stage,
        date,
        patch,
        team1_name,
        team1_score,
        team2_name,
        team2_score,
        maps,
    })
}

fn parse_map_sections(
    document: &Html,
    team1: (&str, Option<i32>),
    team2: (&str, Option<i32>),
) -> Result<Vec<MapSection>> {
    let section_selector = selector("div.vm-stats-game")?;

    let mut maps = Vec::new();
    let mut map_index = 0;
    for section in document.select(&section_selector) {
        let is_aggregate = section.value().attr("data-game-id") == Some("all");

        let players = parse_stat_tables(&section)?;

        if is_aggregate {
            // The aggregate section carries the match-level scores and no
            // side splits or duration.
            maps.insert(
                0,
                MapSection {
                    level: AggregationLevel::AllMaps,
                    map_name: ALL_MAPS_NAME.to_string(),
                    map_index: 0,
                    team1_score: team1.1,
                    team2_score: team2.1,
                    team1_attacker_rounds: None,
                    team1_defender_rounds: None,
                    team2_attacker_rounds: None,
                    team2_defender_rounds: None,
                    map_duration: None,
                    winner: winner_name((team1.0, team1.1), (team2.0, team2.1))
                        .map(str::to_string),
                    players,
                },
            );
            continue;
        }

        map_index += 1;
        maps.push(parse_single_map(&section, map_index, team1.0, team2.0, players)?);
    }

    Ok(maps)
}

fn parse_stat_tables(section: &ElementRef) -> Result<Vec<RawPlayerRow>> {
    let table_selector = selector("table.mod-overview")?;
    let header_selector = selector("thead th")?;
    let row_selector = selector("tbody tr")?;
    let cell_selector = selector("td")?;

    let mut players = Vec::new();
    for table in section.select(&table_selector) {
        let headers: Vec<String> = table
            .select(&header_selector)
            .map(|th| {
                let label = th
                    .value()
                    .attr("title")
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| collapsed_text(&th));
                normalize_header(label)
            })
            .collect();

        for row in table.select(&row_selector) {
            players.push(parse_player_row(&row, &headers, &cell_selector)?);
        }
    }

    Ok(players)
}

fn parse_single_map(
    section: &ElementRef,
    map_index: i32,
    team1_name: &str,
    team2_name: &str,
    players: Vec<RawPlayerRow>,
) -> Result<MapSection> {
    let map_name_selector = selector("div.vm-stats-game-header div.map div:first-child span")?;
    let map_name = section
        .select(&map_name_selector)
        .next()
        .and_then(|e| e.text().next())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Map {}", map_index));

    let team_selector = selector("div.vm-stats-game-header div.team")?;
    let score_selector = selector("div.score")?;
    let attacker_selector = selector("span.mod-t")?;
    let defender_selector = selector("span.mod-ct")?;

    fn side(team: Option<&ElementRef<'_>>, sel: &Selector) -> Option<i32> {
        team.and_then(|t| first_text(t, sel))
            .and_then(|t| t.parse().ok())
    }

    let teams: Vec<ElementRef> = section.select(&team_selector).collect();
    let team1_score = side(teams.first(), &score_selector);
    let team2_score = side(teams.get(1), &score_selector);
    let team1_attacker_rounds = side(teams.first(), &attacker_selector);
    let team1_defender_rounds = side(teams.first(), &defender_selector);
    let team2_attacker_rounds = side(teams.get(1), &attacker_selector);
    let team2_defender_rounds = side(teams.get(1), &defender_selector);

    let duration_selector = selector("div.vm-stats-game-header div.map-duration")?;
    let map_duration = section
        .select(&duration_selector)
        .next()
        .map(|e| collapsed_text(&e))
        .filter(|t| !t.is_empty() && !is_lone_separator(t));

    let winner = winner_name((team1_name, team1_score), (team2_name, team2_score))
        .map(str::to_string);

    Ok(MapSection {
        level: AggregationLevel::SingleMap,
        map_name,
        map_index,
        team1_score,
        team2_score,
        team1_attacker_rounds,
        team1_defender_rounds,
        team2_attacker_rounds,
        team2_defender_rounds,
        map_duration,
        winner,
        players,
    })
}

/// The KAST column header spells out the full metric name in its title.
fn normalize_header(label: String) -> String {
    if label.to_lowercase().starts_with("kill, assist, trade, survive") {
        "KAST".to_string()
    } else {
        label
    }
}

fn parse_player_row(row: &ElementRef, headers: &[String], cell_selector: &Selector) -> Result<RawPlayerRow> {
    let name_selector = selector("div.text-of")?;
    let name_fallback_selector = selector("a div:first-child")?;
    let team_tag_selector = selector("div.ge-text-light")?;
    let flag_selector = selector("i.flag")?;
    let agent_selector = selector("td.mod-agents img")?;
    let both_sides_selector = selector("span.side.mod-both")?;

    let mut player_name = None;
    let mut player_team = None;
    let mut player_country = None;
    let mut stats = Vec::new();

    for (index, cell) in row.select(cell_selector).enumerate() {
        if cell
            .value()
            .has_class("mod-player", CaseSensitivity::CaseSensitive)
        {
            player_name = first_text(&cell, &name_selector)
                .or_else(|| first_text(&cell, &name_fallback_selector));
            player_team = first_text(&cell, &team_tag_selector);
            player_country = cell
                .select(&flag_selector)
                .next()
                .and_then(|e| e.value().attr("title"))
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
            continue;
        }
        if cell
            .value()
            .has_class("mod-agents", CaseSensitivity::CaseSensitive)
        {
            continue;
        }

        let header = match headers.get(index) {
            Some(h) if !h.is_empty() => h.clone(),
            _ => continue,
        };
        stats.push((header, stat_cell_value(&cell, &both_sides_selector)));
    }

    let agent = row.select(&agent_selector).next().and_then(|img| {
        img.value()
            .attr("alt")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| img.value().attr("title").map(str::trim).filter(|t| !t.is_empty()))
    });

    let mut parsed = RawPlayerRow {
        player_name: player_name.unwrap_or_else(|| "Unknown".to_string()),
        player_team: player_team.unwrap_or_else(|| "Unknown".to_string()),
        player_country: player_country.unwrap_or_else(|| "Unknown".to_string()),
        agent: agent.map(str::to_string).unwrap_or_else(|| "Unknown".to_string()),
        stats,
    };
    recompute_kill_death_diff(&mut parsed);

    Ok(parsed)
}

/// Prefer the combined both-sides value; fall back to the raw cell text.
fn stat_cell_value(cell: &ElementRef, both_sides_selector: &Selector) -> String {
    let value = cell
        .select(both_sides_selector)
        .next()
        .and_then(|e| e.text().next())
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| cell.text().collect::<String>().trim().to_string());

    if is_lone_separator(&value) {
        String::new()
    } else {
        value
    }
}

fn is_kill_death_diff_header(header: &str) -> bool {
    matches!(
        header.to_lowercase().as_str(),
        "+/-" | "+/\u{2013}" | "k-d" | "kd" | "kills - deaths"
    )
}

/// The source formats the K-D column inconsistently; rebuild it from the
/// parsed kill and death totals instead.
fn recompute_kill_death_diff(row: &mut RawPlayerRow) {
    let int_stat = |names: [&str; 2]| -> Option<i64> {
        row.stats
            .iter()
            .find(|(header, _)| {
                let lowered = header.to_lowercase();
                names.contains(&lowered.as_str())
            })
            .and_then(|(_, value)| value.parse().ok())
    };

    let kills = int_stat(["k", "kills"]);
    let deaths = int_stat(["d", "deaths"]);
    let (kills, deaths) = match (kills, deaths) {
        (Some(k), Some(d)) => (k, d),
        _ => return,
    };

    let diff = kills - deaths;
    let display = if diff > 0 {
        format!("+{}", diff)
    } else {
        diff.to_string()
    };

    for (header, value) in row.stats.iter_mut() {
        if is_kill_death_diff_header(header) {
            *value = display.clone();
            break;
        }
    }
}

/// First all-numeric path segment of a match URL, the site's match id.
pub fn match_id_from_url(url: &str) -> Option<String> {
    url.split('/')
        .find(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

/// Match links on a results listing page, relative hrefs in document order.
pub fn result_links(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let link_selector = selector("a.match-item")?;

    let links = document
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| {
            let mut segments = href.strip_prefix('/').unwrap_or(href).split('/');
            let id_segment = segments.next().unwrap_or("");
            href.starts_with('/')
                && href.matches('/').count() == 2
                && !id_segment.is_empty()
                && id_segment.chars().all(|c| c.is_ascii_digit())
        })
        .map(str::to_string)
        .collect();

    Ok(links)
}

/// Match ids linked from an event's match list page.
pub fn event_match_ids(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let link_selector = selector(".wf-table .match-row a")?;

    let ids: Vec<String> = document
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| href.strip_prefix('/'))
        .filter_map(|rest| rest.split('/').next())
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        return Err(IngestError::Structure {
            context: "event match list (.wf-table .match-row a)",
        });
    }

    Ok(ids)
}
