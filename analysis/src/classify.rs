#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GameType {
    Playoffs,
    RegularSeason,
    Excluded,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Playoffs => "Playoffs",
            GameType::RegularSeason => "Regular Season",
            GameType::Excluded => "Excluded",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Playoffs" => Some(GameType::Playoffs),
            "Regular Season" => Some(GameType::RegularSeason),
            "Excluded" => Some(GameType::Excluded),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword tables for the tiered stage classifier. Tiers are evaluated in
/// order and the first match wins; the group/swiss/league indicators sit
/// above the playoff keywords so that mixed labels like
/// "Group A: Lower Bracket Final" resolve to the group stage.
pub struct StageRules {
    pub revision: u32,
    pub excluded: &'static [&'static str],
    pub group_indicators: &'static [&'static str],
    pub play_in: &'static [&'static str],
    pub playoff_prefixes: &'static [&'static str],
    pub regular_prefixes: &'static [&'static str],
    pub playoff_keywords: &'static [&'static str],
    pub regular_keywords: &'static [&'static str],
    pub context_prefixes: &'static [&'static str],
    pub playoff_after_colon: &'static [&'static str],
    pub regular_after_colon: &'static [&'static str],
    pub international_events: &'static [&'static str],
    pub international_playoff: &'static [&'static str],
    pub international_regular: &'static [&'static str],
}

// Stage labels as they appear on vlr.gg match headers, lower-cased.
pub static STAGE_RULES: StageRules = StageRules {
    revision: 2,
    excluded: &[
        "showmatch",
        "show match",
        "exhibition",
        "all-star",
        "all star",
        "charity match",
        "fun match",
        "demonstration",
        "showcase",
    ],
    group_indicators: &[
        "group a",
        "group b",
        "group c",
        "group d",
        "group e",
        "group f",
        "group stage",
        "group phase",
        "swiss",
        "swiss stage",
        "swiss phase",
        "league",
        "regular season",
        "season",
        "qualification",
        "qualifying",
        "play-in",
        "play ins",
        "week",
        "day",
        "matchday",
    ],
    play_in: &["play-ins", "play ins", "playin", "play-in"],
    playoff_prefixes: &["playoffs:", "playoff:", "knockout:", "elimination:"],
    regular_prefixes: &[
        "group stage:",
        "group:",
        "swiss:",
        "qualification:",
        "play-in:",
    ],
    playoff_keywords: &[
        "grand final",
        "grand finals",
        "final",
        "finals",
        "championship",
        "upper bracket final",
        "lower bracket final",
        "upper bracket semifinal",
        "lower bracket semifinal",
        "upper bracket quarterfinal",
        "lower bracket quarterfinal",
        "upper bracket round",
        "lower bracket round",
        "semifinal",
        "semifinals",
        "quarterfinal",
        "quarterfinals",
        "round of 16",
        "round of 32",
        "round of 8",
        "round of 4",
        "elimination",
        "knockout",
        "consolation final",
        "bronze final",
        "3rd place match",
        "bronze match",
        "third place match",
        "gold medal match",
        "silver medal match",
        "bronze medal match",
        "bronze",
        "third place",
        "3rd place",
        "medal match",
        "place match",
        "consolation",
        "placement final",
        "5th place match",
        "fourth place match",
    ],
    regular_keywords: &[
        "group stage",
        "group a",
        "group b",
        "group c",
        "group d",
        "group a -",
        "group b -",
        "group c -",
        "group d -",
        "swiss stage",
        "swiss round",
        "swiss phase",
        "opening matches",
        "winners' match",
        "losers' match",
        "qualification",
        "qualifying",
        "round robin",
        "league stage",
        "regular season",
        "round 1",
        "round 2",
        "round 3",
        "round 4",
        "round 5",
        "round 6",
    ],
    context_prefixes: &["main event:", "tournament:", "championship:"],
    playoff_after_colon: &[
        "grand final",
        "semifinal",
        "quarterfinal",
        "upper bracket",
        "lower bracket",
        "final",
        "finals",
        "round of",
        "elimination",
        "knockout",
        "bronze",
        "third place",
        "medal",
    ],
    regular_after_colon: &[
        "group",
        "round 1",
        "round 2",
        "round 3",
        "round 4",
        "opening",
        "winners",
        "losers",
        "swiss",
    ],
    international_events: &[
        "olympics",
        "olympic",
        "asian games",
        "sea games",
        "commonwealth games",
        "world cup",
        "continental championship",
    ],
    international_playoff: &[
        "gold medal",
        "silver medal",
        "bronze medal",
        "final",
        "semifinal",
    ],
    international_regular: &["group", "round", "pool"],
};

pub fn classify(stage: Option<&str>, event_name: Option<&str>) -> GameType {
    classify_with(&STAGE_RULES, stage, event_name)
}

pub fn classify_with(
    rules: &StageRules,
    stage: Option<&str>,
    event_name: Option<&str>,
) -> GameType {
    let raw = stage.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return GameType::RegularSeason;
    }

    let stage = raw.to_lowercase();
    let event = event_name.map(str::to_lowercase).unwrap_or_default();

    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| stage.contains(k));

    if contains_any(rules.excluded) {
        tracing::trace!(rules = rules.revision, %stage, "excluded-event keyword");
        return GameType::Excluded;
    }

    // Group/swiss/league context vetoes any playoff vocabulary further down.
    if contains_any(rules.group_indicators) {
        return GameType::RegularSeason;
    }

    if contains_any(rules.play_in) {
        return GameType::RegularSeason;
    }

    if rules.playoff_prefixes.iter().any(|p| stage.starts_with(p)) {
        return GameType::Playoffs;
    }
    if rules.regular_prefixes.iter().any(|p| stage.starts_with(p)) {
        return GameType::RegularSeason;
    }

    if contains_any(rules.playoff_keywords) {
        return GameType::Playoffs;
    }
    if contains_any(rules.regular_keywords) {
        return GameType::RegularSeason;
    }

    // "Main Event: X" and friends: re-test whatever follows the first colon.
    if rules.context_prefixes.iter().any(|p| stage.contains(p)) {
        if let Some(after) = stage.split(':').nth(1).map(str::trim) {
            if rules.playoff_after_colon.iter().any(|k| after.contains(k)) {
                return GameType::Playoffs;
            }
            if rules.regular_after_colon.iter().any(|k| after.contains(k)) {
                return GameType::RegularSeason;
            }
        }
    }

    if rules.international_events.iter().any(|k| event.contains(k)) {
        if contains_any(rules.international_playoff) {
            return GameType::Playoffs;
        }
        if contains_any(rules.international_regular) {
            return GameType::RegularSeason;
        }
    }

    tracing::trace!(rules = rules.revision, %stage, "ambiguous stage, defaulting");
    GameType::RegularSeason
}
