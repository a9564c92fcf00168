#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatTotals {
    pub kills: Option<i64>,
    pub deaths: Option<i64>,
    pub assists: Option<i64>,
    pub first_kills: Option<i64>,
    pub first_deaths: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DerivedRates {
    pub kpr: Option<f64>,
    pub apr: Option<f64>,
    pub fkpr: Option<f64>,
    pub fdpr: Option<f64>,
    pub kd_ratio: Option<f64>,
    pub kda_ratio: Option<f64>,
}

/// Per-round rates for one player on one map. A missing or non-positive
/// round count leaves every output unset; a ratio is never taken against a
/// zero or absent denominator. Missing totals count as zero.
pub fn per_round_rates(totals: StatTotals, rounds_played: Option<i64>) -> DerivedRates {
    let rounds = match rounds_played {
        Some(r) if r > 0 => r as f64,
        _ => return DerivedRates::default(),
    };

    let kills = totals.kills.unwrap_or(0) as f64;
    let deaths = totals.deaths.unwrap_or(0) as f64;
    let assists = totals.assists.unwrap_or(0) as f64;
    let first_kills = totals.first_kills.unwrap_or(0) as f64;
    let first_deaths = totals.first_deaths.unwrap_or(0) as f64;

    let (kd_ratio, kda_ratio) = if deaths > 0.0 {
        (
            Some(round3(kills / deaths)),
            Some(round3((kills + assists) / deaths)),
        )
    } else {
        (None, None)
    };

    DerivedRates {
        kpr: Some(round3(kills / rounds)),
        apr: Some(round3(assists / rounds)),
        fkpr: Some(round3(first_kills / rounds)),
        fdpr: Some(round3(first_deaths / rounds)),
        kd_ratio,
        kda_ratio,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
