use crate::classify::GameType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Distribution {
    pub playoffs: u64,
    pub regular: u64,
    pub excluded: u64,
}

impl Distribution {
    pub fn tally<I>(types: I) -> Self
    where
        I: IntoIterator<Item = GameType>,
    {
        let mut dist = Distribution::default();
        for t in types {
            dist.record(t);
        }
        dist
    }

    pub fn record(&mut self, game_type: GameType) {
        match game_type {
            GameType::Playoffs => self.playoffs += 1,
            GameType::RegularSeason => self.regular += 1,
            GameType::Excluded => self.excluded += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.playoffs + self.regular + self.excluded
    }

    pub fn playoff_pct(&self) -> f64 {
        self.pct(self.playoffs)
    }

    pub fn regular_pct(&self) -> f64 {
        self.pct(self.regular)
    }

    pub fn excluded_pct(&self) -> f64 {
        self.pct(self.excluded)
    }

    fn pct(&self, count: u64) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub enum DistributionWarning {
    HighPlayoffShare(f64),
    LowPlayoffShare(f64),
    LowRegularShare(f64),
    HighExcludedShare(f64),
}

impl std::fmt::Display for DistributionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionWarning::HighPlayoffShare(pct) => write!(
                f,
                "high playoff percentage ({pct:.1}%) - review classification"
            ),
            DistributionWarning::LowPlayoffShare(pct) => write!(
                f,
                "low playoff percentage ({pct:.1}%) - review classification"
            ),
            DistributionWarning::LowRegularShare(pct) => write!(
                f,
                "low regular season percentage ({pct:.1}%) - review classification"
            ),
            DistributionWarning::HighExcludedShare(pct) => {
                write!(f, "high excluded percentage ({pct:.1}%) - review filters")
            }
        }
    }
}

/// Sanity checks on the classified share of a batch. Purely diagnostic, an
/// unusual distribution never blocks ingestion. An empty batch is not
/// reported on.
pub fn audit(dist: &Distribution) -> Vec<DistributionWarning> {
    if dist.total() == 0 {
        return Vec::new();
    }

    let mut warnings = Vec::new();

    let playoff = dist.playoff_pct();
    if playoff > 50.0 {
        warnings.push(DistributionWarning::HighPlayoffShare(playoff));
    }
    if playoff < 5.0 {
        warnings.push(DistributionWarning::LowPlayoffShare(playoff));
    }

    let regular = dist.regular_pct();
    if regular < 50.0 {
        warnings.push(DistributionWarning::LowRegularShare(regular));
    }

    let excluded = dist.excluded_pct();
    if excluded > 10.0 {
        warnings.push(DistributionWarning::HighExcludedShare(excluded));
    }

    warnings
}
