use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// NFL franchises keyed by the nickname DST rows carry after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum NflTeam {
    #[strum(serialize = "Cardinals")]
    ArizonaCardinals,
    #[strum(serialize = "Falcons")]
    AtlantaFalcons,
    #[strum(serialize = "Ravens")]
    BaltimoreRavens,
    #[strum(serialize = "Bills")]
    BuffaloBills,
    #[strum(serialize = "Panthers")]
    CarolinaPanthers,
    #[strum(serialize = "Bears")]
    ChicagoBears,
    #[strum(serialize = "Bengals")]
    CincinnatiBengals,
    #[strum(serialize = "Browns")]
    ClevelandBrowns,
    #[strum(serialize = "Cowboys")]
    DallasCowboys,
    #[strum(serialize = "Broncos")]
    DenverBroncos,
    #[strum(serialize = "Lions")]
    DetroitLions,
    #[strum(serialize = "Packers")]
    GreenBayPackers,
    #[strum(serialize = "Texans")]
    HoustonTexans,
    #[strum(serialize = "Colts")]
    IndianapolisColts,
    #[strum(serialize = "Jaguars")]
    JacksonvilleJaguars,
    #[strum(serialize = "Chiefs")]
    KansasCityChiefs,
    #[strum(serialize = "Raiders")]
    LasVegasRaiders,
    #[strum(serialize = "Chargers")]
    LosAngelesChargers,
    #[strum(serialize = "Rams")]
    LosAngelesRams,
    #[strum(serialize = "Dolphins")]
    MiamiDolphins,
    #[strum(serialize = "Vikings")]
    MinnesotaVikings,
    #[strum(serialize = "Patriots")]
    NewEnglandPatriots,
    #[strum(serialize = "Saints")]
    NewOrleansSaints,
    #[strum(serialize = "Giants")]
    NewYorkGiants,
    #[strum(serialize = "Jets")]
    NewYorkJets,
    #[strum(serialize = "Eagles")]
    PhiladelphiaEagles,
    #[strum(serialize = "Steelers")]
    PittsburghSteelers,
    #[strum(serialize = "49ers")]
    SanFrancisco49ers,
    #[strum(serialize = "Seahawks")]
    SeattleSeahawks,
    #[strum(serialize = "Buccaneers")]
    TampaBayBuccaneers,
    #[strum(serialize = "Titans")]
    TennesseeTitans,
    #[strum(serialize = "Commanders")]
    WashingtonCommanders,
}

impl NflTeam {
    pub fn nickname(self) -> &'static str {
        self.into()
    }

    /// Teams whose nickname contains `query`, ignoring case. Same rule the optimizer
    /// uses to find a requested defense among DST rows.
    pub fn matching(query: &str) -> Vec<NflTeam> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        Self::iter()
            .filter(|team| team.nickname().to_lowercase().contains(&needle))
            .collect()
    }
}
