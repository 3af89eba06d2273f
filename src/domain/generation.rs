use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Production-mix category a generation source rolls up into
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MixCategory {
    Renewables,
    Nuclear,
    Other,
}

impl MixCategory {
    /// Sources belonging to this category
    pub fn sources(self) -> impl Iterator<Item = GenerationSource> {
        GenerationSource::iter().filter(move |s| s.category() == self)
    }
}

/// Generation-source columns carried by every production record
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenerationSource {
    Biomass,
    HydroPumpedStorage,
    HydroRunOfRiverAndPoundage,
    HydroWaterReservoir,
    OtherRenewable,
    Solar,
    WindOnshore,
    WindOffshore,
    Nuclear,
    FossilGas,
    FossilOil,
    FossilHardCoal,
    Other,
    Waste,
    EnergyStorage,
}

impl GenerationSource {
    pub fn category(self) -> MixCategory {
        match self {
            Self::Biomass
            | Self::HydroPumpedStorage
            | Self::HydroRunOfRiverAndPoundage
            | Self::HydroWaterReservoir
            | Self::OtherRenewable
            | Self::Solar
            | Self::WindOnshore
            | Self::WindOffshore => MixCategory::Renewables,
            Self::Nuclear => MixCategory::Nuclear,
            Self::FossilGas
            | Self::FossilOil
            | Self::FossilHardCoal
            | Self::Other
            | Self::Waste
            | Self::EnergyStorage => MixCategory::Other,
        }
    }

    /// Column name as it appears in snapshot payloads
    pub fn column(self) -> &'static str {
        self.into()
    }
}
