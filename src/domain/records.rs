use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::IntoEnumIterator;
use validator::Validate;

use super::generation::{GenerationSource, MixCategory};

/// Anything positioned on the market time axis
pub trait Timestamped {
    fn datetime(&self) -> DateTime<Utc>;

    /// UTC calendar day of the record
    fn day(&self) -> NaiveDate {
        self.datetime().date_naive()
    }
}

/// Day-ahead price observation for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PriceRecord {
    pub datetime: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub country_code: String,
    #[validate(length(min = 1))]
    pub country_name: String,
    /// EUR/MWh, may be negative
    pub price: f64,
}

/// Actual total load for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoadRecord {
    pub datetime: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub country_code: String,
    #[validate(length(min = 1))]
    pub country_name: String,
    /// MWh
    #[validate(range(min = 0.0))]
    pub actual_load: f64,
}

/// Directional cross-border flow between two countries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TransferRecord {
    #[validate(length(min = 1))]
    pub from_country: String,
    #[validate(length(min = 1))]
    pub to_country: String,
    pub amount: f64,
}

/// Generation per source for one country
///
/// Source columns must be present in the payload. An explicit `null` is read
/// as zero output for that source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductionRecord {
    pub datetime: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub country_name: String,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub biomass: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub hydro_pumped_storage: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub hydro_run_of_river_and_poundage: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub hydro_water_reservoir: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub other_renewable: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub solar: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub wind_onshore: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub wind_offshore: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub nuclear: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub fossil_gas: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub fossil_oil: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub fossil_hard_coal: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub other: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub waste: f64,
    #[serde(deserialize_with = "null_as_zero")]
    #[validate(range(min = 0.0))]
    pub energy_storage: f64,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl ProductionRecord {
    /// Record with every source at zero
    pub fn new(datetime: DateTime<Utc>, country_name: impl Into<String>) -> Self {
        Self {
            datetime,
            country_name: country_name.into(),
            biomass: 0.0,
            hydro_pumped_storage: 0.0,
            hydro_run_of_river_and_poundage: 0.0,
            hydro_water_reservoir: 0.0,
            other_renewable: 0.0,
            solar: 0.0,
            wind_onshore: 0.0,
            wind_offshore: 0.0,
            nuclear: 0.0,
            fossil_gas: 0.0,
            fossil_oil: 0.0,
            fossil_hard_coal: 0.0,
            other: 0.0,
            waste: 0.0,
            energy_storage: 0.0,
        }
    }

    pub fn with_source(mut self, source: GenerationSource, value: f64) -> Self {
        *self.source_mut(source) = value;
        self
    }

    pub fn source(&self, source: GenerationSource) -> f64 {
        match source {
            GenerationSource::Biomass => self.biomass,
            GenerationSource::HydroPumpedStorage => self.hydro_pumped_storage,
            GenerationSource::HydroRunOfRiverAndPoundage => self.hydro_run_of_river_and_poundage,
            GenerationSource::HydroWaterReservoir => self.hydro_water_reservoir,
            GenerationSource::OtherRenewable => self.other_renewable,
            GenerationSource::Solar => self.solar,
            GenerationSource::WindOnshore => self.wind_onshore,
            GenerationSource::WindOffshore => self.wind_offshore,
            GenerationSource::Nuclear => self.nuclear,
            GenerationSource::FossilGas => self.fossil_gas,
            GenerationSource::FossilOil => self.fossil_oil,
            GenerationSource::FossilHardCoal => self.fossil_hard_coal,
            GenerationSource::Other => self.other,
            GenerationSource::Waste => self.waste,
            GenerationSource::EnergyStorage => self.energy_storage,
        }
    }

    fn source_mut(&mut self, source: GenerationSource) -> &mut f64 {
        match source {
            GenerationSource::Biomass => &mut self.biomass,
            GenerationSource::HydroPumpedStorage => &mut self.hydro_pumped_storage,
            GenerationSource::HydroRunOfRiverAndPoundage => {
                &mut self.hydro_run_of_river_and_poundage
            }
            GenerationSource::HydroWaterReservoir => &mut self.hydro_water_reservoir,
            GenerationSource::OtherRenewable => &mut self.other_renewable,
            GenerationSource::Solar => &mut self.solar,
            GenerationSource::WindOnshore => &mut self.wind_onshore,
            GenerationSource::WindOffshore => &mut self.wind_offshore,
            GenerationSource::Nuclear => &mut self.nuclear,
            GenerationSource::FossilGas => &mut self.fossil_gas,
            GenerationSource::FossilOil => &mut self.fossil_oil,
            GenerationSource::FossilHardCoal => &mut self.fossil_hard_coal,
            GenerationSource::Other => &mut self.other,
            GenerationSource::Waste => &mut self.waste,
            GenerationSource::EnergyStorage => &mut self.energy_storage,
        }
    }

    /// Sum of the sources in one mix category
    pub fn category_total(&self, category: MixCategory) -> f64 {
        category.sources().map(|s| self.source(s)).sum()
    }

    pub fn renewables(&self) -> f64 {
        self.category_total(MixCategory::Renewables)
    }

    pub fn nuclear_total(&self) -> f64 {
        self.category_total(MixCategory::Nuclear)
    }

    pub fn other_total(&self) -> f64 {
        self.category_total(MixCategory::Other)
    }

    /// Sum over every source column
    pub fn total(&self) -> f64 {
        GenerationSource::iter().map(|s| self.source(s)).sum()
    }
}

impl Timestamped for PriceRecord {
    fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }
}

impl Timestamped for LoadRecord {
    fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }
}

impl Timestamped for ProductionRecord {
    fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }
}

impl<T: Timestamped> Timestamped for &T {
    fn datetime(&self) -> DateTime<Utc> {
        (**self).datetime()
    }
}
