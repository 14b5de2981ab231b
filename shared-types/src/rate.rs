use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Per-day allowance and travel rates for one role/status pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateConfig {
    pub hq_allowance: f64,
    pub ex_hq_allowance: f64,
    pub outstation_allowance: f64,
    pub km_rate: f64,
}

/// Rate table keyed by `"{role}_{status}"`, e.g. `"MR_CONFIRMED"`
pub type RateTable = BTreeMap<String, RateConfig>;

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RatesResponse {
    pub rates: RateTable,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct UpdateRatesRequest {
    pub rates: RateTable,
}
