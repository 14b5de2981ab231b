use shared_types::{RateConfig, RateTable, UserRole, UserStatus};

/// Key used when a role/status pair has no configured rates
pub const FALLBACK_RATE_KEY: &str = "MR_CONFIRMED";

const BASE_RATES: RateConfig = RateConfig {
    hq_allowance: 291.0,
    ex_hq_allowance: 600.0,
    outstation_allowance: 1200.0,
    km_rate: 3.0,
};

pub fn rate_key(role: UserRole, status: UserStatus) -> String {
    format!("{}_{}", role, status)
}

/// Looks up the rates for a role/status pair.
///
/// Missing pairs fall back to `MR_CONFIRMED`, and a table without that key
/// yields all-zero rates, so expense rows always stay computable.
pub fn resolve(table: &RateTable, role: UserRole, status: UserStatus) -> RateConfig {
    let key = rate_key(role, status);
    if let Some(config) = table.get(&key) {
        return *config;
    }

    if let Some(config) = table.get(FALLBACK_RATE_KEY) {
        tracing::warn!(
            "No rates configured for {}, falling back to {}",
            key,
            FALLBACK_RATE_KEY
        );
        return *config;
    }

    tracing::warn!("No rates configured for {} or {}, using zero rates", key, FALLBACK_RATE_KEY);
    RateConfig::default()
}

/// Builds the starting rate matrix covering every role/status pair.
///
/// Confirmed staff get 1.2x the base allowances, and senior roles a further
/// multiplier (ASM 1.5, RM 2, ZM 2.5). Everyone above MR gets 1 more per km.
pub fn default_rate_table() -> RateTable {
    let mut table = RateTable::new();

    for role in UserRole::ALL {
        for status in UserStatus::ALL {
            let status_multiplier = match status {
                UserStatus::Confirmed => 1.2,
                UserStatus::Trainee => 1.0,
            };
            let role_multiplier = match role {
                UserRole::Asm => 1.5,
                UserRole::Rm => 2.0,
                UserRole::Zm => 2.5,
                UserRole::Admin | UserRole::Mr => 1.0,
            };
            let scale = |base: f64| (base * status_multiplier * role_multiplier).round();

            table.insert(
                rate_key(role, status),
                RateConfig {
                    hq_allowance: scale(BASE_RATES.hq_allowance),
                    ex_hq_allowance: scale(BASE_RATES.ex_hq_allowance),
                    outstation_allowance: scale(BASE_RATES.outstation_allowance),
                    km_rate: match role {
                        UserRole::Mr => BASE_RATES.km_rate,
                        _ => BASE_RATES.km_rate + 1.0,
                    },
                },
            );
        }
    }

    table
}
