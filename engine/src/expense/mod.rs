pub mod lifecycle;

use chrono::{Datelike, NaiveDate, Weekday};
use shared_types::{
    ExpenseCategory, ExpenseEntry, ExpenseEntryEdit, RateConfig, SheetSummary, SheetTotals,
    Territory,
};

/// Fewer HQ days than this in a month is flagged for review
pub const MIN_HQ_DAYS: u32 = 8;

/// Non-finite input counts as zero
fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Returns the entry with its derived amounts filled in from `rates`.
///
/// Outstation travel is the manually entered fare; every other category pays
/// `km * km_rate`. Misc is added as entered.
pub fn recompute(entry: &ExpenseEntry, rates: &RateConfig) -> ExpenseEntry {
    let mut updated = entry.clone();
    updated.km = sanitize(entry.km);
    updated.train_fare = sanitize(entry.train_fare);
    updated.misc_amount = sanitize(entry.misc_amount);

    updated.daily_allowance = match updated.category {
        ExpenseCategory::Hq => rates.hq_allowance,
        ExpenseCategory::ExHq => rates.ex_hq_allowance,
        ExpenseCategory::Outstation => rates.outstation_allowance,
        ExpenseCategory::Holiday | ExpenseCategory::Sunday => 0.0,
    };

    updated.travel_amount = match updated.category {
        ExpenseCategory::Outstation => updated.train_fare,
        _ => updated.km * rates.km_rate,
    };

    updated.total_amount = updated.daily_allowance + updated.travel_amount + updated.misc_amount;
    updated
}

fn change_category(entry: &mut ExpenseEntry, category: ExpenseCategory) {
    entry.category = category;

    if category == ExpenseCategory::Outstation {
        entry.km = 0.0;
    } else {
        entry.train_fare = 0.0;
        if category.is_non_travel() {
            entry.km = 0.0;
        }
    }
}

fn change_territory(entry: &mut ExpenseEntry, territory: Option<&Territory>) {
    match territory {
        Some(territory) => {
            entry.territory_id = Some(territory.id.clone());
            entry.towns = territory.name.clone();
            entry.category = territory.category;

            if territory.category == ExpenseCategory::Outstation {
                entry.km = 0.0;
            } else {
                entry.km = sanitize(territory.fixed_km);
                entry.train_fare = 0.0;
            }
        }
        None => {
            entry.territory_id = None;
            entry.towns.clear();
        }
    }
}

/// Km can only be typed on Ex-HQ days whose territory has no fixed distance
fn accepts_km(entry: &ExpenseEntry, territories: &[Territory]) -> bool {
    if entry.category != ExpenseCategory::ExHq {
        return false;
    }

    let fixed = entry
        .territory_id
        .as_deref()
        .and_then(|id| territories.iter().find(|t| t.id == id))
        .map(|t| t.fixed_km > 0.0)
        .unwrap_or(false);

    !fixed
}

/// Applies one user edit to an entry and recomputes its derived amounts.
///
/// Edits the row does not accept (km on a fixed-distance or non-travel day,
/// fare outside outstation) are ignored. An unknown territory id clears the
/// territory just like `None` does.
pub fn apply_edit(
    entry: &ExpenseEntry,
    edit: &ExpenseEntryEdit,
    territories: &[Territory],
    rates: &RateConfig,
) -> ExpenseEntry {
    let mut updated = entry.clone();

    match edit {
        ExpenseEntryEdit::Category(category) => change_category(&mut updated, *category),
        ExpenseEntryEdit::Territory(territory_id) => {
            let territory = territory_id
                .as_deref()
                .and_then(|id| territories.iter().find(|t| t.id == id));
            change_territory(&mut updated, territory);
        }
        ExpenseEntryEdit::Km(km) => {
            if accepts_km(&updated, territories) {
                updated.km = sanitize(*km);
            } else {
                tracing::debug!("Ignoring km edit on {} ({})", updated.date, updated.category);
            }
        }
        ExpenseEntryEdit::TrainFare(fare) => {
            if updated.category == ExpenseCategory::Outstation {
                updated.train_fare = sanitize(*fare);
            } else {
                tracing::debug!("Ignoring fare edit on {} ({})", updated.date, updated.category);
            }
        }
        ExpenseEntryEdit::MiscAmount(amount) => updated.misc_amount = sanitize(*amount),
        ExpenseEntryEdit::Towns(towns) => updated.towns = towns.clone(),
        ExpenseEntryEdit::Remarks(remarks) => updated.remarks = remarks.clone(),
    }

    recompute(&updated, rates)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Builds one entry per calendar day of `month` (1-12). Sundays start as
/// SUNDAY and every other day as HQ. Returns an empty list for an invalid
/// month.
pub fn materialize_month(year: i32, month: u32, rates: &RateConfig) -> Vec<ExpenseEntry> {
    let Some(days) = days_in_month(year, month) else {
        return Vec::new();
    };

    (1..=days)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .map(|date| {
            let category = if date.weekday() == Weekday::Sun {
                ExpenseCategory::Sunday
            } else {
                ExpenseCategory::Hq
            };

            let entry = ExpenseEntry {
                id: uuid::Uuid::new_v4().to_string(),
                date,
                territory_id: None,
                towns: String::new(),
                category,
                km: 0.0,
                train_fare: 0.0,
                misc_amount: 0.0,
                remarks: String::new(),
                daily_allowance: 0.0,
                travel_amount: 0.0,
                total_amount: 0.0,
            };
            recompute(&entry, rates)
        })
        .collect()
}

pub fn totals(entries: &[ExpenseEntry]) -> SheetTotals {
    entries
        .iter()
        .fold(SheetTotals::default(), |mut acc, entry| {
            acc.allowance += entry.daily_allowance;
            acc.travel += entry.travel_amount;
            acc.misc += entry.misc_amount;
            acc.km += entry.km;
            acc.total += entry.total_amount;
            if entry.category == ExpenseCategory::Hq {
                acc.hq_days += 1;
            }
            acc
        })
}

/// Totals plus the HQ-days advisory. The advisory never blocks submission.
pub fn summarize(entries: &[ExpenseEntry]) -> SheetSummary {
    let totals = totals(entries);
    let is_hq_compliant = totals.hq_days >= MIN_HQ_DAYS;
    let compliance_warning = (!is_hq_compliant).then(|| {
        format!(
            "Only {} HQ days recorded. Minimum {} required.",
            totals.hq_days, MIN_HQ_DAYS
        )
    });

    SheetSummary {
        totals,
        is_hq_compliant,
        compliance_warning,
    }
}
