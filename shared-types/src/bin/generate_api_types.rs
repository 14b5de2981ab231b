use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // User and territory types
    types.push(clean_type(UserRole::export_to_string()?));
    types.push(clean_type(UserStatus::export_to_string()?));
    types.push(clean_type(UserProfile::export_to_string()?));
    types.push(clean_type(UpsertUserRequest::export_to_string()?));
    types.push(clean_type(UsersResponse::export_to_string()?));
    types.push(clean_type(ExpenseCategory::export_to_string()?));
    types.push(clean_type(Territory::export_to_string()?));

    // Rate types
    types.push(clean_type(RateConfig::export_to_string()?));
    types.push(clean_type(RatesResponse::export_to_string()?));
    types.push(clean_type(UpdateRatesRequest::export_to_string()?));

    // Expense sheet types
    types.push(clean_type(ExpenseStatus::export_to_string()?));
    types.push(clean_type(ExpenseEntry::export_to_string()?));
    types.push(clean_type(ExpenseEntryEdit::export_to_string()?));
    types.push(clean_type(MonthlyExpenseSheet::export_to_string()?));
    types.push(clean_type(SheetTotals::export_to_string()?));
    types.push(clean_type(SheetSummary::export_to_string()?));
    types.push(clean_type(SheetResponse::export_to_string()?));
    types.push(clean_type(RejectSheetRequest::export_to_string()?));
    types.push(clean_type(PendingSheetsResponse::export_to_string()?));

    // Attendance types
    types.push(clean_type(GeoPoint::export_to_string()?));
    types.push(clean_type(GeoLocationData::export_to_string()?));
    types.push(clean_type(GeoVerification::export_to_string()?));
    types.push(clean_type(PunchType::export_to_string()?));
    types.push(clean_type(PunchRecord::export_to_string()?));
    types.push(clean_type(DailyAttendance::export_to_string()?));
    types.push(clean_type(PunchRequest::export_to_string()?));
    types.push(clean_type(PunchResponse::export_to_string()?));

    // Route types
    types.push(clean_type(CustomerType::export_to_string()?));
    types.push(clean_type(CustomerCategory::export_to_string()?));
    types.push(clean_type(Customer::export_to_string()?));
    types.push(clean_type(OptimizeRouteRequest::export_to_string()?));
    types.push(clean_type(OptimizeRouteResponse::export_to_string()?));

    let output_dir = Path::new("../gui/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Every type lands in one file, so cross-file imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
