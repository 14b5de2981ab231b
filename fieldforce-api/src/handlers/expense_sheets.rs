use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use shared_types::{
    ExpenseEntryEdit, ExpenseStatus, MonthlyExpenseSheet, PendingSheetsResponse, RateConfig,
    RejectSheetRequest, SheetResponse, UserProfile, UserRole, WorkflowError,
};
use std::sync::Arc;

use crate::database::{expense_sheets as sheets_db, rates as rates_db, users as users_db, Database};
use crate::handlers::ApiError;
use crate::helpers::identity;

#[derive(Debug, Deserialize)]
pub struct SheetPath {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct EntryPath {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    pub date: NaiveDate,
}

/// Everything a sheet operation needs, loaded once per request
struct SheetContext {
    caller: UserProfile,
    owner: UserProfile,
    rates: RateConfig,
    sheet: MonthlyExpenseSheet,
}

/// Whether a request may open a month nobody has opened yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Missing {
    Create,
    Refuse,
}

async fn load_sheet(
    db: &Database,
    req: &HttpRequest,
    user_id: &str,
    year: i32,
    month: u32,
    missing: Missing,
) -> Result<SheetContext, ApiError> {
    if !(1..=12).contains(&month) {
        return Err(WorkflowError::InvalidInput(format!("month {} is not 1-12", month)).into());
    }
    if !(1970..=9999).contains(&year) {
        return Err(WorkflowError::InvalidInput(format!("year {} is out of range", year)).into());
    }

    let conn = db.async_connection.clone();
    let caller = identity::current_user(conn.clone(), req).await?;
    let users = users_db::list_users(conn.clone()).await?;

    let owner = users
        .iter()
        .find(|u| u.id == user_id)
        .cloned()
        .ok_or_else(|| WorkflowError::NotFound(format!("user {}", user_id)))?;

    if !identity::can_view(&caller, user_id, &users) {
        return Err(WorkflowError::Forbidden(format!(
            "cannot view expense sheets of {}",
            user_id
        ))
        .into());
    }

    // Allowances always follow the owner's grade, whoever is editing
    let table = rates_db::get_rate_table(conn.clone()).await?;
    let rates = engine::resolve(&table, owner.role, owner.status);

    let sheet = match missing {
        Missing::Create => {
            sheets_db::get_or_create_sheet(conn, user_id, year, month, &rates).await?
        }
        Missing::Refuse => sheets_db::get_sheet(conn, user_id, year, month)
            .await?
            .ok_or_else(|| {
                WorkflowError::NotFound(format!("no sheet for {} in {}-{:02}", user_id, year, month))
            })?,
    };
    // Open sheets always show the owner's current rates
    let sheet = engine::lifecycle::refresh_amounts(&sheet, &rates);

    Ok(SheetContext {
        caller,
        owner,
        rates,
        sheet,
    })
}

fn sheet_response(caller: &UserProfile, sheet: MonthlyExpenseSheet) -> SheetResponse {
    let actor = identity::actor(caller);

    SheetResponse {
        summary: engine::summarize(&sheet.entries),
        can_edit: engine::lifecycle::can_edit(&sheet, &actor),
        can_submit: engine::lifecycle::can_submit(&sheet, &actor),
        can_review: engine::lifecycle::can_review(&sheet, &actor),
        sheet,
    }
}

pub async fn get_sheet(
    db: web::Data<Arc<Database>>,
    path: web::Path<SheetPath>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let SheetPath {
        user_id,
        year,
        month,
    } = path.into_inner();
    let ctx = load_sheet(&db, &req, &user_id, year, month, Missing::Create).await?;

    Ok(HttpResponse::Ok().json(sheet_response(&ctx.caller, ctx.sheet)))
}

pub async fn edit_entry(
    db: web::Data<Arc<Database>>,
    path: web::Path<EntryPath>,
    request: web::Json<ExpenseEntryEdit>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let EntryPath {
        user_id,
        year,
        month,
        date,
    } = path.into_inner();
    let ctx = load_sheet(&db, &req, &user_id, year, month, Missing::Create).await?;

    let updated = engine::lifecycle::edit_entry(
        &ctx.sheet,
        &identity::actor(&ctx.caller),
        date,
        &request.into_inner(),
        &ctx.owner.territories,
        &ctx.rates,
    )?;
    sheets_db::save_sheet(db.async_connection.clone(), &updated).await?;

    Ok(HttpResponse::Ok().json(sheet_response(&ctx.caller, updated)))
}

pub async fn submit_sheet(
    db: web::Data<Arc<Database>>,
    path: web::Path<SheetPath>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let SheetPath {
        user_id,
        year,
        month,
    } = path.into_inner();
    let ctx = load_sheet(&db, &req, &user_id, year, month, Missing::Create).await?;

    let now = chrono::Utc::now().timestamp();
    let updated = engine::lifecycle::submit(&ctx.sheet, &identity::actor(&ctx.caller), now)?;
    sheets_db::save_sheet(db.async_connection.clone(), &updated).await?;

    let summary = engine::summarize(&updated.entries);
    if let Some(warning) = &summary.compliance_warning {
        tracing::info!("Sheet {} submitted with advisory: {}", updated.id, warning);
    } else {
        tracing::info!("Sheet {} submitted", updated.id);
    }

    Ok(HttpResponse::Ok().json(sheet_response(&ctx.caller, updated)))
}

pub async fn approve_sheet(
    db: web::Data<Arc<Database>>,
    path: web::Path<SheetPath>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let SheetPath {
        user_id,
        year,
        month,
    } = path.into_inner();
    let ctx = load_sheet(&db, &req, &user_id, year, month, Missing::Refuse).await?;

    let now = chrono::Utc::now().timestamp();
    let updated = engine::lifecycle::approve(&ctx.sheet, &identity::actor(&ctx.caller), now)?;
    sheets_db::save_sheet(db.async_connection.clone(), &updated).await?;
    tracing::info!(
        "Sheet {} moved to {} by {}",
        updated.id,
        updated.status,
        ctx.caller.id
    );

    Ok(HttpResponse::Ok().json(sheet_response(&ctx.caller, updated)))
}

pub async fn reject_sheet(
    db: web::Data<Arc<Database>>,
    path: web::Path<SheetPath>,
    request: web::Json<RejectSheetRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let SheetPath {
        user_id,
        year,
        month,
    } = path.into_inner();
    let ctx = load_sheet(&db, &req, &user_id, year, month, Missing::Refuse).await?;

    let updated = engine::lifecycle::reject(
        &ctx.sheet,
        &identity::actor(&ctx.caller),
        &request.reason,
    )?;
    sheets_db::save_sheet(db.async_connection.clone(), &updated).await?;
    tracing::info!("Sheet {} rejected by {}", updated.id, ctx.caller.id);

    Ok(HttpResponse::Ok().json(sheet_response(&ctx.caller, updated)))
}

/// Sheets waiting on the caller's review
pub async fn list_pending(
    db: web::Data<Arc<Database>>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = db.async_connection.clone();
    let caller = identity::current_user(conn.clone(), &req).await?;

    let sheets = match caller.role {
        UserRole::Admin => {
            sheets_db::list_sheets_by_status(
                conn,
                &[ExpenseStatus::Submitted, ExpenseStatus::ApprovedAsm],
            )
            .await?
        }
        UserRole::Asm => {
            let users = users_db::list_users(conn.clone()).await?;
            let team = engine::hierarchy::downstream_user_ids(&caller.id, &users);

            sheets_db::list_sheets_by_status(conn, &[ExpenseStatus::Submitted])
                .await?
                .into_iter()
                .filter(|sheet| team.contains(&sheet.user_id))
                .collect()
        }
        UserRole::Zm | UserRole::Rm | UserRole::Mr => Vec::new(),
    };

    let sheets = sheets
        .into_iter()
        .filter(|sheet| sheet.user_id != caller.id)
        .collect();

    Ok(HttpResponse::Ok().json(PendingSheetsResponse { sheets }))
}
