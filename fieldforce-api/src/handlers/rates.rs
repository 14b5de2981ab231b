use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::{RatesResponse, UpdateRatesRequest, UserRole, UserStatus, WorkflowError};
use std::sync::Arc;

use crate::database::{rates as rates_db, Database};
use crate::handlers::ApiError;
use crate::helpers::identity;

pub async fn get_rates(
    db: web::Data<Arc<Database>>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    identity::current_user(db.async_connection.clone(), &req).await?;

    let rates = rates_db::get_rate_table(db.async_connection.clone()).await?;

    Ok(HttpResponse::Ok().json(RatesResponse { rates }))
}

fn is_known_key(key: &str) -> bool {
    UserRole::ALL.iter().any(|role| {
        UserStatus::ALL
            .iter()
            .any(|status| engine::rates::rate_key(*role, *status) == key)
    })
}

pub async fn update_rates(
    db: web::Data<Arc<Database>>,
    request: web::Json<UpdateRatesRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = identity::current_user(db.async_connection.clone(), &req).await?;
    identity::require_admin(&caller)?;

    let rates = request.into_inner().rates;
    for (key, rate) in &rates {
        if !is_known_key(key) {
            return Err(WorkflowError::InvalidInput(format!("unknown rate key {}", key)).into());
        }
        let values = [
            rate.hq_allowance,
            rate.ex_hq_allowance,
            rate.outstation_allowance,
            rate.km_rate,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(WorkflowError::InvalidInput(format!(
                "rates for {} must be non-negative numbers",
                key
            ))
            .into());
        }
    }

    rates_db::replace_rate_table(db.async_connection.clone(), &rates).await?;
    tracing::info!("Rate table replaced with {} rows", rates.len());

    Ok(HttpResponse::Ok().json(RatesResponse { rates }))
}
