use actix_web::{web, HttpResponse};
use shared_types::{OptimizeRouteRequest, OptimizeRouteResponse};

use crate::handlers::ApiError;

pub async fn optimize_route(
    request: web::Json<OptimizeRouteRequest>,
) -> Result<HttpResponse, ApiError> {
    let OptimizeRouteRequest { start, customers } = request.into_inner();

    let customers = engine::route::optimize(customers, start);
    let total_distance_km = engine::route::route_distance_km(start, &customers);

    Ok(HttpResponse::Ok().json(OptimizeRouteResponse {
        customers,
        total_distance_km,
    }))
}
