//! Call route ordering for a day's customer list.
//!
//! A greedy nearest-neighbour walk where each customer's priority category
//! is worth 10 km of detour per step.

use shared_types::{Customer, CustomerCategory, GeoPoint};

use crate::geo::haversine_km;

const KM_PER_PRIORITY_STEP: f64 = 10.0;

pub fn priority_weight(category: CustomerCategory) -> f64 {
    match category {
        CustomerCategory::A => 3.0,
        CustomerCategory::B => 2.0,
        CustomerCategory::C => 1.0,
    }
}

fn score(customer: &Customer, location: GeoPoint, from: GeoPoint) -> f64 {
    priority_weight(customer.category) * KM_PER_PRIORITY_STEP - haversine_km(from, location)
}

/// Orders customers for a visit starting at `start`.
///
/// At each step the remaining customer with the highest score is visited
/// next; ties go to the earlier customer in the input. Customers without
/// coordinates are appended in their original order.
pub fn optimize(customers: Vec<Customer>, start: GeoPoint) -> Vec<Customer> {
    let mut remaining: Vec<(Customer, GeoPoint)> = Vec::new();
    let mut unlocated: Vec<Customer> = Vec::new();
    for customer in customers {
        match customer.location() {
            Some(location) => remaining.push((customer, location)),
            None => unlocated.push(customer),
        }
    }

    let mut route = Vec::with_capacity(remaining.len() + unlocated.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (index, (customer, location)) in remaining.iter().enumerate() {
            let candidate = score(customer, *location, current);
            match best {
                Some((_, best_score)) if !(candidate > best_score) => {}
                _ if candidate.is_nan() => {}
                _ => best = Some((index, candidate)),
            }
        }

        // Only NaN scores left: keep them in input order rather than drop them
        let Some((index, _)) = best else {
            route.extend(remaining.drain(..).map(|(customer, _)| customer));
            break;
        };

        let (customer, location) = remaining.remove(index);
        current = location;
        route.push(customer);
    }

    route.extend(unlocated);
    route
}

/// Length of the walk from `start` through every located customer, in km
pub fn route_distance_km(start: GeoPoint, route: &[Customer]) -> f64 {
    let mut current = start;
    let mut total = 0.0;

    for location in route.iter().filter_map(Customer::location) {
        let leg = haversine_km(current, location);
        if leg.is_finite() {
            total += leg;
        }
        current = location;
    }
    total
}
