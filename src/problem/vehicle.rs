use serde::Serialize;

use crate::problem::delivery::Delivery;
use crate::problem::{City, Num, VehicleId};

/// A delivery committed to a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedDelivery {
    pub delivery: Delivery,
    /// time at which the current route reaches the destination as a stop
    pub arrival: Num,
    /// committed although its deadline is missed (only under a permissive policy)
    pub late: bool,
}

/// A truck based at a distribution center.
///
/// Deliveries are only appended during an allocation run and `capacity_used`
/// never decreases. `route_time` is non-decreasing only while every plan is
/// exact: a heuristic plan for a larger stop set can beat an earlier one.
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    id: VehicleId,
    depot: City,
    capacity: Num,
    capacity_used: Num,
    max_hours: Num,
    route_time: Num,
    deliveries: Vec<AssignedDelivery>,
    route: Vec<City>,
    /// distinct destinations in the order the route serves them
    stop_order: Vec<City>,
}

impl Vehicle {
    pub(crate) fn new(id: VehicleId, depot: City, capacity: Num, max_hours: Num) -> Self {
        Self {
            route: vec![depot.clone()],
            id,
            depot,
            capacity,
            capacity_used: Num::ZERO,
            max_hours,
            route_time: Num::ZERO,
            deliveries: vec![],
            stop_order: vec![],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// City of the owning distribution center, where every route starts.
    pub fn depot(&self) -> &str {
        &self.depot
    }

    pub fn capacity(&self) -> Num {
        self.capacity
    }

    pub fn capacity_used(&self) -> Num {
        self.capacity_used
    }

    pub fn remaining_capacity(&self) -> Num {
        self.capacity - self.capacity_used
    }

    pub fn max_hours(&self) -> Num {
        self.max_hours
    }

    pub fn route_time(&self) -> Num {
        self.route_time
    }

    pub fn route(&self) -> &[City] {
        &self.route
    }

    pub fn deliveries(&self) -> &[AssignedDelivery] {
        &self.deliveries
    }

    pub fn is_used(&self) -> bool {
        !self.deliveries.is_empty()
    }

    pub fn has_capacity_for(&self, weight: Num) -> bool {
        self.capacity_used.saturating_add(weight) <= self.capacity
    }

    /// Distinct destinations in the order the current route serves them,
    /// followed by `destination` unless it is already one of them.
    pub fn stops_with(&self, destination: &str) -> Vec<City> {
        let mut stops = self.stop_order.clone();
        if !stops.iter().any(|s| s == destination) {
            stops.push(destination.to_string());
        }
        stops
    }

    /// Appends `delivery` and replaces the planned route.
    ///
    /// `stop_arrivals` lists every stop of `route` in visiting order with the
    /// cumulative time it is served at; the arrival of every delivery on
    /// board is refreshed from it.
    pub(crate) fn assign(
        &mut self,
        delivery: Delivery,
        late: bool,
        route: Vec<City>,
        stop_arrivals: &[(City, Num)],
        route_time: Num,
    ) {
        debug_assert!(self.has_capacity_for(delivery.weight()));

        self.capacity_used += delivery.weight();
        self.deliveries.push(AssignedDelivery {
            delivery,
            arrival: Num::MAX,
            late,
        });
        for assigned in self.deliveries.iter_mut() {
            assigned.arrival = stop_arrivals
                .iter()
                .find(|(city, _)| city == assigned.delivery.destination())
                .map_or(Num::MAX, |(_, arrival)| *arrival);
        }
        self.stop_order = stop_arrivals.iter().map(|(city, _)| city.clone()).collect();
        self.route = route;
        self.route_time = route_time;
    }
}

/// Time at which `city` is last reached on `route`.
///
/// `arrivals` never decrease along a route, so a deadline holds at every
/// pass through `city` exactly when it holds at the last one.
pub fn last_arrival(route: &[City], arrivals: &[Num], city: &str) -> Option<Num> {
    route
        .iter()
        .rposition(|it| it == city)
        .and_then(|idx| arrivals.get(idx).copied())
}
