use ahash::AHashMap;
use citygraph::CityGraph;
use fixedbitset::FixedBitSet;

use crate::problem::center::DistributionCenter;
use crate::problem::vehicle::Vehicle;
use crate::problem::{City, DeliveryId, Num, VehicleId};
use crate::routing::report::{AllocationOutcome, AllocationReport};

#[derive(Debug)]
pub enum Violation {
    RouteStart(VehicleId),
    MissingEdge(VehicleId, City, City),
    Capacity(VehicleId, Num),
    Hours(VehicleId, Num),
    NotOnRoute(DeliveryId),
    /// the recorded arrival matches no pass through the destination
    Arrival(DeliveryId, Num),
    Deadline(DeliveryId, Num),
    /// an allocated record with no matching vehicle entry, or the reverse
    Unreported(DeliveryId),
}

#[derive(Debug)]
pub enum ValidatorResult {
    /// total route time over the whole fleet
    Valid(Num),
    ConstraintViolation(Violation),
    /// route time recomputed from the graph differs from the recorded one
    ObjectiveMismatch(VehicleId, Num),
}

impl ValidatorResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn assert_valid(&self) {
        match self {
            Self::Valid(_) => {}
            Self::ConstraintViolation(violation) => {
                panic!("{:?}", violation)
            }
            Self::ObjectiveMismatch(vehicle, time) => {
                panic!("ObjectiveMismatch({vehicle}: {time})")
            }
        }
    }
}

/// Re-walks the committed route of `vehicle` over `graph`.
pub fn validate_vehicle(graph: &CityGraph<Num>, vehicle: &Vehicle) -> ValidatorResult {
    use ValidatorResult::*;
    use Violation::*;

    let id = || vehicle.id().to_string();
    let route = vehicle.route();
    if route.first().map(String::as_str) != Some(vehicle.depot()) {
        return ConstraintViolation(RouteStart(id()));
    }

    let load: Num = vehicle.deliveries().iter().map(|it| it.delivery.weight()).sum();
    if load > vehicle.capacity() {
        return ConstraintViolation(Capacity(id(), load - vehicle.capacity()));
    }

    let mut time = Num::ZERO;
    let mut arrivals = Vec::with_capacity(route.len());
    arrivals.push(time);
    for leg in route.windows(2) {
        match graph.edge_weight(&leg[0], &leg[1]) {
            Some(weight) => time = time.saturating_add(weight),
            None => return ConstraintViolation(MissingEdge(id(), leg[0].clone(), leg[1].clone())),
        }
        arrivals.push(time);
    }
    if time > vehicle.max_hours() {
        return ConstraintViolation(Hours(id(), time - vehicle.max_hours()));
    }

    for assigned in vehicle.deliveries() {
        let delivery = &assigned.delivery;
        let mut passes = route
            .iter()
            .zip(arrivals.iter())
            .filter(|(city, _)| *city == delivery.destination())
            .map(|(_, arrival)| *arrival)
            .peekable();
        if passes.peek().is_none() {
            return ConstraintViolation(NotOnRoute(delivery.id().to_string()));
        }
        if !passes.any(|it| it == assigned.arrival) {
            return ConstraintViolation(Arrival(delivery.id().to_string(), assigned.arrival));
        }
        if !assigned.late && !delivery.is_met_at(assigned.arrival) {
            return ConstraintViolation(Deadline(
                delivery.id().to_string(),
                assigned.arrival - delivery.deadline(),
            ));
        }
    }

    if time != vehicle.route_time() {
        ObjectiveMismatch(id(), time)
    } else {
        Valid(time)
    }
}

/// Checks every vehicle of `centers` and that the allocated records of
/// `report` are exactly the deliveries carried by the fleet.
pub fn validate_report(
    graph: &CityGraph<Num>,
    centers: &[DistributionCenter],
    report: &AllocationReport,
) -> ValidatorResult {
    use ValidatorResult::*;
    use Violation::*;

    let index: AHashMap<&str, usize> = report
        .records
        .iter()
        .enumerate()
        .map(|(idx, it)| (it.delivery.id(), idx))
        .collect();
    let mut carried = FixedBitSet::with_capacity(report.len());
    let mut total = Num::ZERO;

    for vehicle in centers.iter().flat_map(|c| c.fleet().iter()) {
        match validate_vehicle(graph, vehicle) {
            Valid(time) => total += time,
            other => return other,
        }
        for assigned in vehicle.deliveries() {
            let id = assigned.delivery.id();
            let record_idx = index.get(id).copied().filter(|&idx| {
                matches!(
                    &report.records[idx].outcome,
                    AllocationOutcome::Allocated { vehicle_id, .. } if vehicle_id == vehicle.id()
                )
            });
            let Some(idx) = record_idx else {
                return ConstraintViolation(Unreported(id.to_string()));
            };
            carried.insert(idx);
        }
    }

    let allocated: FixedBitSet = report
        .records
        .iter()
        .enumerate()
        .filter(|(_, it)| it.is_allocated())
        .map(|(idx, _)| idx)
        .collect();
    if let Some(idx) = allocated.difference(&carried).next() {
        return ConstraintViolation(Unreported(report.records[idx].delivery.id().to_string()));
    }

    Valid(total)
}
