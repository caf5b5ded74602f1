use citygraph::ShortestPathProvider;
use itertools::Itertools;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::problem::center::DistributionCenter;
use crate::problem::delivery::Delivery;
use crate::problem::vehicle::Vehicle;
use crate::problem::{City, Num};

pub mod feasibility;
pub mod planner;
pub mod report;


use feasibility::{existing_deadlines_hold, FailureTally};
use planner::{RoutePlan, RoutePlanner};
use report::{AllocationOutcome, AllocationRecord, AllocationReport, FailureReason};

pub const DEFAULT_MAX_EXACT_STOPS: usize = 8;

/// What to do when no route reaches a new delivery by its deadline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeadlinePolicy {
    /// the delivery is rejected
    #[default]
    Reject,
    /// the delivery may be committed late, but on-time vehicles are preferred
    AllowLate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// distinct stops up to which every visiting order is tried
    pub max_exact_stops: usize,
    pub deadline_policy: DeadlinePolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_exact_stops: DEFAULT_MAX_EXACT_STOPS,
            deadline_policy: DeadlinePolicy::Reject,
        }
    }
}

struct Candidate {
    center: usize,
    vehicle: usize,
    plan: RoutePlan,
}

/// Greedy allocator placing deliveries on the fleet one at a time, in input
/// order.
///
/// The router owns the fleet for the duration of a run; the graph is only
/// borrowed and never changes, which keeps the path cache valid.
pub struct Router<'g, G> {
    planner: RoutePlanner<'g, G>,
    centers: Vec<DistributionCenter>,
    config: RouterConfig,
}

impl<'g, G: ShortestPathProvider<Num>> Router<'g, G> {
    pub fn new(graph: &'g G, centers: Vec<DistributionCenter>, config: RouterConfig) -> Self {
        Self {
            planner: RoutePlanner::new(graph, config.max_exact_stops),
            centers,
            config,
        }
    }

    pub fn config(&self) -> RouterConfig {
        self.config
    }

    pub fn centers(&self) -> &[DistributionCenter] {
        &self.centers
    }

    pub fn into_centers(self) -> Vec<DistributionCenter> {
        self.centers
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.centers.iter().flat_map(|c| c.fleet().iter())
    }

    pub fn vehicles_used(&self) -> usize {
        self.vehicles().filter(|v| v.is_used()).count()
    }

    /// Center with the shortest path to `destination`, first in order on
    /// ties, or `None` if no center reaches it.
    pub fn select_nearest_center(&mut self, destination: &str) -> Option<(&DistributionCenter, Num)> {
        let (idx, distance) = self.nearest_center_idx(destination)?;
        Some((&self.centers[idx], distance))
    }

    fn nearest_center_idx(&mut self, destination: &str) -> Option<(usize, Num)> {
        let mut nearest: Option<(usize, Num)> = None;
        for (idx, center) in self.centers.iter().enumerate() {
            let path = self.planner.shortest_path(center.city(), destination);
            if !path.is_found() {
                continue;
            }
            let distance = path.weight();
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((idx, distance));
            }
        }
        nearest
    }

    pub fn plan_route(
        &mut self,
        origin: &str,
        stops: &[City],
        context: Option<&Delivery>,
    ) -> Option<RoutePlan> {
        self.planner.plan_route(origin, stops, context)
    }

    /// Allocates `deliveries` in order, committing each success to the
    /// winning vehicle before the next delivery is considered.
    pub fn allocate(&mut self, deliveries: Vec<Delivery>) -> AllocationReport {
        let mut report = AllocationReport {
            records: Vec::with_capacity(deliveries.len()),
        };
        for delivery in deliveries {
            let record = self.allocate_one(delivery);
            match &record.outcome {
                AllocationOutcome::Allocated {
                    vehicle_id,
                    total_time,
                    deadline_met,
                    ..
                } => debug!(
                    "{} -> {}: vehicle {} ({}h{})",
                    record.delivery.id(),
                    record.delivery.destination(),
                    vehicle_id,
                    total_time,
                    if *deadline_met { "" } else { ", late" }
                ),
                AllocationOutcome::Rejected { reasons } => debug!(
                    "{} -> {}: rejected, {}",
                    record.delivery.id(),
                    record.delivery.destination(),
                    reasons.iter().join("; ")
                ),
            }
            report.records.push(record);
        }
        report
    }

    fn allocate_one(&mut self, mut delivery: Delivery) -> AllocationRecord {
        let Some((nearest, _)) = self.nearest_center_idx(delivery.destination()) else {
            warn!(
                "{}: destination {} is unreachable from every center",
                delivery.id(),
                delivery.destination()
            );
            let destination = delivery.destination().to_string();
            return AllocationRecord {
                delivery,
                outcome: AllocationOutcome::Rejected {
                    reasons: vec![FailureReason::Unreachable { destination }],
                },
            };
        };
        delivery.set_origin(self.centers[nearest].city());

        let allow_late = self.config.deadline_policy == DeadlinePolicy::AllowLate;
        let mut tally = FailureTally::default();
        let mut best: Option<Candidate> = None;

        for (c_idx, center) in self.centers.iter().enumerate() {
            for (v_idx, vehicle) in center.fleet().iter().enumerate() {
                tally.vehicles_checked += 1;
                if !vehicle.has_capacity_for(delivery.weight()) {
                    trace!("{}: {} lacks capacity", delivery.id(), vehicle.id());
                    tally.capacity += 1;
                    continue;
                }

                let stops = vehicle.stops_with(delivery.destination());
                let Some(plan) = self
                    .planner
                    .plan_route(vehicle.depot(), &stops, Some(&delivery))
                else {
                    trace!("{}: {} has no route over {:?}", delivery.id(), vehicle.id(), stops);
                    tally.route_invalid += 1;
                    continue;
                };

                let deadline_ok = plan.meets_deadline;
                let hours_ok = plan.total_time <= vehicle.max_hours();
                let existing_ok = existing_deadlines_hold(&plan, vehicle.deliveries());
                if !deadline_ok {
                    tally.deadline += 1;
                }
                if !hours_ok {
                    tally.hours += 1;
                }
                if !existing_ok {
                    tally.existing_deadline += 1;
                }
                if !(hours_ok && existing_ok && (deadline_ok || allow_late)) {
                    trace!(
                        "{}: {} disqualified (deadline {}, hours {}, on board {})",
                        delivery.id(),
                        vehicle.id(),
                        deadline_ok,
                        hours_ok,
                        existing_ok
                    );
                    continue;
                }

                if best
                    .as_ref()
                    .map_or(true, |it| plan.is_preferred_over(&it.plan))
                {
                    best = Some(Candidate {
                        center: c_idx,
                        vehicle: v_idx,
                        plan,
                    });
                }
            }
        }

        let Some(Candidate {
            center,
            vehicle,
            plan,
        }) = best
        else {
            let reasons = tally.into_reasons(&delivery);
            return AllocationRecord {
                delivery,
                outcome: AllocationOutcome::Rejected { reasons },
            };
        };

        let center = &mut self.centers[center];
        let center_city = center.city().to_string();
        let vehicle = &mut center.fleet_mut()[vehicle];
        vehicle.assign(
            delivery.clone(),
            !plan.meets_deadline,
            plan.route.clone(),
            &plan.stop_arrivals,
            plan.total_time,
        );
        AllocationRecord {
            outcome: AllocationOutcome::Allocated {
                vehicle_id: vehicle.id().to_string(),
                center: center_city,
                route: plan.route,
                total_time: plan.total_time,
                deadline_met: plan.meets_deadline,
            },
            delivery,
        }
    }
}
