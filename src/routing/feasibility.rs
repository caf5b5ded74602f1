use crate::problem::delivery::Delivery;
use crate::problem::vehicle::AssignedDelivery;
use crate::routing::planner::RoutePlan;
use crate::routing::report::FailureReason;

/// Per-delivery counters of why vehicle attempts were disqualified.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FailureTally {
    pub vehicles_checked: usize,
    pub capacity: usize,
    pub route_invalid: usize,
    pub deadline: usize,
    pub hours: usize,
    pub existing_deadline: usize,
}

impl FailureTally {
    /// Non-zero counters as reasons, in check order.
    pub fn into_reasons(self, delivery: &Delivery) -> Vec<FailureReason> {
        if self.vehicles_checked == 0 {
            return vec![FailureReason::NoVehicles];
        }
        let mut reasons = vec![];
        if self.capacity > 0 {
            reasons.push(FailureReason::CapacityInsufficient {
                vehicles: self.capacity,
                checked: self.vehicles_checked,
            });
        }
        if self.route_invalid > 0 {
            reasons.push(FailureReason::RouteInvalid {
                attempts: self.route_invalid,
            });
        }
        if self.deadline > 0 {
            reasons.push(FailureReason::DeadlineExceeded {
                attempts: self.deadline,
                deadline: delivery.deadline(),
            });
        }
        if self.hours > 0 {
            reasons.push(FailureReason::HoursExceeded {
                attempts: self.hours,
            });
        }
        if self.existing_deadline > 0 {
            reasons.push(FailureReason::ExistingDeadlineViolated {
                attempts: self.existing_deadline,
            });
        }
        reasons
    }
}

/// Whether every on-time delivery already on board is still within its
/// deadline at each pass through its destination on `plan`. Deliveries
/// committed late are not re-checked.
pub fn existing_deadlines_hold(plan: &RoutePlan, on_board: &[AssignedDelivery]) -> bool {
    on_board.iter().filter(|it| !it.late).all(|it| {
        plan.last_arrival(it.delivery.destination())
            .map_or(false, |arrival| it.delivery.is_met_at(arrival))
    })
}

#[cfg(test)]
mod tests {
    use crate::problem::Num;

    use super::*;

    fn plan() -> RoutePlan {
        RoutePlan {
            route: ["D", "A", "D", "B"].iter().map(|it| it.to_string()).collect(),
            arrivals: vec![Num::from(0), Num::from(1), Num::from(2), Num::from(4)],
            stop_arrivals: vec![("A".to_string(), Num::from(1)), ("B".to_string(), Num::from(4))],
            total_time: Num::from(4),
            meets_deadline: true,
        }
    }

    fn on_board(destination: &str, deadline: i32, late: bool) -> AssignedDelivery {
        AssignedDelivery {
            delivery: Delivery::new("E0", destination, 10, deadline).unwrap(),
            arrival: Num::ZERO,
            late,
        }
    }

    #[test]
    fn existing_deliveries_are_checked_at_every_pass() {
        assert!(existing_deadlines_hold(&plan(), &[on_board("A", 1, false)]));
        assert!(existing_deadlines_hold(&plan(), &[on_board("B", 4, false)]));
        assert!(!existing_deadlines_hold(&plan(), &[on_board("B", 3, false)]));
        assert!(!existing_deadlines_hold(&plan(), &[on_board("C", 99, false)]));
        // D is left in time but passed again at 2h
        assert!(!existing_deadlines_hold(&plan(), &[on_board("D", 1, false)]));
        assert!(existing_deadlines_hold(&plan(), &[on_board("D", 2, false)]));
    }

    #[test]
    fn late_deliveries_are_not_rechecked() {
        assert!(existing_deadlines_hold(&plan(), &[on_board("B", 3, true)]));
    }

    #[test]
    fn empty_tally_means_no_vehicles() {
        let delivery = Delivery::new("E1", "A", 10, 5).unwrap();
        assert_eq!(
            FailureTally::default().into_reasons(&delivery),
            vec![FailureReason::NoVehicles]
        );
    }

    #[test]
    fn reasons_follow_check_order() {
        let delivery = Delivery::new("E1", "A", 10, 5).unwrap();
        let tally = FailureTally {
            vehicles_checked: 4,
            capacity: 1,
            deadline: 2,
            hours: 2,
            existing_deadline: 1,
            ..FailureTally::default()
        };
        let codes: Vec<_> = tally
            .into_reasons(&delivery)
            .iter()
            .map(|it| it.code())
            .collect();
        assert_eq!(
            codes,
            vec![
                "capacity-insufficient",
                "deadline-exceeded",
                "hours-exceeded",
                "existing-deadline-violated"
            ]
        );
    }
}
