use ahash::AHashMap;
use citygraph::{ShortestPath, ShortestPathProvider};
use fixedbitset::FixedBitSet;
use itertools::Itertools;
use log::trace;

use crate::problem::delivery::Delivery;
use crate::problem::vehicle::last_arrival;
use crate::problem::{City, Num};

/// A candidate visiting order stitched from shortest-path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    /// every city passed, starting at the origin
    pub route: Vec<City>,
    /// cumulative time at each entry of `route`
    pub arrivals: Vec<Num>,
    /// every stop in visiting order with the time it is served at
    pub stop_arrivals: Vec<(City, Num)>,
    pub total_time: Num,
    /// whether the delivery under test is served in time
    pub meets_deadline: bool,
}

impl RoutePlan {
    fn idle(origin: &str) -> Self {
        Self {
            route: vec![origin.to_string()],
            arrivals: vec![Num::ZERO],
            stop_arrivals: vec![],
            total_time: Num::ZERO,
            meets_deadline: true,
        }
    }

    /// Time at which `city` is served as a stop; passing through it on the
    /// way to another stop does not count.
    pub fn stop_arrival(&self, city: &str) -> Option<Num> {
        self.stop_arrivals
            .iter()
            .find(|(stop, _)| stop == city)
            .map(|(_, arrival)| *arrival)
    }

    /// Time of the last pass through `city`, stop or not.
    pub fn last_arrival(&self, city: &str) -> Option<Num> {
        last_arrival(&self.route, &self.arrivals, city)
    }

    /// Deadline-satisfying plans rank first, then shorter ones; ties keep
    /// the incumbent.
    pub fn is_preferred_over(&self, other: &RoutePlan) -> bool {
        match (self.meets_deadline, other.meets_deadline) {
            (true, false) => true,
            (false, true) => false,
            _ => self.total_time < other.total_time,
        }
    }
}

/// Finds the best visiting order of a vehicle's stops.
///
/// Up to `max_exact_stops` distinct stops every permutation is evaluated.
/// Above that the search is factorial, so only a few orders are compared:
/// nearest neighbour from the origin, the delivery under test first followed
/// by nearest neighbour, and the last stop inserted at every position of the
/// preceding ones. Callers pass the stops a vehicle already serves in their
/// current order with the new one last, so the incumbent route extended by
/// the new stop is always among the candidates.
///
/// Shortest paths are memoised; the graph must not change while a planner
/// is alive, which the shared borrow guarantees.
pub struct RoutePlanner<'g, G> {
    graph: &'g G,
    max_exact_stops: usize,
    cache: AHashMap<(City, City), ShortestPath<Num>>,
}

impl<'g, G: ShortestPathProvider<Num>> RoutePlanner<'g, G> {
    pub fn new(graph: &'g G, max_exact_stops: usize) -> Self {
        Self {
            graph,
            max_exact_stops,
            cache: AHashMap::new(),
        }
    }

    pub fn max_exact_stops(&self) -> usize {
        self.max_exact_stops
    }

    pub fn shortest_path(&mut self, from: &str, to: &str) -> &ShortestPath<Num> {
        let graph = self.graph;
        self.cache
            .entry((from.to_string(), to.to_string()))
            .or_insert_with(|| graph.shortest_path(from, to))
    }

    /// Best route from `origin` over all `stops`, judged against the
    /// deadline of `context` when given. `None` when no order is feasible
    /// because some segment is unreachable.
    pub fn plan_route(
        &mut self,
        origin: &str,
        stops: &[City],
        context: Option<&Delivery>,
    ) -> Option<RoutePlan> {
        if stops.is_empty() {
            return Some(RoutePlan::idle(origin));
        }

        let mut best: Option<RoutePlan> = None;
        if stops.len() <= self.max_exact_stops {
            for order in stops.iter().permutations(stops.len()) {
                if let Some(plan) = self.stitch(origin, &order, context) {
                    keep_preferred(&mut best, plan);
                }
            }
        } else {
            trace!(
                "{} stops exceed the exact limit of {}, using nearest neighbour and insertion",
                stops.len(),
                self.max_exact_stops
            );
            let mut orders = vec![];
            if let Some(order) = self.nearest_neighbour_order(origin, stops, None) {
                orders.push(order);
            }
            if let Some(delivery) = context {
                if let Some(order) =
                    self.nearest_neighbour_order(origin, stops, Some(delivery.destination()))
                {
                    if !orders.contains(&order) {
                        orders.push(order);
                    }
                }
            }
            if let Some((last, incumbent)) = stops.split_last() {
                for position in 0..=incumbent.len() {
                    let mut order: Vec<&City> = incumbent.iter().collect();
                    order.insert(position, last);
                    if !orders.contains(&order) {
                        orders.push(order);
                    }
                }
            }
            for order in orders {
                if let Some(plan) = self.stitch(origin, &order, context) {
                    keep_preferred(&mut best, plan);
                }
            }
        }
        best
    }

    fn stitch(
        &mut self,
        origin: &str,
        order: &[&City],
        context: Option<&Delivery>,
    ) -> Option<RoutePlan> {
        let mut route = vec![origin.to_string()];
        let mut arrivals = vec![Num::ZERO];
        let mut stop_arrivals = Vec::with_capacity(order.len());
        let mut elapsed = Num::ZERO;
        let mut current = origin;

        for &next in order {
            let ShortestPath::Found {
                path,
                weight,
                arrivals: offsets,
            } = self.shortest_path(current, next)
            else {
                return None;
            };
            // the first city of a segment is the last city of the previous one
            for (city, offset) in path.iter().zip(offsets.iter()).skip(1) {
                route.push(city.clone());
                arrivals.push(elapsed.saturating_add(*offset));
            }
            elapsed = elapsed.saturating_add(*weight);
            stop_arrivals.push((next.clone(), elapsed));
            current = next.as_str();
        }

        let meets_deadline = context.map_or(true, |delivery| {
            stop_arrivals
                .iter()
                .find(|(stop, _)| stop == delivery.destination())
                .map_or(true, |(_, arrival)| delivery.is_met_at(*arrival))
        });

        Some(RoutePlan {
            route,
            arrivals,
            stop_arrivals,
            total_time: elapsed,
            meets_deadline,
        })
    }

    /// Greedy order: repeatedly go to the closest unvisited stop (first in
    /// `stops` on ties), optionally forcing `first` to be visited first.
    fn nearest_neighbour_order<'s>(
        &mut self,
        origin: &str,
        stops: &'s [City],
        first: Option<&str>,
    ) -> Option<Vec<&'s City>> {
        let mut visited = FixedBitSet::with_capacity(stops.len());
        let mut order = Vec::with_capacity(stops.len());
        let mut current = origin.to_string();

        if let Some(idx) = first.and_then(|city| stops.iter().position(|s| s == city)) {
            visited.insert(idx);
            order.push(&stops[idx]);
            current = stops[idx].clone();
        }

        while order.len() < stops.len() {
            let mut closest: Option<(usize, Num)> = None;
            for (idx, stop) in stops.iter().enumerate() {
                if visited.contains(idx) {
                    continue;
                }
                let weight = self.shortest_path(&current, stop).weight();
                if weight.is_infinite() {
                    continue;
                }
                if closest.map_or(true, |(_, best)| weight < best) {
                    closest = Some((idx, weight));
                }
            }
            let (idx, _) = closest?;
            visited.insert(idx);
            order.push(&stops[idx]);
            current = stops[idx].clone();
        }
        Some(order)
    }
}

fn keep_preferred(best: &mut Option<RoutePlan>, candidate: RoutePlan) {
    match best {
        Some(incumbent) if !candidate.is_preferred_over(incumbent) => {}
        _ => *best = Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use citygraph::CityGraph;
    use rand::seq::SliceRandom;
    use rand::Rng;

    use crate::utils::create_seeded_rng;

    use super::*;

    fn num(v: i32) -> Num {
        Num::from(v)
    }

    fn cities(names: &[&str]) -> Vec<City> {
        names.iter().map(|it| it.to_string()).collect()
    }

    /// D - A = 1, D - B = 2, A - B = 5
    fn fork() -> CityGraph<Num> {
        let mut graph = CityGraph::new();
        graph.add_edge("D", "A", num(1)).unwrap();
        graph.add_edge("D", "B", num(2)).unwrap();
        graph.add_edge("A", "B", num(5)).unwrap();
        graph
    }

    #[test]
    fn no_stops_stays_at_origin() {
        let graph = fork();
        let mut planner = RoutePlanner::new(&graph, 8);
        let plan = planner.plan_route("D", &[], None).unwrap();
        assert_eq!(plan.route, vec!["D"]);
        assert_eq!(plan.total_time, Num::ZERO);
        assert!(plan.meets_deadline);
    }

    #[test]
    fn picks_shortest_order_and_dedups_boundaries() {
        let graph = fork();
        let mut planner = RoutePlanner::new(&graph, 8);
        // D-A-D-B = 4 beats D-B-D-A = 5 and the A-B edge (6)
        let plan = planner
            .plan_route("D", &cities(&["B", "A"]), None)
            .unwrap();
        assert_eq!(plan.route, vec!["D", "A", "D", "B"]);
        assert_eq!(plan.arrivals, vec![num(0), num(1), num(2), num(4)]);
        assert_eq!(plan.total_time, num(4));
    }

    #[test]
    fn deadline_beats_total_time() {
        let graph = fork();
        let mut planner = RoutePlanner::new(&graph, 8);
        // B must be reached within 2h, so B goes first although D-B-D-A takes 5h
        let delivery = Delivery::new("E1", "B", 10, 2).unwrap();
        let plan = planner
            .plan_route("D", &cities(&["A", "B"]), Some(&delivery))
            .unwrap();
        assert_eq!(plan.route, vec!["D", "B", "D", "A"]);
        assert_eq!(plan.total_time, num(5));
        assert!(plan.meets_deadline);
    }

    #[test]
    fn falls_back_to_fastest_when_no_order_meets_deadline() {
        let graph = fork();
        let mut planner = RoutePlanner::new(&graph, 8);
        let delivery = Delivery::new("E1", "B", 10, 1).unwrap();
        let plan = planner
            .plan_route("D", &cities(&["A", "B"]), Some(&delivery))
            .unwrap();
        assert_eq!(plan.total_time, num(4));
        assert!(!plan.meets_deadline);
    }

    #[test]
    fn unreachable_stop_has_no_plan() {
        let mut graph = fork();
        graph.add_edge("X", "Y", num(1)).unwrap();
        let mut planner = RoutePlanner::new(&graph, 8);
        assert!(planner.plan_route("D", &cities(&["A", "Y"]), None).is_none());
        assert!(planner.plan_route("D", &cities(&["Nowhere"]), None).is_none());
    }

    #[test]
    fn equal_time_prefers_deadline_satisfying_plan() {
        let on_time = RoutePlan {
            route: cities(&["D"]),
            arrivals: vec![Num::ZERO],
            stop_arrivals: vec![],
            total_time: num(4),
            meets_deadline: true,
        };
        let late = RoutePlan {
            meets_deadline: false,
            ..on_time.clone()
        };
        assert!(on_time.is_preferred_over(&late));
        assert!(!late.is_preferred_over(&on_time));
        assert!(!on_time.is_preferred_over(&on_time.clone()));
    }

    #[test]
    fn passing_through_does_not_serve_a_stop() {
        // D - A - B
        let mut graph = CityGraph::new();
        graph.add_edge("D", "A", num(1)).unwrap();
        graph.add_edge("A", "B", num(1)).unwrap();
        let mut planner = RoutePlanner::new(&graph, 8);
        let (a, b) = ("A".to_string(), "B".to_string());

        let plan = planner.plan_route("D", &cities(&["B"]), None).unwrap();
        assert_eq!(plan.route, vec!["D", "A", "B"]);
        assert_eq!(plan.stop_arrival("A"), None);
        assert_eq!(plan.last_arrival("A"), Some(num(1)));

        // A is passed at 1h but only served on the way back at 3h
        let delivery = Delivery::new("E1", "A", 10, 2).unwrap();
        let plan = planner.stitch("D", &[&b, &a], Some(&delivery)).unwrap();
        assert_eq!(plan.route, vec!["D", "A", "B", "A"]);
        assert_eq!(plan.stop_arrivals, vec![(b.clone(), num(2)), (a.clone(), num(3))]);
        assert!(!plan.meets_deadline);

        let plan = planner.stitch("D", &[&a, &b], Some(&delivery)).unwrap();
        assert_eq!(plan.stop_arrival("A"), Some(num(1)));
        assert!(plan.meets_deadline);
    }

    #[test]
    fn huge_weights_saturate_instead_of_overflowing() {
        // D - A - B, each leg fits but their sum does not
        let mut graph = CityGraph::new();
        graph.add_edge("D", "A", Num::from(5e15)).unwrap();
        graph.add_edge("A", "B", Num::from(5e15)).unwrap();
        assert_eq!(graph.shortest_path("D", "B"), ShortestPath::Unreachable);

        let mut planner = RoutePlanner::new(&graph, 8);
        let plan = planner.plan_route("D", &cities(&["A", "B"]), None).unwrap();
        assert_eq!(plan.route, vec!["D", "A", "B"]);
        assert_eq!(plan.stop_arrival("A"), Some(Num::from(5e15)));
        assert!(plan.total_time.is_infinite());
    }

    #[test]
    fn heuristic_never_loses_to_the_extended_incumbent_order() {
        let mut rng = create_seeded_rng(11);
        for _ in 0..20 {
            let mut graph = CityGraph::new();
            for i in 1..10 {
                // spanning chain keeps everything reachable
                let j = rng.gen_range(0..i);
                graph
                    .add_edge(&format!("c{i}"), &format!("c{j}"), num(rng.gen_range(1..20)))
                    .unwrap();
            }
            for _ in 0..8 {
                let a = rng.gen_range(0..10);
                let b = rng.gen_range(0..10);
                graph
                    .add_edge(&format!("c{a}"), &format!("c{b}"), num(rng.gen_range(1..20)))
                    .unwrap();
            }
            let mut stops: Vec<City> = (1..10).map(|i| format!("c{i}")).collect();
            stops.shuffle(&mut rng);
            stops.truncate(6);

            let mut planner = RoutePlanner::new(&graph, 2);
            let incumbent: Vec<&City> = stops.iter().collect();
            let extended = planner.stitch("c0", &incumbent, None).unwrap();
            let plan = planner.plan_route("c0", &stops, None).unwrap();
            assert!(plan.total_time <= extended.total_time);
        }
    }

    /// a line D - c1 - c2 - ... - cn with unit edges
    fn line(n: usize) -> CityGraph<Num> {
        let mut graph = CityGraph::new();
        let mut previous = "D".to_string();
        for i in 1..=n {
            let city = format!("c{i}");
            graph.add_edge(&previous, &city, num(1)).unwrap();
            previous = city;
        }
        graph
    }

    #[test]
    fn heuristic_beyond_exact_limit_matches_exact_on_a_line() {
        let graph = line(6);
        let stops = cities(&["c6", "c2", "c4", "c1", "c5", "c3"]);

        let mut exact = RoutePlanner::new(&graph, 8);
        let mut greedy = RoutePlanner::new(&graph, 3);
        let exact_plan = exact.plan_route("D", &stops, None).unwrap();
        let greedy_plan = greedy.plan_route("D", &stops, None).unwrap();

        assert_eq!(exact_plan.total_time, num(6));
        assert_eq!(greedy_plan, exact_plan);
    }

    #[test]
    fn heuristic_can_serve_the_urgent_stop_first() {
        // D - A = 1, D - B = 2, plus far stops behind A
        let mut graph = fork();
        graph.add_edge("A", "F1", num(1)).unwrap();
        graph.add_edge("F1", "F2", num(1)).unwrap();
        let delivery = Delivery::new("E1", "B", 10, 2).unwrap();

        let mut planner = RoutePlanner::new(&graph, 2);
        let plan = planner
            .plan_route("D", &cities(&["A", "F1", "F2", "B"]), Some(&delivery))
            .unwrap();
        assert!(plan.meets_deadline);
        assert_eq!(plan.route.first().map(String::as_str), Some("D"));
        assert_eq!(plan.route[1], "B");
    }
}
