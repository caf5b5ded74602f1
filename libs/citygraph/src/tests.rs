use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::dijkstra;
use crate::{CityGraph, GraphError, QueueKind, ShortestPath, ShortestPathProvider};

fn triangle() -> CityGraph<u32> {
    let mut graph = CityGraph::new();
    graph.add_edge("A", "B", 5).unwrap();
    graph.add_edge("B", "C", 5).unwrap();
    graph.add_edge("A", "C", 12).unwrap();
    graph
}

fn random_graph(rng: &mut Pcg64Mcg, num_cities: usize, num_edges: usize) -> CityGraph<u32> {
    let mut graph = CityGraph::new();
    for i in 0..num_cities {
        // make sure every city exists even if it ends up isolated
        graph.add_edge(&format!("c{i}"), &format!("c{i}"), 0).unwrap();
    }
    for _ in 0..num_edges {
        let a = rng.gen_range(0..num_cities);
        let b = rng.gen_range(0..num_cities);
        let w = rng.gen_range(0..20u32);
        graph.add_edge(&format!("c{a}"), &format!("c{b}"), w).unwrap();
    }
    graph
}

/// reference distances computed with Bellman-Ford
fn bellman_ford(graph: &CityGraph<u32>, origin: &str) -> Vec<Option<u32>> {
    let cities: Vec<&str> = graph.cities().collect();
    let mut dist: Vec<Option<u32>> = vec![None; cities.len()];
    let source = cities.iter().position(|c| *c == origin).unwrap();
    dist[source] = Some(0);
    for _ in 0..cities.len() {
        for (i, city) in cities.iter().enumerate() {
            let Some(d) = dist[i] else { continue };
            for (next, w) in graph.neighbours(city) {
                let j = cities.iter().position(|c| *c == next).unwrap();
                if dist[j].map_or(true, |current| d + w < current) {
                    dist[j] = Some(d + w);
                }
            }
        }
    }
    dist
}

#[test]
fn prefers_two_short_hops_over_long_edge() {
    let graph = triangle();
    let result = graph.shortest_path("A", "C");
    assert_eq!(result.path().unwrap(), &["A", "B", "C"]);
    assert_eq!(result.weight(), 10);
    assert_eq!(result.arrivals().unwrap(), &[0, 5, 10]);
}

#[test]
fn edges_are_bidirectional() {
    let graph = triangle();
    let result = graph.shortest_path("C", "A");
    assert_eq!(result.path().unwrap(), &["C", "B", "A"]);
    assert_eq!(result.weight(), 10);
}

#[test]
fn same_origin_and_destination() {
    let graph = triangle();
    assert_eq!(
        graph.shortest_path("B", "B"),
        ShortestPath::Found {
            path: vec!["B".to_string()],
            weight: 0,
            arrivals: vec![0],
        }
    );
}

#[test]
fn unknown_cities_are_unreachable() {
    let graph = triangle();
    assert_eq!(graph.shortest_path("A", "Z"), ShortestPath::Unreachable);
    assert_eq!(graph.shortest_path("Z", "A"), ShortestPath::Unreachable);
    assert_eq!(graph.shortest_path("Z", "Z"), ShortestPath::Unreachable);
    assert_eq!(graph.shortest_path("Z", "A").weight(), u32::MAX);
}

#[test]
fn disconnected_components_are_unreachable() {
    let mut graph = triangle();
    graph.add_edge("X", "Y", 1).unwrap();
    let result = graph.shortest_path("A", "Y");
    assert!(!result.is_found());
    assert!(result.path().is_none());
    assert_eq!(result.weight(), u32::MAX);
}

#[test]
fn last_write_wins_for_parallel_edges() {
    let mut graph = triangle();
    graph.add_edge("C", "A", 3).unwrap();
    assert_eq!(graph.num_edges(), 3);
    assert_eq!(graph.edge_weight("A", "C"), Some(3));
    assert_eq!(graph.edge_weight("C", "A"), Some(3));
    let result = graph.shortest_path("A", "C");
    assert_eq!(result.path().unwrap(), &["A", "C"]);
    assert_eq!(result.weight(), 3);
}

#[test]
fn negative_weights_are_rejected() {
    let mut graph: CityGraph<i32> = CityGraph::new();
    assert_eq!(
        graph.add_edge("A", "B", -1),
        Err(GraphError::NegativeWeight {
            from: "A".to_string(),
            to: "B".to_string()
        })
    );
    assert_eq!(graph.num_cities(), 0);
}

#[test]
fn infinite_weights_are_rejected() {
    let mut graph: CityGraph<u32> = CityGraph::new();
    assert_eq!(
        graph.add_edge("A", "B", u32::MAX),
        Err(GraphError::InfiniteWeight {
            from: "A".to_string(),
            to: "B".to_string()
        })
    );
    assert_eq!(graph.num_cities(), 0);
    assert!(graph.add_edge("A", "B", u32::MAX - 1).is_ok());
}

#[test]
fn unrepresentable_distances_saturate_to_no_path() {
    for queue in [QueueKind::BinaryHeap, QueueKind::LinearScan] {
        let mut graph: CityGraph<u32> = CityGraph::with_queue(queue);
        graph.add_edge("A", "B", u32::MAX / 2 + 1).unwrap();
        graph.add_edge("B", "C", u32::MAX / 2 + 1).unwrap();
        assert_eq!(graph.shortest_path("A", "B").weight(), u32::MAX / 2 + 1);
        assert_eq!(graph.shortest_path("A", "C"), ShortestPath::Unreachable);
    }
}

#[test]
fn cities_are_created_implicitly() {
    let graph = triangle();
    assert_eq!(graph.num_cities(), 3);
    assert!(graph.contains("B"));
    assert_eq!(graph.cities().collect::<Vec<_>>(), vec!["A", "B", "C"]);
}

#[test]
fn cyclic_predecessor_chain_is_no_path() {
    let graph = triangle();
    let mut labels = dijkstra::with_binary_heap(&graph.adjacency, 0);
    assert!(labels.reconstruct(0, 2).is_some());
    // B <- C <- B never reaches A
    labels.corrupt_predecessor(1, 2);
    labels.corrupt_predecessor(2, 1);
    assert!(labels.reconstruct(0, 2).is_none());
}

#[test]
fn queue_kinds_agree_on_random_graphs() {
    let mut rng = Pcg64Mcg::seed_from_u64(7);
    for _ in 0..50 {
        let mut graph = random_graph(&mut rng, 12, 30);
        let cities: Vec<String> = graph.cities().map(str::to_string).collect();
        let mut heap_results = vec![];
        for a in &cities {
            for b in &cities {
                heap_results.push(graph.shortest_path(a, b));
            }
        }
        graph.set_queue(QueueKind::LinearScan);
        let mut idx = 0;
        for a in &cities {
            for b in &cities {
                assert_eq!(graph.shortest_path(a, b), heap_results[idx], "{a} -> {b}");
                idx += 1;
            }
        }
    }
}

#[test]
fn paths_match_reference_distances_and_edge_sums() {
    let mut rng = Pcg64Mcg::seed_from_u64(42);
    for _ in 0..50 {
        let graph = random_graph(&mut rng, 10, 18);
        let cities: Vec<String> = graph.cities().map(str::to_string).collect();
        for a in &cities {
            let reference = bellman_ford(&graph, a);
            for (j, b) in cities.iter().enumerate() {
                let result = graph.shortest_path(a, b);
                match reference[j] {
                    None => assert!(!result.is_found()),
                    Some(expected) => {
                        assert_eq!(result.weight(), expected);
                        let path = result.path().unwrap();
                        assert_eq!(path.first(), Some(a));
                        assert_eq!(path.last(), Some(b));
                        let sum: u32 = path
                            .windows(2)
                            .map(|pair| graph.edge_weight(&pair[0], &pair[1]).unwrap())
                            .sum();
                        assert_eq!(sum, expected);
                    }
                }
            }
        }
    }
}
