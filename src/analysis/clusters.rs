//! Connected-component clustering over page references

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Smallest component worth reporting as a cluster
pub const MIN_CLUSTER_SIZE: usize = 3;

/// Connected components of the reference graph, treated as undirected.
///
/// `adjacency` maps each source page to the pages it references; targets
/// need not appear as keys. Components smaller than `min_size` are dropped.
/// Each page lands in at most one component. Components come back largest
/// first, members sorted, ties broken by first member.
pub fn connected_components(
    adjacency: &BTreeMap<String, BTreeSet<String>>,
    min_size: usize,
) -> Vec<Vec<String>> {
    let mut neighbors: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (source, targets) in adjacency {
        neighbors.entry(source.as_str()).or_default();
        for target in targets {
            if target == source {
                continue;
            }
            neighbors
                .entry(source.as_str())
                .or_default()
                .insert(target.as_str());
            neighbors
                .entry(target.as_str())
                .or_default()
                .insert(source.as_str());
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut components = Vec::new();

    for &start in neighbors.keys() {
        if visited.contains(start) {
            continue;
        }

        // BFS; nodes are marked when enqueued so cycles cannot requeue them
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(node) = queue.pop_front() {
            component.push(node.to_string());
            for &next in neighbors.get(node).into_iter().flatten() {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        if component.len() >= min_size {
            component.sort();
            components.push(component);
        }
    }

    components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> BTreeMap<String, BTreeSet<String>> {
        let mut adjacency: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (a, b) in edges {
            adjacency.entry(a.to_string()).or_default().insert(b.to_string());
        }
        adjacency
    }

    #[test]
    fn direction_is_ignored() {
        // a -> b <- c forms one component even though c and a never link out to each other
        let clusters = connected_components(&graph(&[("a", "b"), ("c", "b")]), 3);
        assert_eq!(clusters, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn cycles_terminate_and_do_not_duplicate() {
        let clusters = connected_components(
            &graph(&[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]),
            3,
        );
        assert_eq!(clusters, vec![vec!["a", "b", "c", "d"]]);
    }

    #[test]
    fn small_components_are_dropped() {
        let clusters = connected_components(
            &graph(&[("a", "b"), ("x", "y"), ("y", "z"), ("z", "w")]),
            3,
        );
        assert_eq!(clusters, vec![vec!["w", "x", "y", "z"]]);
    }

    #[test]
    fn self_references_do_not_form_clusters() {
        let clusters = connected_components(&graph(&[("a", "a")]), 1);
        assert_eq!(clusters, vec![vec!["a"]]);
    }

    #[test]
    fn larger_clusters_come_first() {
        let clusters = connected_components(
            &graph(&[("a", "b"), ("b", "c"), ("m", "n"), ("n", "o"), ("o", "p")]),
            3,
        );
        assert_eq!(clusters[0].len(), 4);
        assert_eq!(clusters[1], vec!["a", "b", "c"]);
    }
}
