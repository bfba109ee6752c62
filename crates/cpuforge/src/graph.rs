//! Directed component graph and cycle detection.
//!
//! Nodes are the diagram's components in insertion order. Every connection
//! contributes one edge from its `start` component to its `end` component,
//! exactly as stored, whatever the pin directions are.
//!
//! Traversal is an iterative depth-first search over arena indices, so deep
//! chains never touch the call stack. It visits roots in component order and
//! successors in connection order.

use std::collections::HashMap;

use log::trace;

use cpuforge_core::identifier::Id;

use crate::diagram::Diagram;

/// Adjacency view of a [`Diagram`], indexed by component position.
#[derive(Debug, Clone)]
pub struct ComponentGraph {
    nodes: Vec<Id>,
    successors: Vec<Vec<usize>>,
}

impl ComponentGraph {
    /// Builds the graph for the current state of `diagram`.
    pub fn new(diagram: &Diagram) -> Self {
        let nodes: Vec<Id> = diagram.components().map(|c| c.id()).collect();
        let index: HashMap<Id, usize> = nodes.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut successors = vec![Vec::new(); nodes.len()];
        for connection in diagram.connections() {
            let (Some(&tail), Some(&head)) = (
                index.get(&connection.start().component()),
                index.get(&connection.end().component()),
            ) else {
                continue;
            };
            successors[tail].push(head);
        }

        Self { nodes, successors }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Component ids reachable over a single edge from `id`, in connection
    /// order. Repeats are kept when several connections share endpoints.
    pub fn successors(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        self.nodes
            .iter()
            .position(|node| *node == id)
            .map(|i| self.successors[i].as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&i| self.nodes[i])
    }

    /// Returns `true` if any directed cycle exists.
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Returns the first cycle found, as the components along it starting
    /// from the node the back edge points to.
    pub fn find_cycle(&self) -> Option<Vec<Id>> {
        let mut visited = vec![false; self.nodes.len()];
        let mut on_stack = vec![false; self.nodes.len()];
        // (node, index of the next successor to explore)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.nodes.len() {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            on_stack[root] = true;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                let Some(&successor) = self.successors[node].get(next) else {
                    on_stack[node] = false;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                if !visited[successor] {
                    visited[successor] = true;
                    on_stack[successor] = true;
                    stack.push((successor, 0));
                } else if on_stack[successor] {
                    let start = stack
                        .iter()
                        .position(|(n, _)| *n == successor)
                        .unwrap_or_default();
                    let cycle: Vec<Id> = stack[start..]
                        .iter()
                        .map(|(n, _)| self.nodes[*n])
                        .collect();
                    trace!(length = cycle.len(); "Cycle found");
                    return Some(cycle);
                }
            }
        }

        None
    }
}

/// Convenience for `ComponentGraph::new(diagram).has_cycle()`.
pub fn has_cycle(diagram: &Diagram) -> bool {
    ComponentGraph::new(diagram).has_cycle()
}
