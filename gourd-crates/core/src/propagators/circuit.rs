use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::VariableStore;

/// An arc of a [`Circuit`]; an arc from a node to itself means the node is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CircuitArc {
    pub tail: usize,
    pub head: usize,
    pub literal: Literal,
}

/// The constraint that the arcs whose literal is true form a single circuit visiting every node
/// which is not skipped.
///
/// Nodes and arcs live in index arenas: `outgoing[node]` and `incoming[node]` list positions in
/// `arcs`. Each call follows the chains of selected arcs once, so propagation is linear in the
/// number of arcs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    arcs: Box<[CircuitArc]>,
    outgoing: Box<[Vec<usize>]>,
    incoming: Box<[Vec<usize>]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArcState {
    Selected,
    Unknown,
    Removed,
}

impl Circuit {
    pub fn new(num_nodes: usize, arcs: impl IntoIterator<Item = CircuitArc>) -> Self {
        let arcs: Box<[CircuitArc]> = arcs.into_iter().collect();

        let num_nodes = arcs
            .iter()
            .map(|arc| arc.tail.max(arc.head) + 1)
            .max()
            .unwrap_or(0)
            .max(num_nodes);
        let mut outgoing = vec![Vec::new(); num_nodes];
        let mut incoming = vec![Vec::new(); num_nodes];
        for (index, arc) in arcs.iter().enumerate() {
            outgoing[arc.tail].push(index);
            incoming[arc.head].push(index);
        }

        Circuit {
            arcs,
            outgoing: outgoing.into(),
            incoming: incoming.into(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.outgoing.len()
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.arcs.iter().map(|arc| arc.literal.variable())
    }

    fn state(&self, store: &VariableStore, arc: usize) -> ArcState {
        match self.arcs[arc].literal.value(store) {
            Some(true) => ArcState::Selected,
            Some(false) => ArcState::Removed,
            None => ArcState::Unknown,
        }
    }

    /// The literal of the self-loop of `node`, if it has one.
    fn skip_literal(&self, node: usize) -> Option<Literal> {
        self.outgoing[node]
            .iter()
            .map(|&arc| self.arcs[arc])
            .find(|arc| arc.head == node)
            .map(|arc| arc.literal)
    }

    fn is_surely_skipped(&self, store: &VariableStore, node: usize) -> bool {
        self.skip_literal(node)
            .is_some_and(|literal| literal.is_true(store))
    }

    fn may_be_skipped(&self, store: &VariableStore, node: usize) -> bool {
        self.skip_literal(node)
            .is_some_and(|literal| !literal.is_false(store))
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        for node in 0..self.num_nodes() {
            self.propagate_degree(store, &self.outgoing[node])?;
            self.propagate_degree(store, &self.incoming[node])?;
        }

        self.propagate_chains(store)
    }

    /// Exactly one arc of `arcs` (the outgoing or incoming arcs of one node) is selected.
    fn propagate_degree(&self, store: &mut VariableStore, arcs: &[usize]) -> PropagationStatusCP {
        let mut selected = None;
        let mut unknown = None;
        let mut num_unknown = 0;

        for &arc in arcs {
            match self.state(store, arc) {
                ArcState::Selected if selected.is_some() => return Err(Inconsistency::Conflict),
                ArcState::Selected => selected = Some(arc),
                ArcState::Unknown => {
                    num_unknown += 1;
                    unknown = Some(arc);
                }
                ArcState::Removed => {}
            }
        }

        match (selected, unknown) {
            (Some(selected), _) => {
                for &arc in arcs {
                    if arc != selected {
                        let _ = self.arcs[arc].literal.set_false(store)?;
                    }
                }
            }
            (None, None) => return Err(Inconsistency::Conflict),
            (None, Some(arc)) if num_unknown == 1 => {
                let _ = self.arcs[arc].literal.set_true(store)?;
            }
            (None, Some(_)) => {}
        }

        Ok(())
    }

    /// Follows the selected arcs. A closed cycle must be the whole circuit, so every node outside
    /// it is skipped; an open chain must not be closed while a node that cannot be skipped lies
    /// outside of it.
    fn propagate_chains(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let num_nodes = self.num_nodes();
        let mut next = vec![None; num_nodes];
        let mut has_predecessor = vec![false; num_nodes];
        for (index, arc) in self.arcs.iter().enumerate() {
            if arc.tail != arc.head && self.state(store, index) == ArcState::Selected {
                next[arc.tail] = Some(arc.head);
                has_predecessor[arc.head] = true;
            }
        }

        let num_mandatory = (0..num_nodes)
            .filter(|&node| !self.may_be_skipped(store, node))
            .count();

        let mut visited = vec![false; num_nodes];

        // Open chains start at nodes without a selected predecessor.
        for start in 0..num_nodes {
            if has_predecessor[start] || next[start].is_none() {
                continue;
            }

            let mut end = start;
            let mut num_mandatory_in_chain = usize::from(!self.may_be_skipped(store, start));
            visited[start] = true;
            while let Some(successor) = next[end] {
                end = successor;
                visited[end] = true;
                num_mandatory_in_chain += usize::from(!self.may_be_skipped(store, end));
            }

            if num_mandatory_in_chain < num_mandatory {
                for &arc in self.outgoing[end].iter() {
                    if self.arcs[arc].head == start {
                        let _ = self.arcs[arc].literal.set_false(store)?;
                    }
                }
            }
        }

        // Whatever is left unvisited with a successor lies on a closed cycle. The first one found
        // must be the whole circuit; a second cycle then fails on the skipped nodes it contains.
        let Some(start) = (0..num_nodes).find(|&node| !visited[node] && next[node].is_some()) else {
            return Ok(());
        };

        let mut in_cycle = vec![false; num_nodes];
        in_cycle[start] = true;
        let mut current = start;
        while let Some(successor) = next[current] {
            if successor == start {
                break;
            }
            in_cycle[successor] = true;
            current = successor;
        }

        for node in (0..num_nodes).filter(|&node| !in_cycle[node]) {
            if self.is_surely_skipped(store, node) {
                continue;
            }
            match self.skip_literal(node) {
                Some(literal) => {
                    let _ = literal.set_true(store)?;
                }
                None => return Err(Inconsistency::Conflict),
            }
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        let num_nodes = self.num_nodes();
        let mut next = vec![None; num_nodes];
        let mut in_degree = vec![0; num_nodes];
        let mut out_degree = vec![0; num_nodes];
        let mut skipped = vec![false; num_nodes];

        for arc in self.arcs.iter().filter(|arc| arc.literal.evaluate(value)) {
            out_degree[arc.tail] += 1;
            in_degree[arc.head] += 1;
            if arc.tail == arc.head {
                skipped[arc.tail] = true;
            } else {
                next[arc.tail] = Some(arc.head);
            }
        }

        if (0..num_nodes).any(|node| in_degree[node] != 1 || out_degree[node] != 1) {
            return false;
        }

        let Some(start) = (0..num_nodes).find(|&node| !skipped[node]) else {
            return true;
        };
        let num_visited_nodes = num_nodes - skipped.iter().filter(|&&skip| skip).count();

        let mut length = 1;
        let mut current = start;
        while let Some(successor) = next[current] {
            if successor == start {
                break;
            }
            length += 1;
            current = successor;
        }

        length == num_visited_nodes
    }
}
