use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::containers::HashSet;
use crate::engine::variables::DomainId;
use crate::engine::Domain;
use crate::engine::VariableStore;

/// The constraint that the sequence of variables spells a word accepted by an automaton.
///
/// The automaton starts in `starting_state`; a transition `(tail, label, head)` moves from `tail`
/// to `head` while reading `label`. The word is accepted when the run ends in one of the final
/// states. The transition relation may be non-deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Automaton {
    variables: Box<[DomainId]>,
    starting_state: i64,
    final_states: Box<[i64]>,
    transitions: Box<[(i64, i64, i64)]>,
}

impl Automaton {
    pub fn new(
        variables: impl IntoIterator<Item = DomainId>,
        starting_state: i64,
        final_states: impl IntoIterator<Item = i64>,
        transitions: impl IntoIterator<Item = (i64, i64, i64)>,
    ) -> Self {
        Automaton {
            variables: variables.into_iter().collect(),
            starting_state,
            final_states: final_states.into_iter().collect(),
            transitions: transitions.into_iter().collect(),
        }
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.variables.iter().copied()
    }

    /// The states reachable before reading each position, given the current domains. Layer `i`
    /// holds the states in which the automaton can be before reading variable `i`.
    fn forward_layers(&self, store: &VariableStore) -> Vec<HashSet<i64>> {
        let mut layers = Vec::with_capacity(self.variables.len() + 1);
        layers.push(std::iter::once(self.starting_state).collect::<HashSet<_>>());

        for &variable in self.variables.iter() {
            let current = &layers[layers.len() - 1];
            let next = self
                .transitions
                .iter()
                .filter(|&&(tail, label, _)| current.contains(&tail) && store.contains(variable, label))
                .map(|&(_, _, head)| head)
                .collect::<HashSet<_>>();
            layers.push(next);
        }

        layers
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let forward = self.forward_layers(store);

        // Walk backwards keeping only states from which a final state is reachable; the labels
        // used on such transitions are the supported values of each position.
        let mut alive = forward[self.variables.len()]
            .iter()
            .copied()
            .filter(|state| self.final_states.contains(state))
            .collect::<HashSet<_>>();

        if alive.is_empty() {
            return Err(Inconsistency::Conflict);
        }

        let mut supports = vec![Vec::new(); self.variables.len()];
        for (position, &variable) in self.variables.iter().enumerate().rev() {
            let mut previous: HashSet<i64> = HashSet::default();
            for &(tail, label, head) in self.transitions.iter() {
                if forward[position].contains(&tail)
                    && alive.contains(&head)
                    && store.contains(variable, label)
                {
                    let _ = previous.insert(tail);
                    supports[position].push(label);
                }
            }
            alive = previous;
        }

        for (&variable, labels) in self.variables.iter().zip(supports) {
            let _ = store.intersect_domain(variable, &Domain::from_values(labels))?;
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        let mut states: HashSet<i64> = std::iter::once(self.starting_state).collect();
        for &variable in self.variables.iter() {
            let label = value(variable);
            states = self
                .transitions
                .iter()
                .filter(|&&(tail, transition_label, _)| transition_label == label && states.contains(&tail))
                .map(|&(_, _, head)| head)
                .collect();
        }

        states.iter().any(|state| self.final_states.contains(state))
    }
}
