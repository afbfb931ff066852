use crate::basic_types::Random;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::Domain;
use crate::engine::VariableStore;

/// The context provided to a [`crate::branching::Brancher`], it allows the retrieval of domain
/// values of variables and access to methods from a [`Random`] generator.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    store: &'a VariableStore,
    random_generator: &'a mut dyn Random,
}

impl<'a> SelectionContext<'a> {
    pub fn new(store: &'a VariableStore, rng: &'a mut dyn Random) -> Self {
        SelectionContext {
            store,
            random_generator: rng,
        }
    }

    /// Returns a random generator which can be used to generate random values (see [`Random`] for
    /// more information).
    pub fn random(&mut self) -> &mut dyn Random {
        self.random_generator
    }

    /// The number of values in the domain of `variable`, holes excluded.
    pub fn get_size_of_domain(&self, variable: DomainId) -> u64 {
        self.store.domain(variable).size()
    }

    pub fn domain(&self, variable: DomainId) -> &Domain {
        self.store.domain(variable)
    }

    pub fn lower_bound<Var: IntegerVariable>(&self, var: Var) -> i64 {
        var.lower_bound(self.store)
    }

    pub fn upper_bound<Var: IntegerVariable>(&self, var: Var) -> i64 {
        var.upper_bound(self.store)
    }

    pub fn contains<Var: IntegerVariable>(&self, var: Var, value: i64) -> bool {
        var.contains(self.store, value)
    }

    /// Determines whether the provided [`IntegerVariable`] has a unit domain.
    pub fn is_integer_fixed<Var: IntegerVariable>(&self, var: Var) -> bool {
        var.is_fixed(self.store)
    }

    /// Returns all currently defined [`DomainId`]s.
    pub fn get_domains(&self) -> impl Iterator<Item = DomainId> {
        self.store.variables()
    }
}
