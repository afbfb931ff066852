use super::Constraint;
use super::ConstraintHandle;
use super::ConstraintRecord;
use super::LinearExpr;
use super::ModelError;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVar;
use crate::engine::variables::Literal;
use crate::engine::variables::TransformableVariable;
use crate::engine::Domain;
use crate::engine::Objective;
use crate::engine::VariableStore;
use crate::propagators::AllDifferent;
use crate::propagators::Automaton;
use crate::propagators::BoolOr;
use crate::propagators::Circuit;
use crate::propagators::CircuitArc;
use crate::propagators::Cumulative;
use crate::propagators::CumulativeTask;
use crate::propagators::Element;
use crate::propagators::LinearConstraint;
use crate::propagators::Maximum;
use crate::propagators::NoOverlap;
use crate::propagators::NoOverlap2D;
use crate::propagators::Product;
use crate::propagators::Rectangle;
use crate::propagators::Reservoir;
use crate::propagators::ReservoirEvent;
use crate::propagators::Table;

#[derive(Clone, Debug)]
struct VariableRecord {
    domain: Domain,
    name: String,
}

#[derive(Clone, Debug)]
struct IntervalRecord {
    interval: IntervalVar,
    name: String,
}

/// A constraint model: variables with their initial domains, constraint records, scheduling
/// intervals and an optional objective.
///
/// Variables are created once and identified by their [`DomainId`]; constraints are added through
/// the `add_*` methods, each of which returns a [`ConstraintHandle`] to make the constraint
/// conditional on literals.
///
/// ```
/// # use gourd_core::model::LinearExpr;
/// # use gourd_core::model::Model;
/// let mut model = Model::default();
/// let x = model.new_int_var(0, 10, "x");
/// let y = model.new_int_var(0, 10, "y");
/// let b = model.new_bool_var("b");
///
/// let _ = model.add_linear(LinearExpr::from(x) + y, 5, 5);
/// let _ = model.add_less_than(x, y).only_enforce_if([b]);
/// model.maximize(x);
///
/// assert_eq!(3, model.num_variables());
/// assert_eq!(2, model.constraints().len());
/// assert!(model.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Model {
    variables: Vec<VariableRecord>,
    constraints: Vec<ConstraintRecord>,
    intervals: Vec<IntervalRecord>,
    objective: Option<Objective>,
}

impl Model {
    pub fn new_int_var(&mut self, lower_bound: i64, upper_bound: i64, name: &str) -> DomainId {
        self.new_int_var_from_domain(Domain::new(lower_bound, upper_bound), name)
    }

    pub fn new_int_var_from_domain(&mut self, domain: Domain, name: &str) -> DomainId {
        let id = DomainId::new(self.variables.len() as u32);
        self.variables.push(VariableRecord {
            domain,
            name: name.to_owned(),
        });
        id
    }

    pub fn new_bool_var(&mut self, name: &str) -> Literal {
        Literal::new(self.new_int_var(0, 1, name))
    }

    pub fn new_constant(&mut self, value: i64) -> DomainId {
        self.new_int_var(value, value, &value.to_string())
    }

    /// An interval `[start, end)` of length `size`; the model receives the constraint
    /// `start + size == end`.
    pub fn new_interval_var(
        &mut self,
        start: impl Into<AffineView>,
        size: impl Into<AffineView>,
        end: impl Into<AffineView>,
        name: &str,
    ) -> IntervalVar {
        self.add_interval(start.into(), size.into(), end.into(), None, name)
    }

    /// An interval whose end is the view `start + size`.
    pub fn new_fixed_size_interval_var(
        &mut self,
        start: impl Into<AffineView>,
        size: i64,
        name: &str,
    ) -> IntervalVar {
        let start = start.into();
        let end = start.offset(size);
        self.add_interval(start, size.into(), end, None, name)
    }

    /// An interval which only exists when `presence` is true; `start + size == end` is enforced by
    /// `presence`.
    pub fn new_optional_interval_var(
        &mut self,
        start: impl Into<AffineView>,
        size: impl Into<AffineView>,
        end: impl Into<AffineView>,
        presence: Literal,
        name: &str,
    ) -> IntervalVar {
        self.add_interval(start.into(), size.into(), end.into(), Some(presence), name)
    }

    pub fn new_optional_fixed_size_interval_var(
        &mut self,
        start: impl Into<AffineView>,
        size: i64,
        presence: Literal,
        name: &str,
    ) -> IntervalVar {
        let start = start.into();
        self.add_interval(start, size.into(), start.offset(size), Some(presence), name)
    }

    fn add_interval(
        &mut self,
        start: AffineView,
        size: AffineView,
        end: AffineView,
        presence: Option<Literal>,
        name: &str,
    ) -> IntervalVar {
        let interval = IntervalVar {
            start,
            size,
            end,
            presence,
        };

        let length = LinearExpr::from(start) + size - end;
        if length != LinearExpr::default() {
            let _ = self
                .add_linear(length, 0, 0)
                .only_enforce_if(presence.into_iter());
        }

        self.intervals.push(IntervalRecord {
            interval,
            name: name.to_owned(),
        });
        interval
    }

    /// Adds an arbitrary constraint record kind.
    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintHandle<'_> {
        let index = self.constraints.len();
        self.constraints.push(ConstraintRecord::new(constraint));
        ConstraintHandle::new(&mut self.constraints[index])
    }

    /// `lower_bound <= expression <= upper_bound`.
    pub fn add_linear(
        &mut self,
        expression: impl Into<LinearExpr>,
        lower_bound: i64,
        upper_bound: i64,
    ) -> ConstraintHandle<'_> {
        self.add_linear_in_domain(expression, Domain::new(lower_bound, upper_bound))
    }

    /// `expression ∈ domain`.
    pub fn add_linear_in_domain(
        &mut self,
        expression: impl Into<LinearExpr>,
        domain: Domain,
    ) -> ConstraintHandle<'_> {
        let expression = expression.into();
        let rhs = shift_clipped(&domain, -i128::from(expression.offset()));
        let constraint = LinearConstraint::new(expression.terms().iter().copied(), rhs);
        self.add_constraint(Constraint::Linear(if expression.has_overflowed() {
            constraint.mark_overflowed()
        } else {
            constraint
        }))
    }

    pub fn add_equality(
        &mut self,
        left: impl Into<LinearExpr>,
        right: impl Into<LinearExpr>,
    ) -> ConstraintHandle<'_> {
        self.add_linear(Into::<LinearExpr>::into(left) - right, 0, 0)
    }

    pub fn add_not_equal(
        &mut self,
        left: impl Into<LinearExpr>,
        right: impl Into<LinearExpr>,
    ) -> ConstraintHandle<'_> {
        self.add_linear_in_domain(
            Into::<LinearExpr>::into(left) - right,
            Domain::from_intervals([(i64::MIN, -1), (1, i64::MAX)]),
        )
    }

    pub fn add_less_or_equal(
        &mut self,
        left: impl Into<LinearExpr>,
        right: impl Into<LinearExpr>,
    ) -> ConstraintHandle<'_> {
        self.add_linear(Into::<LinearExpr>::into(left) - right, i64::MIN, 0)
    }

    pub fn add_less_than(
        &mut self,
        left: impl Into<LinearExpr>,
        right: impl Into<LinearExpr>,
    ) -> ConstraintHandle<'_> {
        self.add_linear(Into::<LinearExpr>::into(left) - right, i64::MIN, -1)
    }

    pub fn add_all_different<View: Into<AffineView>>(
        &mut self,
        expressions: impl IntoIterator<Item = View>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::AllDifferent(AllDifferent::new(
            expressions.into_iter().map(Into::into),
        )))
    }

    /// `target == array[index]`.
    pub fn add_element<View: Into<AffineView>>(
        &mut self,
        index: DomainId,
        array: impl IntoIterator<Item = View>,
        target: impl Into<AffineView>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::Element(Element::new(
            index,
            array.into_iter().map(Into::into),
            target.into(),
        )))
    }

    pub fn add_allowed_assignments(
        &mut self,
        variables: impl IntoIterator<Item = DomainId>,
        tuples: impl IntoIterator<Item = Vec<i64>>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::Table(Table::allowed(variables, tuples)))
    }

    pub fn add_forbidden_assignments(
        &mut self,
        variables: impl IntoIterator<Item = DomainId>,
        tuples: impl IntoIterator<Item = Vec<i64>>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::Table(Table::forbidden(variables, tuples)))
    }

    /// The sequence `variables` is a word accepted by the automaton with transitions
    /// `(tail, label, head)`.
    pub fn add_automaton(
        &mut self,
        variables: impl IntoIterator<Item = DomainId>,
        starting_state: i64,
        final_states: impl IntoIterator<Item = i64>,
        transitions: impl IntoIterator<Item = (i64, i64, i64)>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::Automaton(Automaton::new(
            variables,
            starting_state,
            final_states,
            transitions,
        )))
    }

    pub fn add_no_overlap(
        &mut self,
        intervals: impl IntoIterator<Item = IntervalVar>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::NoOverlap(NoOverlap::new(intervals)))
    }

    /// The rectangles spanned by the i-th x and the i-th y interval do not overlap.
    pub fn add_no_overlap_2d(
        &mut self,
        x_intervals: impl IntoIterator<Item = IntervalVar>,
        y_intervals: impl IntoIterator<Item = IntervalVar>,
    ) -> ConstraintHandle<'_> {
        let rectangles = x_intervals
            .into_iter()
            .zip(y_intervals)
            .map(|(x, y)| Rectangle { x, y });
        self.add_constraint(Constraint::NoOverlap2D(NoOverlap2D::new(rectangles)))
    }

    pub fn add_cumulative<View: Into<AffineView>>(
        &mut self,
        intervals: impl IntoIterator<Item = IntervalVar>,
        demands: impl IntoIterator<Item = View>,
        capacity: impl Into<AffineView>,
    ) -> ConstraintHandle<'_> {
        let tasks = intervals
            .into_iter()
            .zip(demands)
            .map(|(interval, demand)| CumulativeTask {
                interval,
                demand: demand.into(),
            });
        self.add_constraint(Constraint::Cumulative(Cumulative::new(
            tasks,
            capacity.into(),
        )))
    }

    /// The arcs `(tail, head, literal)` whose literal is true form a Hamiltonian circuit; a
    /// self-loop `(node, node, literal)` lets the circuit skip `node`.
    pub fn add_circuit(
        &mut self,
        arcs: impl IntoIterator<Item = (usize, usize, Literal)>,
    ) -> ConstraintHandle<'_> {
        let arcs = arcs
            .into_iter()
            .map(|(tail, head, literal)| CircuitArc {
                tail,
                head,
                literal,
            });
        self.add_constraint(Constraint::Circuit(Circuit::new(0, arcs)))
    }

    /// Starting at zero, the level changes by `level_changes[i]` at `times[i]`, and has to stay
    /// within `[min_level, max_level]`.
    pub fn add_reservoir<View: Into<AffineView>>(
        &mut self,
        times: impl IntoIterator<Item = View>,
        level_changes: impl IntoIterator<Item = i64>,
        min_level: i64,
        max_level: i64,
    ) -> ConstraintHandle<'_> {
        let events = times
            .into_iter()
            .zip(level_changes)
            .map(|(time, level_change)| ReservoirEvent {
                time: time.into(),
                level_change,
                active: None,
            });
        self.add_constraint(Constraint::Reservoir(Reservoir::new(
            events, min_level, max_level,
        )))
    }

    /// As [`Model::add_reservoir`], where event `i` only happens if `actives[i]` is true.
    pub fn add_reservoir_with_active<View: Into<AffineView>>(
        &mut self,
        times: impl IntoIterator<Item = View>,
        level_changes: impl IntoIterator<Item = i64>,
        actives: impl IntoIterator<Item = Literal>,
        min_level: i64,
        max_level: i64,
    ) -> ConstraintHandle<'_> {
        let events = times
            .into_iter()
            .zip(level_changes)
            .zip(actives)
            .map(|((time, level_change), active)| ReservoirEvent {
                time: time.into(),
                level_change,
                active: Some(active),
            });
        self.add_constraint(Constraint::Reservoir(Reservoir::new(
            events, min_level, max_level,
        )))
    }

    pub fn add_bool_or(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::BoolOr(BoolOr::new(literals)))
    }

    pub fn add_bool_and(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
    ) -> ConstraintHandle<'_> {
        let (sum, count) = literal_sum(literals);
        self.add_linear(sum, count, count)
    }

    pub fn add_at_most_one(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
    ) -> ConstraintHandle<'_> {
        let (sum, _) = literal_sum(literals);
        self.add_linear(sum, i64::MIN, 1)
    }

    pub fn add_exactly_one(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
    ) -> ConstraintHandle<'_> {
        let (sum, _) = literal_sum(literals);
        self.add_linear(sum, 1, 1)
    }

    /// `antecedent => consequent`.
    pub fn add_implication(
        &mut self,
        antecedent: Literal,
        consequent: Literal,
    ) -> ConstraintHandle<'_> {
        self.add_bool_or([!antecedent, consequent])
    }

    /// `target == max(expressions)`.
    pub fn add_max_equality<View: Into<AffineView>>(
        &mut self,
        target: impl Into<AffineView>,
        expressions: impl IntoIterator<Item = View>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::Maximum(Maximum::new(
            target.into(),
            expressions.into_iter().map(Into::into),
        )))
    }

    /// `target == min(expressions)`, posted as `-target == max(-expressions)`.
    pub fn add_min_equality<View: Into<AffineView>>(
        &mut self,
        target: impl Into<AffineView>,
        expressions: impl IntoIterator<Item = View>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::Maximum(Maximum::new(
            Into::<AffineView>::into(target).scaled(-1),
            expressions
                .into_iter()
                .map(|expression| Into::<AffineView>::into(expression).scaled(-1)),
        )))
    }

    /// `target == left * right`.
    pub fn add_multiplication_equality(
        &mut self,
        target: impl Into<AffineView>,
        left: impl Into<AffineView>,
        right: impl Into<AffineView>,
    ) -> ConstraintHandle<'_> {
        self.add_constraint(Constraint::Product(Product::new(
            target.into(),
            left.into(),
            right.into(),
        )))
    }

    /// Replaces the objective of the model.
    pub fn minimize(&mut self, expression: impl Into<LinearExpr>) {
        self.objective = Some(Objective::Minimize(expression.into()));
    }

    /// Replaces the objective of the model.
    pub fn maximize(&mut self, expression: impl Into<LinearExpr>) {
        self.objective = Some(Objective::Maximize(expression.into()));
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = DomainId> {
        (0..self.variables.len() as u32).map(DomainId::new)
    }

    /// The initial domain of `variable`.
    pub fn domain(&self, variable: DomainId) -> &Domain {
        &self.variables[variable.id() as usize].domain
    }

    pub fn name(&self, variable: DomainId) -> &str {
        &self.variables[variable.id() as usize].name
    }

    pub fn constraints(&self) -> &[ConstraintRecord] {
        &self.constraints
    }

    pub fn intervals(&self) -> impl Iterator<Item = &IntervalVar> {
        self.intervals.iter().map(|record| &record.interval)
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// A variable store holding the initial domains.
    pub(crate) fn initial_store(&self) -> VariableStore {
        let mut store = VariableStore::default();
        for record in self.variables.iter() {
            let _ = store.new_variable(record.domain.clone());
        }
        store
    }

    /// Checks the model for errors which make solving it meaningless.
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(record) = self.variables.iter().find(|record| record.domain.is_empty()) {
            return Err(ModelError::EmptyDomain {
                name: record.name.clone(),
            });
        }

        for (index, record) in self.constraints.iter().enumerate() {
            if let Constraint::Linear(linear) = &record.constraint {
                if linear.has_overflowed() {
                    return Err(ModelError::LinearOverflow { constraint: index });
                }
            }
            self.validate_record(record)?;
        }

        let store = self.initial_store();
        for record in self.intervals.iter() {
            if record.interval.size.lower_bound(&store) < 0 {
                return Err(ModelError::NegativeIntervalSize {
                    name: record.name.clone(),
                });
            }
        }

        if let Some(objective) = self.objective.as_ref() {
            self.validate_objective(objective)?;
        }

        Ok(())
    }

    fn validate_record(&self, record: &ConstraintRecord) -> Result<(), ModelError> {
        let constraint = record.constraint.name();
        if let Some(&variable) = record
            .variables()
            .iter()
            .find(|variable| variable.id() as usize >= self.variables.len())
        {
            return Err(ModelError::UnknownVariable {
                constraint,
                variable,
            });
        }

        for literal in record.enforcement.iter() {
            let domain = self.domain(literal.variable());
            if domain.min() < 0 || domain.max() > 1 {
                return Err(ModelError::NonBooleanLiteral {
                    name: self.name(literal.variable()).to_owned(),
                });
            }
        }

        match &record.constraint {
            Constraint::Table(table) => {
                if let Some((tuple, values)) = table
                    .tuples()
                    .enumerate()
                    .find(|(_, values)| values.len() != table.arity())
                {
                    return Err(ModelError::TupleArity {
                        tuple,
                        actual: values.len(),
                        expected: table.arity(),
                    });
                }
            }
            Constraint::Cumulative(cumulative) => {
                let store = self.initial_store();
                if let Some(task) = cumulative
                    .tasks()
                    .iter()
                    .position(|task| task.demand.lower_bound(&store) < 0)
                {
                    return Err(ModelError::NegativeDemand { task });
                }
            }
            Constraint::Reservoir(reservoir) => {
                if reservoir.min_level() > 0 || reservoir.max_level() < 0 {
                    return Err(ModelError::ReservoirExcludesZero {
                        min_level: reservoir.min_level(),
                        max_level: reservoir.max_level(),
                    });
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// The objective is evaluated and bounded in 64 bits, in both directions.
    fn validate_objective(&self, objective: &Objective) -> Result<(), ModelError> {
        let expression = objective.expression();
        if expression.has_overflowed() {
            return Err(ModelError::ObjectiveOverflow);
        }

        let mut magnitude = i128::from(expression.offset()).abs();
        for &(coefficient, variable) in expression.terms() {
            if coefficient == i64::MIN {
                return Err(ModelError::InvalidObjectiveCoefficient { coefficient });
            }
            if variable.id() as usize >= self.variables.len() {
                return Err(ModelError::UnknownVariable {
                    constraint: "Objective",
                    variable,
                });
            }

            let domain = self.domain(variable);
            let largest = i128::from(domain.min())
                .abs()
                .max(i128::from(domain.max()).abs());
            magnitude += i128::from(coefficient).abs() * largest;
        }

        if magnitude > i128::from(i64::MAX) {
            return Err(ModelError::ObjectiveOverflow);
        }

        Ok(())
    }
}

/// The domain `{ value + offset | value ∈ domain }` restricted to the `i64` range.
fn shift_clipped(domain: &Domain, offset: i128) -> Domain {
    let clip = |value: i128| value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;

    Domain::from_intervals(domain.intervals().iter().filter_map(|&(lo, hi)| {
        let lo = i128::from(lo) + offset;
        let hi = i128::from(hi) + offset;
        let in_range = hi >= i128::from(i64::MIN) && lo <= i128::from(i64::MAX);
        in_range.then(|| (clip(lo), clip(hi)))
    }))
}

/// The sum of the 0-1 expressions of the literals, and how many there are.
fn literal_sum(literals: impl IntoIterator<Item = Literal>) -> (LinearExpr, i64) {
    literals
        .into_iter()
        .fold((LinearExpr::default(), 0), |(sum, count), literal| {
            (sum + literal, count + 1)
        })
}
