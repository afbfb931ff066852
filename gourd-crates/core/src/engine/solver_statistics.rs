use crate::create_statistics_struct;

create_statistics_struct!(
    /// The counters of one search worker.
    SolverStatistics {
        /// The number of decisions taken by the worker
        num_decisions: u64,
        /// The number of times propagation failed
        num_conflicts: u64,
        /// The number of propagator calls
        num_propagations: u64,
        /// The number of solutions the worker found
        num_solutions: u64,
        /// The number of choice points popped while backtracking
        num_backtracks: u64,
        /// The peak depth of the search tree
        peak_depth: u64,
        /// The wall-clock time spent searching, in milliseconds
        time_spent_in_solver_ms: u64,
});

impl SolverStatistics {
    /// Adds the counters of another worker; the peak depth is the maximum of the two and the time
    /// the longest of the two, since workers run in parallel.
    pub fn merge(&mut self, other: &SolverStatistics) {
        self.num_decisions += other.num_decisions;
        self.num_conflicts += other.num_conflicts;
        self.num_propagations += other.num_propagations;
        self.num_solutions += other.num_solutions;
        self.num_backtracks += other.num_backtracks;
        self.peak_depth = self.peak_depth.max(other.peak_depth);
        self.time_spent_in_solver_ms = self
            .time_spent_in_solver_ms
            .max(other.time_spent_in_solver_ms);
    }
}
