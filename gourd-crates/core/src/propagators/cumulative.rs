use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::IntervalVar;
use crate::engine::VariableStore;
use crate::math::clamp_to_i64;

/// A task of a [`Cumulative`] constraint: an interval which uses `demand` units of the resource
/// while it executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CumulativeTask {
    pub interval: IntervalVar,
    pub demand: AffineView,
}

/// A rectangle of the resource profile: over `[start, end]` (inclusive) the compulsory parts of
/// `profile_tasks` use `height` units of the resource.
#[derive(Clone, Debug)]
struct ResourceProfile {
    start: i64,
    end: i64,
    profile_tasks: Vec<usize>,
    height: i128,
}

/// The constraint that at every point in time the demands of the present tasks executing at that
/// time sum to at most `capacity`.
///
/// Propagation is time-tabling: the compulsory parts `[lst, ect)` of the tasks are swept into a
/// resource profile, which is checked against the capacity and used to push the start and end of
/// every task out of the profile rectangles it cannot fit next to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cumulative {
    tasks: Box<[CumulativeTask]>,
    capacity: AffineView,
}

impl Cumulative {
    pub fn new(tasks: impl IntoIterator<Item = CumulativeTask>, capacity: AffineView) -> Self {
        Cumulative {
            tasks: tasks.into_iter().collect(),
            capacity,
        }
    }

    pub fn tasks(&self) -> &[CumulativeTask] {
        &self.tasks
    }

    pub(crate) fn variables(&self) -> Vec<DomainId> {
        let mut variables = Vec::new();
        for task in self.tasks.iter() {
            task.interval.collect_variables(&mut variables);
            variables.extend(task.demand.domain_id());
        }
        variables.extend(self.capacity.domain_id());
        variables
    }

    /// Sweeps the compulsory parts of the present tasks into profile rectangles, in increasing
    /// order of time.
    fn build_profile(&self, store: &VariableStore) -> Vec<ResourceProfile> {
        let mut events = Vec::new();
        for (index, task) in self.tasks.iter().enumerate() {
            let demand = task.demand.lower_bound(store);
            if demand <= 0 || !task.interval.is_present(store) {
                continue;
            }

            let lst = task.interval.lst(store);
            let ect = task.interval.ect(store);
            if lst < ect {
                events.push((lst, index, true));
                events.push((ect, index, false));
            }
        }
        events.sort_unstable_by_key(|&(time, _, _)| time);

        let mut profiles = Vec::new();
        let mut active: Vec<usize> = Vec::new();
        let mut position = 0;
        while position < events.len() {
            let time = events[position].0;
            while position < events.len() && events[position].0 == time {
                let (_, index, is_start) = events[position];
                if is_start {
                    active.push(index);
                } else {
                    active.retain(|&other| other != index);
                }
                position += 1;
            }

            if let (Some(&(next_time, _, _)), false) = (events.get(position), active.is_empty()) {
                let height = active
                    .iter()
                    .map(|&index| i128::from(self.tasks[index].demand.lower_bound(store)))
                    .sum();
                profiles.push(ResourceProfile {
                    start: time,
                    end: next_time - 1,
                    profile_tasks: active.clone(),
                    height,
                });
            }
        }

        profiles
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let profiles = self.build_profile(store);

        let capacity = i128::from(self.capacity.upper_bound(store));
        if let Some(highest) = profiles.iter().map(|profile| profile.height).max() {
            if highest > capacity {
                return Err(Inconsistency::Conflict);
            }
            let _ = self.capacity.set_lower_bound(store, clamp_to_i64(highest))?;
        }

        for (index, task) in self.tasks.iter().enumerate() {
            if task.interval.is_absent(store) {
                continue;
            }
            self.propagate_task(store, &profiles, index, task, capacity)?;
        }

        Ok(())
    }

    fn propagate_task(
        &self,
        store: &mut VariableStore,
        profiles: &[ResourceProfile],
        index: usize,
        task: &CumulativeTask,
        capacity: i128,
    ) -> PropagationStatusCP {
        let demand = task.demand.lower_bound(store);
        let size = task.interval.min_size(store);
        if demand <= 0 || size <= 0 {
            return Ok(());
        }

        let overloads = |profile: &ResourceProfile| {
            let own = if profile.profile_tasks.contains(&index) {
                i128::from(demand)
            } else {
                0
            };
            profile.height - own + i128::from(demand) > capacity
        };

        let mut earliest_start = task.interval.est(store);
        for profile in profiles.iter() {
            if earliest_start <= profile.end
                && earliest_start.saturating_add(size) > profile.start
                && overloads(profile)
            {
                earliest_start = profile.end + 1;
            }
        }

        let mut latest_completion = task.interval.lct(store);
        for profile in profiles.iter().rev() {
            if latest_completion > profile.start
                && latest_completion.saturating_sub(size) <= profile.end
                && overloads(profile)
            {
                latest_completion = profile.start;
            }
        }

        if task.interval.is_present(store) {
            let _ = task.interval.set_earliest_start(store, earliest_start)?;
            let _ = task.interval.set_latest_completion(store, latest_completion)?;
        } else if earliest_start > task.interval.lst(store)
            || latest_completion < task.interval.ect(store)
            || latest_completion.saturating_sub(earliest_start) < size
        {
            let _ = task.interval.set_absent(store)?;
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        let executions = self
            .tasks
            .iter()
            .filter(|task| task.interval.evaluate_presence(value))
            .map(|task| {
                (
                    task.interval.start.evaluate(value),
                    task.interval.end.evaluate(value),
                    i128::from(task.demand.evaluate(value)),
                )
            })
            .collect::<Vec<_>>();
        let capacity = i128::from(self.capacity.evaluate(value));

        executions.iter().all(|&(time, _, _)| {
            executions
                .iter()
                .filter(|&&(start, end, _)| start <= time && time < end)
                .map(|&(_, _, demand)| demand)
                .sum::<i128>()
                <= capacity
        })
    }
}
