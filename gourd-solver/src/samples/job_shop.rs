use gourd_core::api::SolutionView;
use gourd_core::model::Model;
use gourd_core::variables::DomainId;
use gourd_core::variables::IntervalVar;

use super::Sample;

/// One step of a job: it occupies `machine` for `duration` time units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operation {
    pub machine: usize,
    pub duration: i64,
}

/// A job shop: the operations of every job run in order, every machine runs one operation at a
/// time, and the makespan is minimised.
#[derive(Clone, Debug)]
pub struct JobShop {
    pub model: Model,
    /// `tasks[job][step]` is the interval of the given operation.
    pub tasks: Vec<Vec<IntervalVar>>,
    pub makespan: DomainId,
}

pub fn job_shop(jobs: &[Vec<Operation>]) -> JobShop {
    let mut model = Model::default();

    let horizon = jobs
        .iter()
        .flatten()
        .map(|operation| operation.duration.max(0))
        .sum::<i64>();
    let num_machines = jobs
        .iter()
        .flatten()
        .map(|operation| operation.machine + 1)
        .max()
        .unwrap_or(0);

    let mut machine_tasks = vec![vec![]; num_machines];
    let tasks = jobs
        .iter()
        .enumerate()
        .map(|(job, operations)| {
            operations
                .iter()
                .enumerate()
                .map(|(step, operation)| {
                    let start = model.new_int_var(0, horizon, &format!("start_{job}_{step}"));
                    let interval = model.new_fixed_size_interval_var(
                        start,
                        operation.duration,
                        &format!("task_{job}_{step}"),
                    );
                    machine_tasks[operation.machine].push(interval);
                    interval
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    for job in &tasks {
        for pair in job.windows(2) {
            let _ = model.add_less_or_equal(pair[0].end, pair[1].start);
        }
    }

    for intervals in machine_tasks {
        let _ = model.add_no_overlap(intervals);
    }

    let makespan = model.new_int_var(0, horizon, "makespan");
    let _ = model.add_max_equality(
        makespan,
        tasks.iter().filter_map(|job| job.last()).map(|task| task.end),
    );
    model.minimize(makespan);

    JobShop {
        model,
        tasks,
        makespan,
    }
}

impl Sample for JobShop {
    fn model(&self) -> &Model {
        &self.model
    }

    fn format_solution(&self, solution: &SolutionView<'_>) -> String {
        let mut lines = self
            .tasks
            .iter()
            .enumerate()
            .map(|(job, tasks)| {
                let steps = tasks
                    .iter()
                    .map(|task| {
                        let start = solution.expression_value(task.start);
                        let end = solution.expression_value(task.end);
                        match (start, end) {
                            (Some(start), Some(end)) => format!("[{start}, {end})"),
                            _ => "?".to_owned(),
                        }
                    })
                    .collect::<Vec<_>>();
                format!("job {job}: {}", steps.join(" "))
            })
            .collect::<Vec<_>>();

        if let Some(makespan) = solution.value(self.makespan) {
            lines.push(format!("makespan: {makespan}"));
        }
        lines.join("\n")
    }
}
