use gourd_solver::termination::stop_flag::StopFlag;

/// The signals on which the solver is asked to stop.
const TERMINATION_SIGNALS: &[std::ffi::c_int] =
    &[signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM];

/// Raises `stop_flag` when the process receives SIGINT or SIGTERM. The solver then reports the best
/// solution it has found so far.
pub(crate) fn install(stop_flag: &StopFlag) -> std::io::Result<()> {
    for &signal in TERMINATION_SIGNALS {
        let _ = signal_hook::flag::register(signal, stop_flag.handle())?;
    }

    Ok(())
}
