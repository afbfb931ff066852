mod propagation_status_cp;
mod random;
mod trail;

pub use propagation_status_cp::*;
pub use random::Random;
#[cfg(test)]
pub(crate) use random::tests::TestRandom;
pub(crate) use trail::Trail;
pub use trail::TrailMark;
