mod base;
mod ant;
mod colony;
mod guard;

pub use ant::{Ant, PROVENANCE};
pub use base::roulette;
pub use base::trail::Trail;
pub use colony::Colony;
pub use guard::{Backtrack, CycleGuard, GuardEnum, History};
