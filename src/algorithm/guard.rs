use enum_dispatch::enum_dispatch;
use crate::network::{ArcIndex, FlowNetwork};
use crate::utils::config::GuardKind;


#[enum_dispatch]
#[derive(Clone, Copy, Debug)]
pub enum GuardEnum {
    Backtrack,
    History,
}

/// Decides whether an ant may take a forward step along an arc. Immediate
/// reversals are undone by the ant itself and never reach the guard.
#[enum_dispatch(GuardEnum)]
pub trait CycleGuard {
    fn admits(&self, network: &FlowNetwork, arc: ArcIndex, on_path: &[bool]) -> bool;
}

/// Relies on backtrack undo alone; longer cycles are possible.
#[derive(Clone, Copy, Debug, Default)]
pub struct Backtrack;

/// Refuses to enter a node that is already on the current trip's path.
#[derive(Clone, Copy, Debug, Default)]
pub struct History;

impl CycleGuard for Backtrack {
    fn admits(&self, _network: &FlowNetwork, _arc: ArcIndex, _on_path: &[bool]) -> bool {
        true
    }
}

impl CycleGuard for History {
    fn admits(&self, network: &FlowNetwork, arc: ArcIndex, on_path: &[bool]) -> bool {
        !on_path[network.key(arc).to.index()]
    }
}

impl From<GuardKind> for GuardEnum {
    fn from(kind: GuardKind) -> Self {
        match kind {
            GuardKind::Backtrack => Backtrack.into(),
            GuardKind::History   => History.into(),
        }
    }
}
