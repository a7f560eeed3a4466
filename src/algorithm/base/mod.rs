pub mod roulette;
pub mod trail;
