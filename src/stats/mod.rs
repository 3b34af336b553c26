pub mod classify;
pub mod correction;
pub mod tiers;

pub use classify::{ClassifiedModule, classify};
pub use correction::{CorrectionMethod, adjust};
pub use tiers::{SigGeneTiers, TIER_COUNT, TierThresholds};
