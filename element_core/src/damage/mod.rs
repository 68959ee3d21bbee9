//! Damage system - pipeline, critical tiers, damage sources and trigger dispatch

mod calculation;
mod critical;
mod source;
mod trigger;

pub use calculation::{compute_final_damage, DamageBreakdown, DamagePipeline, HitTarget};
pub use critical::{critical_multiplier, CriticalRoll};
pub use source::{DamageKind, DamageSource};
pub use trigger::{amplifier_for_value, trigger_requests, TriggerFamily, TriggerRequest};
