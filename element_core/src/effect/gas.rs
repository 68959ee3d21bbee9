//! Gas - lingering clouds that poison everything inside them

use super::dot::{DotApplication, DotOrigin};
use super::{EffectFamily, TickReport, TriggerContext};
use crate::config::GasConstants;
use crate::damage::{DamageKind, DamageSource};
use crate::types::{EntityId, Position};
use crate::world::CombatWorld;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of one gas cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloudId(pub u64);

impl fmt::Display for CloudId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cloud-{}", self.0)
    }
}

/// A cloud anchored where it was triggered
///
/// `origin` only records which combatant the cloud spawned on; the cloud
/// outlives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasCloud {
    pub id: CloudId,
    pub origin: EntityId,
    pub center: Position,
    pub radius: f64,
    pub amplifier: u32,
    pub hit_damage: f64,
    pub attacker: Option<EntityId>,
    pub age: u32,
}

impl GasCloud {
    /// Whether the cloud still applies damage
    pub fn is_active(&self, active_ticks: u32) -> bool {
        self.age < active_ticks
    }
}

/// Visual events for the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VisualCue {
    /// A spent cloud still drifting; no damage
    CloudLingering {
        cloud: CloudId,
        center: Position,
        radius: f64,
    },
}

/// Owns every gas cloud on the battlefield
#[derive(Debug, Clone, Default)]
pub struct GasManager {
    constants: GasConstants,
    clouds: BTreeMap<CloudId, GasCloud>,
    next_cloud_id: u64,
}

impl GasManager {
    pub fn new(constants: GasConstants) -> Self {
        GasManager {
            constants,
            clouds: BTreeMap::new(),
            next_cloud_id: 0,
        }
    }

    /// `base + min(amplifier * per_level, max_bonus)`
    pub fn radius_for(&self, amplifier: u32) -> f64 {
        let bonus = (amplifier as f64 * self.constants.radius_per_level)
            .min(self.constants.max_radius_bonus);
        self.constants.base_radius + bonus
    }

    /// Spawn a cloud at the target; no position means no cloud
    pub fn trigger<W: CombatWorld + ?Sized>(
        &mut self,
        world: &W,
        ctx: &TriggerContext,
    ) -> Option<CloudId> {
        let center = world.position(ctx.target)?;

        self.next_cloud_id += 1;
        let cloud = GasCloud {
            id: CloudId(self.next_cloud_id),
            origin: ctx.target,
            center,
            radius: self.radius_for(ctx.amplifier),
            amplifier: ctx.amplifier,
            hit_damage: ctx.hit_damage,
            attacker: ctx.attacker,
            age: 0,
        };
        tracing::debug!(
            "Gas {} on {} with radius {:.1}",
            cloud.id,
            ctx.target,
            cloud.radius
        );

        let id = cloud.id;
        self.clouds.insert(id, cloud);
        Some(id)
    }

    /// Age every cloud; active clouds return the DoTs they apply this tick
    ///
    /// The applications are handed back instead of applied so the DoT
    /// manager is only mutated after every cloud has been scanned.
    pub fn tick<W: CombatWorld + ?Sized>(
        &mut self,
        world: &W,
        report: &mut TickReport,
    ) -> Vec<DotApplication> {
        let mut applications = Vec::new();

        for cloud in self.clouds.values_mut() {
            if cloud.is_active(self.constants.active_ticks) {
                let damage =
                    self.constants.damage_ratio * (cloud.amplifier + 1) as f64 * cloud.hit_damage;
                for victim in world.living_entities_within(&cloud.center, cloud.radius) {
                    applications.push(DotApplication {
                        target: victim,
                        origin: DotOrigin::Cloud(cloud.id),
                        source: DamageSource::effect(DamageKind::GasCloud, cloud.attacker),
                        amplifier: cloud.amplifier,
                        damage_per_pulse: damage,
                    });
                }
            } else {
                report.cues.push(VisualCue::CloudLingering {
                    cloud: cloud.id,
                    center: cloud.center,
                    radius: cloud.radius,
                });
            }
            cloud.age += 1;
        }

        let lifetime = self.constants.lifetime_ticks;
        self.clouds.retain(|_, cloud| {
            if cloud.age < lifetime {
                return true;
            }
            tracing::debug!("Gas {} dissipated", cloud.id);
            report.mark(cloud.origin, EffectFamily::Gas);
            false
        });

        applications
    }

    pub fn cloud(&self, id: CloudId) -> Option<&GasCloud> {
        self.clouds.get(&id)
    }

    /// Live clouds that spawned on a combatant
    pub fn clouds_from(&self, origin: EntityId) -> impl Iterator<Item = &GasCloud> {
        self.clouds.values().filter(move |c| c.origin == origin)
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GasCloud> {
        self.clouds.values()
    }
}
