//! Attack resolution - weapon layers to damage, then damage to effects

use super::result::AttackOutcome;
use super::CombatContext;
use crate::damage::{trigger_requests, DamageSource};
use crate::types::EntityId;
use crate::weapon::WeaponElementData;
use crate::world::CombatWorld;
use rand::Rng;

/// Resolve a weapon attack against a target
///
/// 1. Resolves the weapon's Usage layer (cached)
/// 2. Runs the damage pipeline against the target's defenses
/// 3. Applies the damage with an unguarded source
/// 4. Starts the triggered status effects when the hit dealt damage
///
/// Returns `None` if the target is missing or already dead.
pub fn attack<W: CombatWorld + ?Sized>(
    ctx: &mut CombatContext,
    world: &mut W,
    attacker: Option<EntityId>,
    target: EntityId,
    weapon: &mut WeaponElementData,
    base_damage: f64,
    rng: &mut impl Rng,
) -> Option<AttackOutcome> {
    let draw = rng.gen_range(0.0..100.0);
    attack_with_draw(ctx, world, attacker, target, weapon, base_damage, draw)
}

/// Resolve an attack with an explicit critical draw in [0, 100)
pub fn attack_with_draw<W: CombatWorld + ?Sized>(
    ctx: &mut CombatContext,
    world: &mut W,
    attacker: Option<EntityId>,
    target: EntityId,
    weapon: &mut WeaponElementData,
    base_damage: f64,
    draw: f64,
) -> Option<AttackOutcome> {
    if !world.is_alive(target) {
        return None;
    }

    let usage = weapon.usage(&ctx.elements).clone();
    let defenses = world.hit_target(target);
    let breakdown =
        ctx.pipeline
            .compute_with_draw(base_damage, &usage, weapon.extra(), defenses.as_ref(), draw);

    let source = DamageSource::attack(attacker);
    let split = world.apply_damage(target, breakdown.final_damage, &source);
    let is_killing_blow = !world.is_alive(target);

    let requested = trigger_requests(&usage, breakdown.final_damage);
    let triggers_applied = ctx.effects.dispatch(
        world,
        target,
        &requested,
        breakdown.final_damage,
        &source,
    );

    tracing::debug!(
        "Attack on {}: {:.1} damage (tier {}), {} triggers",
        target,
        breakdown.final_damage,
        breakdown.critical_tier,
        triggers_applied
    );

    Some(AttackOutcome {
        target,
        breakdown,
        damage_to_health: split.overflow,
        absorbed_by_shield: split.absorbed,
        shield_gated: split.gated,
        requested,
        triggers_applied,
        is_killing_blow,
    })
}
