//! Player vitals, score and timed status effects.

use std::time::Duration;

use motion_maze_core::{CellCoord, PlayerSnapshot, StatusEffect, StatusFlags};
use rand::Rng;

/// Health ceiling and starting health.
pub const MAX_HEALTH: u32 = 100;

/// Outcome of [`Player::apply_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The shield absorbed the hit and was consumed.
    Absorbed,
    /// Health was reduced by the contained amount.
    Applied(u32),
}

/// Outcome of applying a harmful status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The effect became active until the contained instant.
    Applied {
        /// Advisory expiry on the simulation clock.
        expires_at: Duration,
    },
    /// The shield absorbed the effect and was consumed.
    Absorbed,
}

/// Mutable player record owned by the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    cell: CellCoord,
    health: u32,
    score: i64,
    has_key: bool,
    status: StatusFlags,
}

impl Player {
    /// Creates a fresh player standing on `cell`.
    #[must_use]
    pub fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            health: MAX_HEALTH,
            score: 0,
            has_key: false,
            status: StatusFlags::default(),
        }
    }

    /// Cell the player occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Whether the player holds a key.
    #[must_use]
    pub const fn has_key(&self) -> bool {
        self.has_key
    }

    /// Active status effects with their expiries.
    #[must_use]
    pub const fn status(&self) -> StatusFlags {
        self.status
    }

    /// Reports whether the player is out of health.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Read-only snapshot of the player.
    #[must_use]
    pub const fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: self.cell,
            health: self.health,
            score: self.score,
            has_key: self.has_key,
            status: self.status,
        }
    }

    pub(crate) fn move_to(&mut self, cell: CellCoord) {
        self.cell = cell;
    }

    pub(crate) fn add_score(&mut self, amount: i64) {
        self.score = self.score.saturating_add(amount);
    }

    pub(crate) fn reset_score(&mut self) {
        self.score = 0;
    }

    pub(crate) fn set_has_key(&mut self, has_key: bool) {
        self.has_key = has_key;
    }

    /// Restores health, key and status effects. Position and score survive.
    pub fn reset(&mut self) {
        self.health = MAX_HEALTH;
        self.has_key = false;
        self.status = StatusFlags::default();
    }

    /// Removes `amount` health unless the shield absorbs the hit.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.consume_shield() {
            return DamageOutcome::Absorbed;
        }
        let applied = amount.min(self.health);
        self.health -= applied;
        DamageOutcome::Applied(applied)
    }

    /// Restores `amount` health up to [`MAX_HEALTH`].
    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
    }

    /// Traps the player until `now + duration` unless the shield absorbs it.
    pub fn trap(&mut self, duration: Duration, now: Duration) -> EffectOutcome {
        self.harmful(StatusEffect::Trapped, duration, now)
    }

    /// Slows the player until `now + duration` unless the shield absorbs it.
    pub fn slow(&mut self, duration: Duration, now: Duration) -> EffectOutcome {
        self.harmful(StatusEffect::Slowed, duration, now)
    }

    /// Shields the player until `now + duration`, returning the expiry.
    pub fn add_shield(&mut self, duration: Duration, now: Duration) -> Duration {
        self.set(StatusEffect::Shielded, duration, now)
    }

    /// Hastens the player until `now + duration`, returning the expiry.
    pub fn haste(&mut self, duration: Duration, now: Duration) -> Duration {
        self.set(StatusEffect::Hastened, duration, now)
    }

    /// Clears the effect, reporting whether it was active.
    pub fn clear(&mut self, effect: StatusEffect) -> bool {
        self.slot(effect).take().is_some()
    }

    /// Number of cells a movement attempt covers under the active effects.
    ///
    /// Slowed moves draw from `rng`; every other outcome is deterministic.
    pub(crate) fn planned_steps<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.status.is_active(StatusEffect::Trapped) {
            return 0;
        }
        if self.status.is_active(StatusEffect::Slowed) && rng.gen_bool(0.5) {
            return 0;
        }
        if self.status.is_active(StatusEffect::Hastened) {
            2
        } else {
            1
        }
    }

    fn harmful(
        &mut self,
        effect: StatusEffect,
        duration: Duration,
        now: Duration,
    ) -> EffectOutcome {
        if self.consume_shield() {
            return EffectOutcome::Absorbed;
        }
        EffectOutcome::Applied {
            expires_at: self.set(effect, duration, now),
        }
    }

    fn consume_shield(&mut self) -> bool {
        self.clear(StatusEffect::Shielded)
    }

    fn set(&mut self, effect: StatusEffect, duration: Duration, now: Duration) -> Duration {
        let expires_at = now.saturating_add(duration);
        *self.slot(effect) = Some(expires_at);
        expires_at
    }

    fn slot(&mut self, effect: StatusEffect) -> &mut Option<Duration> {
        match effect {
            StatusEffect::Trapped => &mut self.status.trapped,
            StatusEffect::Shielded => &mut self.status.shielded,
            StatusEffect::Slowed => &mut self.status.slowed,
            StatusEffect::Hastened => &mut self.status.hastened,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const NOW: Duration = Duration::from_secs(2);
    const SPAN: Duration = Duration::from_secs(3);

    fn shielded_player() -> Player {
        let mut player = Player::new(CellCoord::new(0, 0));
        let _ = player.add_shield(SPAN, NOW);
        player
    }

    #[test]
    fn effects_keep_independent_expiries() {
        let mut player = shielded_player();
        let _ = player.haste(Duration::from_secs(7), Duration::from_secs(4));

        assert_eq!(player.status().shielded, Some(NOW + SPAN));
        assert_eq!(player.status().hastened, Some(Duration::from_secs(11)));
        assert_eq!(
            player.status().active().collect::<Vec<_>>(),
            vec![StatusEffect::Shielded, StatusEffect::Hastened]
        );
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut player = Player::new(CellCoord::new(0, 0));
        assert_eq!(player.apply_damage(30), DamageOutcome::Applied(30));
        assert_eq!(player.health(), 70);
        assert_eq!(player.apply_damage(200), DamageOutcome::Applied(70));
        assert_eq!(player.health(), 0);
        assert!(player.is_defeated());
    }

    #[test]
    fn heal_caps_at_max_health() {
        let mut player = Player::new(CellCoord::new(0, 0));
        let _ = player.apply_damage(10);
        player.heal(25);
        assert_eq!(player.health(), MAX_HEALTH);
    }

    #[test]
    fn shield_absorbs_damage() {
        let mut player = shielded_player();
        assert_eq!(player.apply_damage(30), DamageOutcome::Absorbed);
        assert_eq!(player.health(), MAX_HEALTH);
        assert!(!player.status().is_active(StatusEffect::Shielded));
    }

    #[test]
    fn shield_absorbs_trap_and_slow() {
        let mut player = shielded_player();
        assert_eq!(player.trap(SPAN, NOW), EffectOutcome::Absorbed);
        assert_eq!(player.status(), StatusFlags::default());

        let mut player = shielded_player();
        assert_eq!(player.slow(SPAN, NOW), EffectOutcome::Absorbed);
        assert_eq!(player.status(), StatusFlags::default());
    }

    #[test]
    fn effects_record_their_own_expiry() {
        let mut player = Player::new(CellCoord::new(0, 0));
        assert_eq!(
            player.slow(SPAN, NOW),
            EffectOutcome::Applied {
                expires_at: Duration::from_secs(5)
            }
        );
        assert_eq!(player.haste(Duration::from_secs(5), NOW), Duration::from_secs(7));
        assert_eq!(player.status().slowed, Some(Duration::from_secs(5)));
        assert_eq!(player.status().hastened, Some(Duration::from_secs(7)));
        assert_eq!(player.status().trapped, None);
    }

    #[test]
    fn reset_keeps_position_and_score() {
        let mut player = Player::new(CellCoord::new(2, 3));
        player.add_score(-40);
        player.set_has_key(true);
        let _ = player.apply_damage(50);
        let _ = player.trap(SPAN, NOW);

        player.reset();

        assert_eq!(player.cell(), CellCoord::new(2, 3));
        assert_eq!(player.score(), -40);
        assert_eq!(player.health(), MAX_HEALTH);
        assert!(!player.has_key());
        assert_eq!(player.status(), StatusFlags::default());
    }

    #[test]
    fn planned_steps_follow_status() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut player = Player::new(CellCoord::new(0, 0));
        assert_eq!(player.planned_steps(&mut rng), 1);

        let _ = player.haste(SPAN, NOW);
        assert_eq!(player.planned_steps(&mut rng), 2);

        let _ = player.trap(SPAN, NOW);
        assert_eq!(player.planned_steps(&mut rng), 0);
    }

    #[test]
    fn slowed_moves_sometimes_drop() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut player = Player::new(CellCoord::new(0, 0));
        let _ = player.slow(SPAN, NOW);

        let outcomes: Vec<u32> = (0..200).map(|_| player.planned_steps(&mut rng)).collect();
        assert!(outcomes.contains(&0));
        assert!(outcomes.contains(&1));
        assert!(outcomes.iter().all(|steps| *steps <= 1));
    }
}
