//! Combat rules.
//!
//! Pure functions over positions and the health pool, so hit and damage
//! semantics stay testable without a socket in sight. Distances are
//! measured between horizontal sprite centers.

/// Sprite width in world units.
pub const SPRITE_WIDTH: i32 = 60;
/// Offset from a player's `x` to their sprite center.
pub const HALF_SPRITE_WIDTH: i32 = SPRITE_WIDTH / 2;
/// Maximum center-to-center distance at which an attack connects.
pub const HIT_RANGE: i32 = 10;

/// Health pool domain is `[0, MAX_HEALTH]`.
pub const MAX_HEALTH: i32 = 100;
/// Damage taken by a guarding defender.
pub const GUARDED_DAMAGE: i32 = 2;
/// Damage taken by an unguarded defender.
pub const UNGUARDED_DAMAGE: i32 = 5;

/// Horizontal sprite center for a player at `x`.
pub fn center_x(x: i32) -> i32 {
    x + HALF_SPRITE_WIDTH
}

/// Whether an attack launched at `attacker_x` reaches a defender at
/// `defender_x`. Symmetric in its arguments.
pub fn hit_connects(attacker_x: i32, defender_x: i32) -> bool {
    (center_x(attacker_x) - center_x(defender_x)).abs() <= HIT_RANGE
}

/// Damage dealt by a connecting attack against a defender.
pub fn damage_against(guarding: bool) -> i32 {
    if guarding {
        GUARDED_DAMAGE
    } else {
        UNGUARDED_DAMAGE
    }
}

/// Applies `damage` to `health`, clamping at zero.
pub fn apply_damage(health: i32, damage: i32) -> i32 {
    (health - damage).max(0)
}

/// Match outcome, derived fresh from the health pool for every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Undecided,
    SlotZero,
    SlotOne,
}

impl Winner {
    /// Wire encoding: 0 = undecided, 1 = slot 0 wins, 2 = slot 1 wins.
    pub fn code(self) -> u8 {
        match self {
            Winner::Undecided => 0,
            Winner::SlotZero => 1,
            Winner::SlotOne => 2,
        }
    }
}

/// Derives `(game_over, winner)` from the health pool.
///
/// Slot 0's health is checked first, so a simultaneous double KO goes to
/// slot 1. Documented tie-break, not an accident.
pub fn outcome(health: [i32; 2]) -> (bool, Winner) {
    if health[0] <= 0 {
        (true, Winner::SlotOne)
    } else if health[1] <= 0 {
        (true, Winner::SlotZero)
    } else {
        (false, Winner::Undecided)
    }
}
