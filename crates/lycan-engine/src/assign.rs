//! Dealing roles.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{ConfigError, GameConfig, Role};

/// Builds the role pool for `players` seats and shuffles it.
///
/// The pool is the head of each priority list plus civilians, exactly
/// as the preset asks. With `jester_probability`, and only when at
/// least two civilians are dealt, one civilian seat becomes the Jester.
/// The returned vector is in seat order: entry `i` goes to roster
/// entry `i`.
pub fn deal_roles<R: Rng + ?Sized>(
    config: &GameConfig,
    players: usize,
    rng: &mut R,
) -> Result<Vec<Role>, ConfigError> {
    let preset = config.preset_for(players)?;

    let wolves = head("werewolf", &config.werewolf_priority, preset.werewolves)?;
    let priests = head("priesthood", &config.priesthood_priority, preset.priesthood)?;

    let mut pool = Vec::with_capacity(players);
    pool.extend_from_slice(wolves);
    pool.extend_from_slice(priests);

    let mut civilians = preset.civilians;
    let chance = config.jester_probability;
    if civilians >= 2 && chance > 0.0 && rng.random_bool(chance.min(1.0)) {
        pool.push(Role::Jester);
        civilians -= 1;
    }
    pool.extend(std::iter::repeat_n(Role::Civilian, civilians));

    pool.shuffle(rng);
    Ok(pool)
}

fn head<'a>(
    list: &'static str,
    roles: &'a [Role],
    needed: usize,
) -> Result<&'a [Role], ConfigError> {
    roles
        .get(..needed)
        .ok_or(ConfigError::PriorityListTooShort {
            list,
            needed,
            available: roles.len(),
        })
}
