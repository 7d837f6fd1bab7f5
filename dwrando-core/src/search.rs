//! Searchable item placement.
//!
//! Three items live at map coordinates instead of in chests: the token, the
//! flute and the armor. Each is a (placement, x, y) triple. The token is
//! relocated to reachable open land, then the three identities are permuted
//! across the original slot templates.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::map::MapGenerator;
use crate::{RandomizerError, Result};

const RETRY_LIMIT: usize = 100;

pub fn shuffle_searchables(
    token: &mut Vec<u8>,
    flute: &mut Vec<u8>,
    armor: &mut Vec<u8>,
    map: &dyn MapGenerator,
    rng: &mut StdRng,
) -> Result<()> {
    let start = map.start();
    let mut placed = false;
    for _ in 0..RETRY_LIMIT {
        let (x, y) = map.grid().accessible_land(start, rng).ok_or_else(|| {
            RandomizerError::Constraint(
                "no open land reachable from Tantegel; map layout is unusable".to_string(),
            )
        })?;
        // The three searchables must not stack on one tile.
        if (flute[1] == x && flute[2] == y) || (armor[1] == x && armor[2] == y) {
            continue;
        }
        token[1] = x;
        token[2] = y;
        placed = true;
        break;
    }
    if !placed {
        return Err(RandomizerError::Constraint(
            "could not find a free tile for the token".to_string(),
        ));
    }

    let mut slots = [token.clone(), flute.clone(), armor.clone()];
    slots.shuffle(rng);
    let [a, b, c] = slots;
    *token = a;
    *flute = b;
    *armor = c;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{tile, MapGenerator, MapGrid};
    use crate::patch::PatchLedger;
    use rand::{rngs::StdRng, SeedableRng};

    struct FixedMap {
        grid: MapGrid,
        start: (u8, u8),
    }

    impl MapGenerator for FixedMap {
        fn generate(&mut self, _rng: &mut StdRng) -> bool {
            true
        }
        fn generated(&self) -> bool {
            true
        }
        fn grid(&self) -> &MapGrid {
            &self.grid
        }
        fn start(&self) -> (u8, u8) {
            self.start
        }
        fn take_ledger(&mut self) -> PatchLedger {
            PatchLedger::new()
        }
    }

    fn island_map() -> FixedMap {
        let mut grid = MapGrid::filled(tile::WATER);
        for x in 20..30 {
            for y in 20..30 {
                grid.set(x, y, tile::GRASS);
            }
        }
        FixedMap { grid, start: (25, 25) }
    }

    #[test]
    fn identities_are_a_permutation_of_the_templates() {
        for seed in 0..50 {
            let map = island_map();
            let mut token = vec![1, 83, 113];
            let mut flute = vec![1, 104, 10];
            let mut armor = vec![1, 81, 1];
            let mut rng = StdRng::seed_from_u64(seed);
            shuffle_searchables(&mut token, &mut flute, &mut armor, &map, &mut rng).unwrap();

            // The relocated token landed on the island before the shuffle.
            let mut coords: Vec<(u8, u8)> = [&token, &flute, &armor]
                .iter()
                .map(|l| (l[1], l[2]))
                .collect();
            coords.sort_unstable();
            coords.dedup();
            assert_eq!(coords.len(), 3, "seed {seed}: searchables stacked");

            let on_island = coords
                .iter()
                .filter(|(x, y)| (20..30).contains(&(*x as usize)) && (20..30).contains(&(*y as usize)))
                .count();
            assert_eq!(on_island, 1, "seed {seed}");
        }
    }

    #[test]
    fn unreachable_map_is_a_constraint_error() {
        let map = FixedMap { grid: MapGrid::filled(tile::WATER), start: (5, 5) };
        let mut token = vec![1, 83, 113];
        let mut flute = vec![1, 104, 10];
        let mut armor = vec![1, 81, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let err = shuffle_searchables(&mut token, &mut flute, &mut armor, &map, &mut rng);
        assert!(err.is_err());
    }
}
