//! Weapon shop inventories.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{RandomizerError, Result};

pub const SHOP_COUNT: usize = 7;
/// Every purchasable weapon and armor id; 6 and 13 are gaps in the table.
const WEAPON_POOL: [u8; 15] = [0, 1, 2, 3, 4, 5, 7, 8, 9, 10, 11, 12, 14, 15, 16];
/// Shops are separated by a sentinel in the serialized table.
pub const SHOP_SENTINEL: u8 = 0xfd;
/// 36 item slots plus 7 sentinels.
pub const INVENTORY_LEN: usize = 43;

const RETRY_LIMIT: usize = 1000;

/// Builds seven shops of five unique items, gives one random shop a sixth,
/// sorts each shop and serializes them with sentinel separators.
pub fn randomize_shops(rng: &mut StdRng) -> Result<Vec<u8>> {
    let mut shops: Vec<Vec<u8>> = Vec::with_capacity(SHOP_COUNT);
    for _ in 0..SHOP_COUNT {
        let mut shop = Vec::with_capacity(6);
        while shop.len() < 5 {
            let item = draw_new_item(&shop, rng)?;
            shop.push(item);
        }
        shops.push(shop);
    }

    // One shop gets a sixth item; there are 36 slots for 35 draws.
    let six_item_shop = rng.gen_range(0..SHOP_COUNT);
    let extra = draw_new_item(&shops[six_item_shop], rng)?;
    shops[six_item_shop].push(extra);

    let mut inventory = Vec::with_capacity(INVENTORY_LEN);
    for shop in &mut shops {
        shop.sort_unstable();
        inventory.extend_from_slice(shop);
        inventory.push(SHOP_SENTINEL);
    }
    Ok(inventory)
}

fn draw_new_item(shop: &[u8], rng: &mut StdRng) -> Result<u8> {
    for _ in 0..RETRY_LIMIT {
        let item = *WEAPON_POOL.as_slice().choose(rng).unwrap();
        if !shop.contains(&item) {
            return Ok(item);
        }
    }
    Err(RandomizerError::Constraint(
        "could not draw a unique shop item".to_string(),
    ))
}

/// Splits a serialized inventory back into per-shop item lists.
pub fn parse_inventory(inventory: &[u8]) -> Vec<Vec<u8>> {
    inventory
        .split(|&b| b == SHOP_SENTINEL)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn shops_are_unique_sorted_and_sized() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let inventory = randomize_shops(&mut rng).unwrap();
            assert_eq!(inventory.len(), INVENTORY_LEN);

            let shops = parse_inventory(&inventory);
            assert_eq!(shops.len(), SHOP_COUNT);

            let mut six_item_shops = 0;
            for shop in &shops {
                match shop.len() {
                    5 => {}
                    6 => six_item_shops += 1,
                    n => panic!("seed {seed}: shop with {n} items"),
                }
                for w in shop.windows(2) {
                    assert!(w[0] < w[1], "seed {seed}: shop not strictly ascending: {shop:?}");
                }
                for item in shop {
                    assert!(WEAPON_POOL.contains(item), "seed {seed}: item {item} not in pool");
                }
            }
            assert_eq!(six_item_shops, 1, "seed {seed}");
        }
    }

    #[test]
    fn serialization_ends_with_a_sentinel() {
        let mut rng = StdRng::seed_from_u64(1);
        let inventory = randomize_shops(&mut rng).unwrap();
        assert_eq!(*inventory.last().unwrap(), SHOP_SENTINEL);
    }
}
