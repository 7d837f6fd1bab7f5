//! Hint dialogue for the searchable item still out on the overworld.
//!
//! Runs after every placement pass. The NPC describes direction and
//! distance from Tantegel to whichever searchable remains on the map, in
//! priority order token, flute, armor; if everything was relocated into
//! chests the hint degrades to a generic pep talk.

use crate::text;

/// Control bytes between the two halves of an NPC line.
const LINE_SPLIT: [u8; 3] = [0xfc, 0xfb, 0x50];

/// Builds the replacement dialogue bytes for the hint NPC. Each `*_loc`
/// is a (placement, x, y) triple; `tantegel` is the castle's overworld
/// tile.
pub fn token_dialogue(
    token_loc: &[u8],
    flute_loc: &[u8],
    armor_loc: &[u8],
    tantegel: (u8, u8),
) -> Vec<u8> {
    let target = [token_loc, flute_loc, armor_loc]
        .into_iter()
        .find(|loc| loc[0] == 1)
        .map(|loc| (loc[1], loc[2]));

    match target {
        Some((x, y)) => {
            let mut out = text::encode("Thou may go and search.");
            out.extend_from_slice(&LINE_SPLIT);
            out.extend(text::encode(&hint_text((x, y), tantegel)));
            out
        }
        None => {
            let mut out = text::encode("Thou must go and fight!");
            out.extend_from_slice(&LINE_SPLIT);
            out.extend(text::encode(
                "Go forth, descendent of Erdrick, I have complete faith in thy victory! ",
            ));
            out
        }
    }
}

fn hint_text(item: (u8, u8), tantegel: (u8, u8)) -> String {
    let (x, y) = (item.0 as i16, item.1 as i16);
    let (tx, ty) = (tantegel.0 as i16, tantegel.1 as i16);
    let north_south = if y < ty { "north" } else { "south" };
    let east_west = if x < tx { "west" } else { "east" };
    format!(
        "From Tantegel Castle travel {:2} leagues to the {} and {:2} to the {}.",
        (y - ty).abs(),
        north_south,
        (x - tx).abs(),
        east_west,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_names_direction_and_distance() {
        // 5 tiles north, 3 tiles west of Tantegel.
        let text = hint_text((40, 38), (43, 43));
        assert_eq!(
            text,
            "From Tantegel Castle travel  5 leagues to the north and  3 to the west."
        );
    }

    #[test]
    fn hint_flips_to_south_and_east() {
        let text = hint_text((50, 60), (43, 43));
        assert!(text.contains("17 leagues to the south"));
        assert!(text.contains(" 7 to the east"));
    }

    #[test]
    fn priority_is_token_then_flute_then_armor() {
        let token = [0, 1, 1];
        let flute = [1, 43, 38];
        let armor = [1, 99, 99];
        let bytes = token_dialogue(&token, &flute, &armor, (43, 43));
        let decoded = text::decode(&bytes);
        assert!(decoded.contains("5 leagues to the north"), "{decoded}");
    }

    #[test]
    fn all_items_claimed_yields_the_fallback() {
        let gone = [0, 0, 0];
        let bytes = token_dialogue(&gone, &gone, &gone, (43, 43));
        let decoded = text::decode(&bytes);
        assert!(decoded.contains("Thou must go and fight!"), "{decoded}");
    }

    #[test]
    fn dialogue_fits_the_rom_region() {
        let on_map = [1, 0, 119];
        let region = crate::regions::RegionId::TokenDialogue.region();
        assert!(token_dialogue(&on_map, &on_map, &on_map, (43, 43)).len() <= region.count);
        assert!(token_dialogue(&[0, 0, 0], &[0, 0, 0], &[0, 0, 0], (43, 43)).len() <= region.count);
    }
}
