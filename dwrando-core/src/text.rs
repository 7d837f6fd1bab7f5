//! In-game text encoding.
//!
//! The game stores dialogue with a 97-symbol alphabet where the byte value
//! is the index into the table below. 0x5f is a breaking space, 0x60 a
//! non-breaking one; characters with no encoding fall back to 0x5f.

const ALPHABET: &str = concat!(
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "__'______.,-_?!_)(_______________  ",
);

pub const BREAKING_SPACE: u8 = 0x5f;
/// End-of-line control byte in dialogue and title data.
pub const LINE_BREAK: u8 = 0xfc;

/// Encodes ASCII text into game bytes.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| ALPHABET.find(c).map_or(BREAKING_SPACE, |i| i as u8))
        .collect()
}

/// Decodes game bytes back into ASCII. Control bytes outside the alphabet
/// come back as '~'.
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| ALPHABET.as_bytes().get(b as usize).map_or('~', |&c| c as char))
        .collect()
}

/// Renders the title screen text block: banner, version, flags and seed,
/// centered on 32-column lines and padded to exactly `region_len` bytes.
pub fn build_title_screen(region_len: usize, seed: u64, flags: &str, version: &str) -> Vec<u8> {
    // 0xf7 n 0x5f expands to n spaces in the title renderer.
    let padding = |n: usize| vec![0xf7, n as u8, BREAKING_SPACE];
    let padline = |text: &str| -> Vec<u8> {
        let pad = 32usize.saturating_sub(text.len());
        let mut line = padding(pad / 2);
        line.extend(encode(text));
        line.extend(padding(pad - pad / 2));
        line.push(LINE_BREAK);
        line
    };
    let blank_line = || vec![0xf7, 32, BREAKING_SPACE, LINE_BREAK];

    let mut out = Vec::new();
    out.extend(blank_line());
    out.extend(padline("RANDOMIZER"));
    out.extend(blank_line());
    out.extend(padline(&version.to_uppercase()));
    out.extend(blank_line());
    out.extend(blank_line());
    out.extend(blank_line());
    out.extend(blank_line());
    out.extend(padline(&format!("FLAGS {}", flags.to_uppercase())));
    out.extend(blank_line());
    out.extend(padline(&format!("SEED {seed}")));
    out.extend(blank_line());

    // The remaining space is closed out with literal spaces plus one final
    // padded line. If it would not fit in a single line, trade the last
    // blank line for an uncompressed row of spaces first.
    let mut needed = region_len.saturating_sub(out.len() + 4);
    if needed > 31 {
        out.truncate(out.len() - 4);
        out.extend(std::iter::repeat(BREAKING_SPACE).take(32));
        out.push(LINE_BREAK);
        needed = region_len.saturating_sub(out.len() + 4);
    }
    out.extend(std::iter::repeat(BREAKING_SPACE).take(needed));
    out.extend(padding(32 - needed));
    out.push(LINE_BREAK);

    // The title alphabet has no lowercase glyphs at 0x47/0x49; remap to the
    // equivalents that do exist.
    for b in &mut out {
        match *b {
            0x47 => *b = 0x61,
            0x49 => *b = 0x63,
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let text = "Thou may go and search.";
        assert_eq!(decode(&encode(text)), text);
    }

    #[test]
    fn unknown_characters_become_spaces() {
        assert_eq!(encode("%"), vec![BREAKING_SPACE]);
    }

    #[test]
    fn space_encodes_as_breaking_space() {
        assert_eq!(encode(" "), vec![BREAKING_SPACE]);
    }

    #[test]
    fn title_screen_fills_the_region_exactly() {
        let region_len = 143;
        let block = build_title_screen(region_len, 12345, "ICzpWg", "0.1.0");
        assert_eq!(block.len(), region_len);
        assert_eq!(*block.last().unwrap(), LINE_BREAK);
        assert!(!block.contains(&0x47));
        assert!(!block.contains(&0x49));
    }
}
