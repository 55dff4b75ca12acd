/// Left-hand block of a qwerty keyboard laid over the COSMAC hex keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r  =>  4 5 6 D
/// a s d f      7 8 9 E
/// z x c v      A 0 B F
/// ```
pub const CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// hex key for a physical key, case-insensitive
pub fn hex_key(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    CONVENTIONAL_KEYMAP
        .iter()
        .find(|(k, _)| *k == c)
        .map(|&(_, hex)| hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_hex_key_mapped_once() {
        let mut seen = [false; 16];
        for &(_, hex) in CONVENTIONAL_KEYMAP.iter() {
            assert!(!seen[hex as usize]);
            seen[hex as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_layout() {
        assert_eq!(hex_key('1'), Some(0x1));
        assert_eq!(hex_key('4'), Some(0xC));
        assert_eq!(hex_key('r'), Some(0xD));
        assert_eq!(hex_key('F'), Some(0xE));
        assert_eq!(hex_key('x'), Some(0x0));
        assert_eq!(hex_key('v'), Some(0xF));
        assert_eq!(hex_key('p'), None);
    }
}
