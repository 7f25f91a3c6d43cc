//! Region/NOS → font-bank lookup tables (spec §4.5). Used by the Grid
//! Builder to resolve the default Level 1 / G0 / G2 character sets, and by
//! the "modified G0/G2 character set" enhancement (mode 0x28).

/// Raw Level 1 (region, NOS) -> character set lookup, with no default
/// applied: callers decide the fallback (the "second" character set falls
/// back to the *default* character set, not a fixed constant).
pub fn l1_char_set_raw(region: u8, nos: u8) -> Option<u8> {
    match (region, nos) {
        (0, 0) => Some(12),
        (0, 1) => Some(15),
        (0, 2) => Some(22),
        (0, 3) => Some(16),
        (0, 4) => Some(14),
        (0, 5) => Some(19),
        (0, 6) => Some(11),
        (1, 0) => Some(18),
        (1, 1) => Some(15),
        (1, 2) => Some(22),
        (1, 3) => Some(16),
        (1, 4) => Some(14),
        (1, 6) => Some(19),
        (2, 0) => Some(12),
        (2, 1) => Some(15),
        (2, 2) => Some(22),
        (2, 3) => Some(16),
        (2, 4) => Some(14),
        (2, 5) => Some(19),
        (2, 6) => Some(23),
        (3, 5) => Some(21),
        (3, 7) => Some(20),
        (4, 0) => Some(1),
        (4, 1) => Some(15),
        (4, 2) => Some(13),
        (4, 3) => Some(17),
        (4, 4) => Some(2),
        (4, 5) => Some(3),
        (4, 6) => Some(11),
        (6, 6) => Some(23),
        (6, 7) => Some(4),
        (8, 0) => Some(12),
        (8, 4) => Some(14),
        (8, 7) => Some(5),
        (10, 5) => Some(6),
        (10, 7) => Some(5),
        _ => None,
    }
}

/// Level 1 character set for (region, NOS), default 12 (English) if
/// unmapped.
pub fn l1_char_set(region: u8, nos: u8) -> u8 {
    l1_char_set_raw(region, nos).unwrap_or(12)
}

/// Modified G0 character set for a given (region, NOS), default 0 (Latin).
pub fn g0_char_set(region: u8, nos: u8) -> u8 {
    match (region, nos) {
        (4, 0) => 1,
        (4, 4) => 2,
        (4, 5) => 3,
        (6, 7) => 4,
        (8, 7) => 5,
        (10, 5) => 6,
        (10, 7) => 5,
        _ => 0,
    }
}

/// Modified G2 character set for a given (region, NOS), default 7 (Latin).
pub fn g2_char_set(region: u8, nos: u8) -> u8 {
    match (region, nos) {
        (4, 0) => 8,
        (4, 4) => 8,
        (4, 5) => 8,
        (6, 7) => 9,
        (8, 0) => 10,
        (8, 4) => 10,
        (8, 7) => 10,
        (10, 5) => 10,
        (10, 7) => 10,
        _ => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_to_english_level1_set() {
        assert_eq!(l1_char_set(0, 0), 12);
        assert_eq!(l1_char_set(15, 7), 12); // unmapped -> default
    }

    #[test]
    fn raw_lookup_has_no_default() {
        assert_eq!(l1_char_set_raw(15, 7), None);
        assert_eq!(l1_char_set_raw(0, 0), Some(12));
    }

    #[rstest]
    #[case(0, 0, 12)] // English
    #[case(1, 0, 18)] // German
    #[case(4, 0, 1)] // Swedish/Finnish/Hungarian
    #[case(10, 5, 6)] // Arabic/French
    fn l1_char_set_matches_region_nos_table(#[case] region: u8, #[case] nos: u8, #[case] expect: u8) {
        assert_eq!(l1_char_set(region, nos), expect);
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(4, 0, 1)]
    #[case(4, 4, 2)]
    #[case(4, 5, 3)]
    #[case(6, 7, 4)]
    fn g0_char_set_matches_region_nos_table(#[case] region: u8, #[case] nos: u8, #[case] expect: u8) {
        assert_eq!(g0_char_set(region, nos), expect);
    }

    #[rstest]
    #[case(0, 0, 7)]
    #[case(4, 0, 8)]
    #[case(6, 7, 9)]
    #[case(8, 0, 10)]
    fn g2_char_set_matches_region_nos_table(#[case] region: u8, #[case] nos: u8, #[case] expect: u8) {
        assert_eq!(g2_char_set(region, nos), expect);
    }
}
