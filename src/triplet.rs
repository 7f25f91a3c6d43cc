//! Splits an 18-bit X/26-family triplet into its (address, mode, data)
//! fields. Total for any 18-bit input — never fails.

/// A triplet split into its three ETSI EN 300 706 fields.
///
/// Row triplets (`address ∈ [40, 63]`) act on the current row; column
/// triplets (`address ∈ [0, 39]`) set the active column. `0x20` is folded
/// into `mode` for column triplets so both classes dispatch through one
/// table (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitTriplet {
    pub address: u8,
    pub mode: u8,
    pub data: u8,
}

/// Split an 18-bit triplet (`address`: 6 bits, `mode`: 5 bits, `data`: 7
/// bits, little end first) into its fields.
pub fn split(triplet: u32) -> SplitTriplet {
    let address = (triplet & 0x3f) as u8;
    let mut mode = ((triplet >> 6) & 0x1f) as u8;
    let data = (triplet >> 11) as u8;
    if address < 40 {
        mode |= 0x20;
    }
    SplitTriplet { address, mode, data }
}

/// Address-to-row mapping used by both invocation levels: address 40 is
/// row 24, addresses 41..63 are rows 1..23 (address 0 is never passed here
/// as a row address; row 0 is reached via the 0x07 "address row 0" mode).
pub fn address_to_row(address: u8) -> u8 {
    if address == 40 {
        24
    } else {
        address - 40
    }
}
