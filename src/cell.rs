//! Grid element types: character identity, attributes and enlargement
//! fragment. Flat, `Copy` records — enlargement propagation deep-copies
//! these into companion cells rather than sharing references (spec §9).

/// A cell's participation in single/double-height/width/size rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fragment {
    #[default]
    Normal,
    DhTop,
    DhBottom,
    DwLeft,
    DwRight,
    DsTopLeft,
    DsTopRight,
    DsBottomLeft,
    DsBottomRight,
}

/// Flash attributes. `mode`: 0 steady, 1 normal, 2 invert, 3 adjacent-CLUT.
/// `rate_phase`: 0..=5 (4 and 5 are incremental/decremental). `phase_shown`
/// equals `rate_phase` except when `rate_phase` is 4 or 5, in which case it
/// is recomputed per-column during the grid pass (spec §4.5 step 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashAttr {
    pub mode: u8,
    pub rate_phase: u8,
    pub phase_shown: u8,
}

impl Default for FlashAttr {
    fn default() -> Self {
        Self {
            mode: 0,
            rate_phase: 0,
            phase_shown: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayAttr {
    pub dheight: bool,
    pub dwidth: bool,
    pub box_win: bool,
    pub conceal: bool,
    pub invert: bool,
    pub und_sep: bool,
}

/// A cell's non-character attributes. `foreground`/`background` are
/// palette indices 0–31; 8 means "transparent", resolved at accessor time
/// against row colour and box/window state (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub foreground: u8,
    pub background: u8,
    pub flash: FlashAttr,
    pub display: DisplayAttr,
}

impl Default for Attribute {
    fn default() -> Self {
        Self {
            foreground: 7,
            background: 0,
            flash: FlashAttr::default(),
            display: DisplayAttr::default(),
        }
    }
}

/// A cell's character identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChar {
    pub code: u8,
    pub set: u8,
    pub diacritic: u8,
}

impl Default for CellChar {
    fn default() -> Self {
        Self {
            code: 0x20,
            set: 0,
            diacritic: 0,
        }
    }
}

/// One grid element: character, attribute, and enlargement fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cell {
    pub ch: CellChar,
    pub attr: Attribute,
    pub fragment: Fragment,
}
