#![forbid(unsafe_code)]

pub mod cell;
pub mod charset;
pub mod decoder;
pub mod enhance;
pub mod grid;
pub mod invocation;
pub mod level;
pub mod object;
pub mod overlay;
pub mod packet;
pub mod palette;
pub mod reader;
pub mod triplet;

pub use cell::{Attribute, Cell, CellChar, DisplayAttr, Fragment};
pub use decoder::Decoder;
pub use level::Level;
pub use packet::PacketMap;
