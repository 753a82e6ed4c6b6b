#[macro_use]
pub mod encoding;
pub mod types;

mod frame;
mod frame_data;
pub mod packets;

pub use encoding::{LookupTable, Symbol, UnknownCode, UnknownSymbol};
pub use frame::{
    checksum, DataType, Frame, FrameAssembler, FrameError, FRAME_START, HEADER_LEN, MAX_FRAME_LEN,
};
pub use frame_data::*;
pub use packets::{InfoType, SetRequestData};
pub use types::*;
