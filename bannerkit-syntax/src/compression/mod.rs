//! Decompression codecs used by the U8 archive walker and the TPL decoder.

mod lz77;
mod yaz0;

pub use lz77::{SizeOrder, decode_lz77, decode_lz_raw};
pub use yaz0::decode_yaz0;
