//! Binary delta wire format: encoding, decoding, composition, folding, and
//! application.

pub mod apply;
pub mod compose;
pub mod decoder;
pub mod encoder;
pub mod fold;
pub mod fragment;

pub use apply::{apply, patchedsize, InvalidPatch};
pub use compose::combine;
pub use decoder::{decode, DecodeError};
pub use encoder::{encode, EncodeError};
pub use fold::{fold, FoldError};
pub use fragment::Fragment;
