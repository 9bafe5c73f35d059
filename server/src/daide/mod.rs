//! The DAIDE binary token dialect used by bot clients.
//!
//! A DAIDE message is a length-prefixed sequence of 16-bit tokens. Most
//! tokens are opcodes from the published dictionary (provinces, powers,
//! order/press keywords, punctuation); integers and ASCII text are carried
//! inline using the reserved integer and text token ranges. This module
//! provides the token dictionary, the binary codec, and a mapping between
//! DAIDE messages and the same internal request/notification model the JSON
//! dialect uses, so a DAIDE bot and a JSON UI observe identical server-side
//! effects.

pub mod dict;
mod codec;
mod message;

pub use codec::{decode_frame, encode_frame, CodecError};
pub use message::{DaideMessage, Press};
