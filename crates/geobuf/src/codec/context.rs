//! Per-call state threaded through the message codecs.

use crate::codec::coords::Quantizer;
use crate::model::KeyDictionary;

/// Encoder state: the quantizer and the key table being built.
#[derive(Debug)]
pub struct EncodeContext {
    pub quantizer: Quantizer,
    pub keys: KeyDictionary,
}

impl EncodeContext {
    pub fn new(quantizer: Quantizer) -> Self {
        Self {
            quantizer,
            keys: KeyDictionary::new(),
        }
    }
}

/// Decoder state: the quantizer and the key table read from the header.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'k> {
    pub quantizer: Quantizer,
    pub keys: &'k [String],
}
