//! Decodes the minimal subset of DWARF location expressions the translator
//! needs: a bare `DW_OP_addr` operation yielding an absolute address
//! (spec §4.2). Anything else — an empty expression, or a leading opcode
//! other than `DW_OP_addr` — is `IncorrectLocationEncoding`; thread-local and
//! computed locations are explicitly out of scope (spec §9).

use crate::error::TranslateError;

const DW_OP_ADDR: u8 = 0x03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Default for Endianness {
    fn default() -> Self {
        Endianness::Little
    }
}

/// Evaluates a location expression to an absolute address.
pub fn eval_address(location: &[u8], endianness: Endianness) -> Result<u64, TranslateError> {
    let (opcode, rest) = location
        .split_first()
        .ok_or(TranslateError::IncorrectLocationEncoding)?;

    if *opcode != DW_OP_ADDR {
        return Err(TranslateError::IncorrectLocationEncoding);
    }

    let digits: Box<dyn Iterator<Item = &u8>> = match endianness {
        Endianness::Little => Box::new(rest.iter().rev()),
        Endianness::Big => Box::new(rest.iter()),
    };

    Ok(digits.fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}
