//! Executable and object file headers.

use crate::common::binary::{read_u16_be, read_u16_le};
use crate::magic::signature_matches;

pub const ELF_SIGNATURE: &[u8] = b"\x7FELF";

const EI_DATA: usize = 5;
const E_TYPE: usize = 16;

/// `e_type` of an ELF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfType {
    Relocatable,
    Executable,
    SharedObject,
    Core,
}

/// Read `e_type` honouring the header's byte order.
pub fn elf_type(data: &[u8]) -> Option<ElfType> {
    if !signature_matches(data, ELF_SIGNATURE) {
        return None;
    }
    let e_type = match data.get(EI_DATA)? {
        1 => read_u16_le(data, E_TYPE).ok()?,
        2 => read_u16_be(data, E_TYPE).ok()?,
        _ => return None,
    };
    match e_type {
        1 => Some(ElfType::Relocatable),
        2 => Some(ElfType::Executable),
        3 => Some(ElfType::SharedObject),
        4 => Some(ElfType::Core),
        _ => None,
    }
}

pub fn is_elf_object(data: &[u8]) -> bool {
    elf_type(data) == Some(ElfType::Relocatable)
}

pub fn is_elf_executable(data: &[u8]) -> bool {
    elf_type(data) == Some(ElfType::Executable)
}

pub fn is_elf_shared(data: &[u8]) -> bool {
    elf_type(data) == Some(ElfType::SharedObject)
}

pub fn is_elf_core(data: &[u8]) -> bool {
    elf_type(data) == Some(ElfType::Core)
}
