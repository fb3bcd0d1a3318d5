//! Shared genomic primitives consumed by the calibration and calling layers.

/// Number of canonical bases tracked per pileup position.
pub const N_BASE: usize = 4;

/// Canonical nucleotide identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Base {
    /// Adenine.
    A,
    /// Cytosine.
    C,
    /// Guanine.
    G,
    /// Thymine (or uracil).
    T,
}

impl Base {
    /// All bases in index order.
    pub const ALL: [Base; N_BASE] = [Base::A, Base::C, Base::G, Base::T];

    /// Parse an ASCII base, returning `None` for ambiguity codes.
    pub fn from_ascii(base: u8) -> Option<Self> {
        match base {
            b'A' | b'a' => Some(Base::A),
            b'C' | b'c' => Some(Base::C),
            b'G' | b'g' => Some(Base::G),
            b'T' | b't' | b'U' | b'u' => Some(Base::T),
            _ => None,
        }
    }

    /// Position of this base in per-base count arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Uppercase ASCII representation.
    pub fn to_ascii(self) -> u8 {
        match self {
            Base::A => b'A',
            Base::C => b'C',
            Base::G => b'G',
            Base::T => b'T',
        }
    }
}

/// A single filtered basecall from the pileup at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseCall {
    /// Called base.
    pub base: Base,
    /// Whether the read supporting the call maps to the forward strand.
    pub is_fwd_strand: bool,
}

impl BaseCall {
    /// Construct a basecall record.
    pub fn new(base: Base, is_fwd_strand: bool) -> Self {
        Self {
            base,
            is_fwd_strand,
        }
    }
}

/// Classification of an indel allele for error-rate purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndelKind {
    /// Pure insertion relative to the reference.
    Insertion,
    /// Pure deletion relative to the reference.
    Deletion,
    /// Anything else (replacement, breakpoint, ...).
    Complex,
}

/// Identity of an indel allele.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndelKey {
    /// 0-based reference position of the indel.
    pub pos: u32,
    /// Indel classification.
    pub kind: IndelKind,
    /// Number of reference bases removed.
    pub deletion_length: u32,
    /// Inserted sequence (uppercase ASCII).
    pub inserted_sequence: Vec<u8>,
}

impl IndelKey {
    /// Pure insertion of `sequence` at `pos`.
    pub fn insertion(pos: u32, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            pos,
            kind: IndelKind::Insertion,
            deletion_length: 0,
            inserted_sequence: sequence.into(),
        }
    }

    /// Pure deletion of `length` reference bases at `pos`.
    pub fn deletion(pos: u32, length: u32) -> Self {
        Self {
            pos,
            kind: IndelKind::Deletion,
            deletion_length: length,
            inserted_sequence: Vec::new(),
        }
    }

    /// Replacement of `length` reference bases by `sequence`.
    pub fn complex(pos: u32, length: u32, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            pos,
            kind: IndelKind::Complex,
            deletion_length: length,
            inserted_sequence: sequence.into(),
        }
    }

    /// Whether this is a pure insertion or deletion.
    pub fn is_simple(&self) -> bool {
        matches!(self.kind, IndelKind::Insertion | IndelKind::Deletion)
    }
}

/// Repeat context of an indel used to look up its error rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndelRepeatContext {
    /// Length of the repeated unit (1 = homopolymer).
    pub repeat_unit_length: u32,
    /// Repeat count of the unit on the reference allele.
    pub ref_repeat_count: u32,
    /// Repeat count of the unit on the indel allele.
    pub indel_repeat_count: u32,
}

impl IndelRepeatContext {
    /// Construct a repeat context.
    pub fn new(repeat_unit_length: u32, ref_repeat_count: u32, indel_repeat_count: u32) -> Self {
        Self {
            repeat_unit_length,
            ref_repeat_count,
            indel_repeat_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_parsing_ignores_ambiguity_codes() {
        assert_eq!(Base::from_ascii(b'g'), Some(Base::G));
        assert_eq!(Base::from_ascii(b'U'), Some(Base::T));
        assert_eq!(Base::from_ascii(b'N'), None);
        assert_eq!(Base::C.index(), 1);
    }

    #[test]
    fn indel_key_simplicity() {
        assert!(IndelKey::insertion(10, b"A".to_vec()).is_simple());
        assert!(IndelKey::deletion(10, 2).is_simple());
        assert!(!IndelKey::complex(10, 2, b"T".to_vec()).is_simple());
    }
}
