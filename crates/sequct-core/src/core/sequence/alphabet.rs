use phf::{Map, phf_map};

/// The 20 canonical amino acids, in the column order used by profile models.
pub const AA_VOCAB: &str = "ACDEFGHIKLMNPQRSTVWY";

pub const AA_VOCAB_SIZE: usize = 20;

static RESIDUE_INDEX: Map<char, usize> = phf_map! {
    'A' => 0, 'C' => 1, 'D' => 2, 'E' => 3, 'F' => 4,
    'G' => 5, 'H' => 6, 'I' => 7, 'K' => 8, 'L' => 9,
    'M' => 10, 'N' => 11, 'P' => 12, 'Q' => 13, 'R' => 14,
    'S' => 15, 'T' => 16, 'V' => 17, 'W' => 18, 'Y' => 19,
};

/// Returns the column index of a one-letter residue code, or `None` for
/// anything outside the canonical vocabulary.
#[inline]
pub fn residue_index(residue: char) -> Option<usize> {
    RESIDUE_INDEX.get(&residue).copied()
}

#[inline]
pub fn is_canonical_residue(residue: char) -> bool {
    RESIDUE_INDEX.contains_key(&residue)
}

pub fn residues() -> impl Iterator<Item = char> {
    AA_VOCAB.chars()
}
