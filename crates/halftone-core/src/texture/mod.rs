//! Precomputed dither texture packs.
//!
//! A texture pack is a ladder of binary masks, one per coverage level. The
//! texture-based dot shapes pick the mask matching the sampled intensity and
//! stamp it into the halftone cell.
//!
//! | Pack | Mask side | Relative size | Masks |
//! |------|-----------|---------------|-------|
//! | [`PackKind::Dot`] | 10 | 1 | 101 |
//! | [`PackKind::Euclidean`] | 30 | 3 | 101 |
//! | [`PackKind::Bayer4`] | 4 | 1 | 17 |
//! | [`PackKind::Bayer8`] | 8 | 1 | 65 |
//!
//! Packs are built on first use and shared read-only for the rest of the
//! process.
//!
//! ```
//! use halftone_core::texture::PackKind;
//!
//! let pack = PackKind::Bayer4.pack();
//! assert_eq!(pack.len(), 17);
//! assert_eq!(pack.get(16).unwrap().count_on(), 16);
//! ```

mod mask;
mod pack;

use std::sync::OnceLock;

pub use mask::TextureMask;
pub use pack::{bayer_index_matrix, bayer_pack, clustered_dot_pack, euclidean_pack, TexturePack};

/// Side of the clustered-dot and Euclidean base patterns.
pub const DOT_PACK_SIZE: usize = 10;

static DOT_PACK: OnceLock<TexturePack> = OnceLock::new();
static EUCLIDEAN_PACK: OnceLock<TexturePack> = OnceLock::new();
static BAYER4_PACK: OnceLock<TexturePack> = OnceLock::new();
static BAYER8_PACK: OnceLock<TexturePack> = OnceLock::new();

/// The four built-in texture families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackKind {
    /// Clustered dot growing from the centre
    Dot,
    /// Euclidean dot that merges with its neighbours past 50%
    Euclidean,
    /// 4×4 Bayer ordered dither
    Bayer4,
    /// 8×8 Bayer ordered dither
    Bayer8,
}

impl PackKind {
    pub const ALL: [PackKind; 4] = [Self::Dot, Self::Euclidean, Self::Bayer4, Self::Bayer8];

    /// The shared pack, built on first access.
    pub fn pack(self) -> &'static TexturePack {
        match self {
            Self::Dot => DOT_PACK.get_or_init(|| build(self)),
            Self::Euclidean => EUCLIDEAN_PACK.get_or_init(|| build(self)),
            Self::Bayer4 => BAYER4_PACK.get_or_init(|| build(self)),
            Self::Bayer8 => BAYER8_PACK.get_or_init(|| build(self)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Euclidean => "euclidean",
            Self::Bayer4 => "bayer4",
            Self::Bayer8 => "bayer8",
        }
    }
}

fn build(kind: PackKind) -> TexturePack {
    let pack = match kind {
        PackKind::Dot => clustered_dot_pack(DOT_PACK_SIZE),
        PackKind::Euclidean => euclidean_pack(DOT_PACK_SIZE),
        PackKind::Bayer4 => bayer_pack(4),
        PackKind::Bayer8 => bayer_pack(8),
    };
    tracing::debug!(pack = kind.name(), masks = pack.len(), "Built texture pack");
    pack
}

/// Build every pack now instead of on the first frame that needs it.
pub fn warm_up() {
    for kind in PackKind::ALL {
        kind.pack();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_sizes() {
        assert_eq!(PackKind::Dot.pack().len(), 101);
        assert_eq!(PackKind::Euclidean.pack().len(), 101);
        assert_eq!(PackKind::Bayer4.pack().len(), 17);
        assert_eq!(PackKind::Bayer8.pack().len(), 65);
    }

    #[test]
    fn test_packs_are_shared() {
        assert!(std::ptr::eq(PackKind::Dot.pack(), PackKind::Dot.pack()));
    }

    #[test]
    fn test_euclidean_masks_are_padded() {
        let mask = PackKind::Euclidean.pack().get(0).unwrap();
        assert_eq!(mask.size(), 30);
        assert_eq!(mask.relative_size(), 3.0);
    }
}
