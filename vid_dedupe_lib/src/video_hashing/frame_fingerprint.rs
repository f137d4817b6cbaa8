use bitvec::prelude::*;
use image::{imageops, GrayImage};

use crate::Error;

/// The difference hash ("dhash") of a single video frame.
///
/// The frame is downsampled to a `(N+1) x N` grayscale grid and each of the
/// `N x N` bits records whether one pixel is darker than its right
/// neighbour. Two frames showing the same content produce fingerprints with
/// a small hamming distance, regardless of resolution or encoding quality.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct FrameFingerprint {
    bits: BitVec<usize, Lsb0>,
}

impl FrameFingerprint {
    /// Computes the fingerprint of one grayscale still.
    ///
    /// `hash_size` is the edge size N of the bit grid; the result always
    /// carries exactly `N * N` bits. The same still with the same
    /// `hash_size` always produces the same fingerprint.
    ///
    /// # Errors
    /// [`Error::InvalidImage`] if the still has a zero dimension.
    pub fn from_frame(frame: &GrayImage, hash_size: u32) -> Result<Self, Error> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidImage(format!("{width}x{height} frame")));
        }

        //Lanczos, matching the downsampling of the classic PIL-based dhash
        //implementations.
        let small = imageops::resize(
            frame,
            hash_size + 1,
            hash_size,
            imageops::FilterType::Lanczos3,
        );

        let mut bits = BitVec::with_capacity((hash_size * hash_size) as usize);
        for row in 0..hash_size {
            for col in 0..hash_size {
                let left = small.get_pixel(col, row).0[0];
                let right = small.get_pixel(col + 1, row).0[0];
                bits.push(left < right);
            }
        }

        Ok(Self { bits })
    }

    /// The number of bits in this fingerprint (the hash size squared).
    #[must_use]
    pub fn num_bits(&self) -> u32 {
        self.bits.len() as u32
    }

    /// The raw hamming distance from this fingerprint to another.
    #[must_use]
    pub fn hamming_distance(&self, other: &Self) -> u32 {
        self.bits
            .iter()
            .by_vals()
            .zip(other.bits.iter().by_vals())
            .fold(0, |acc, (x, y)| acc + u32::from(x != y))
    }
}

//Utilities for testing
#[doc(hidden)]
pub mod test_util {
    use super::FrameFingerprint;
    use bitvec::prelude::*;

    #[doc(hidden)]
    impl FrameFingerprint {
        /// Builds a fingerprint directly from bit values.
        pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
            Self {
                bits: bits.into_iter().collect::<BitVec<usize, Lsb0>>(),
            }
        }

        /// An all-zeroes fingerprint of `num_bits` bits.
        #[must_use]
        pub fn empty_fingerprint(num_bits: u32) -> Self {
            Self::from_bits((0..num_bits).map(|_| false))
        }

        /// A copy of this fingerprint with the bits at `positions` flipped.
        #[must_use]
        pub fn with_flipped_bits(&self, positions: &[usize]) -> Self {
            let mut ret = self.clone();
            for &pos in positions {
                let val = ret.bits[pos];
                ret.bits.set(pos, !val);
            }
            ret
        }
    }
}

#[cfg(test)]
mod test {
    use image::GrayImage;
    use rand::prelude::*;

    use super::FrameFingerprint;
    use crate::Error;

    fn gradient_frame(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| image::Luma([(x * 7 + y * 3) as u8]))
    }

    #[test]
    fn fingerprint_has_hash_size_squared_bits() {
        let frame = gradient_frame(64, 48);
        for hash_size in [2, 4, 8, 16] {
            let fingerprint = FrameFingerprint::from_frame(&frame, hash_size).unwrap();
            assert_eq!(fingerprint.num_bits(), hash_size * hash_size);
        }
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let frame = gradient_frame(120, 90);
        let fingerprint_1 = FrameFingerprint::from_frame(&frame, 8).unwrap();
        let fingerprint_2 = FrameFingerprint::from_frame(&frame, 8).unwrap();
        assert_eq!(fingerprint_1, fingerprint_2);
    }

    //a frame whose rows strictly brighten to the right must set every bit
    #[test]
    fn rising_rows_set_every_bit() {
        let frame = GrayImage::from_fn(9, 8, |x, _y| image::Luma([(x * 25) as u8]));
        let fingerprint = FrameFingerprint::from_frame(&frame, 8).unwrap();
        let all_ones = FrameFingerprint::from_bits((0..64).map(|_| true));
        assert_eq!(fingerprint, all_ones);
    }

    #[test]
    fn flat_frame_sets_no_bits() {
        let frame = GrayImage::from_pixel(64, 64, image::Luma([128]));
        let fingerprint = FrameFingerprint::from_frame(&frame, 8).unwrap();
        assert_eq!(fingerprint, FrameFingerprint::empty_fingerprint(64));
    }

    #[test]
    fn zero_dimension_frame_is_rejected() {
        let frame = GrayImage::new(0, 0);
        let result = FrameFingerprint::from_frame(&frame, 8);
        assert!(matches!(result, Err(Error::InvalidImage(_))));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let frame = gradient_frame(33, 31);
        let fingerprint = FrameFingerprint::from_frame(&frame, 8).unwrap();
        assert_eq!(fingerprint.hamming_distance(&fingerprint), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        for _i in 0..1_000 {
            let fingerprint_1 = random_fingerprint(&mut rng);
            let fingerprint_2 = random_fingerprint(&mut rng);
            assert_eq!(
                fingerprint_1.hamming_distance(&fingerprint_2),
                fingerprint_2.hamming_distance(&fingerprint_1)
            );
        }
    }

    #[test]
    fn distance_is_bounded_by_bit_count() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        for _i in 0..1_000 {
            let fingerprint_1 = random_fingerprint(&mut rng);
            let fingerprint_2 = random_fingerprint(&mut rng);
            assert!(fingerprint_1.hamming_distance(&fingerprint_2) <= 64);
        }
    }

    #[test]
    fn flipping_every_bit_gives_full_distance() {
        let empty = FrameFingerprint::empty_fingerprint(64);
        let full = empty.with_flipped_bits(&(0..64).collect::<Vec<_>>());
        assert_eq!(empty.hamming_distance(&full), 64);
    }

    fn random_fingerprint(rng: &mut StdRng) -> FrameFingerprint {
        FrameFingerprint::from_bits((0..64).map(|_| rng.gen_bool(0.5)))
    }
}
