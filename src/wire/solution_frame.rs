// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use zerocopy::{
    byteorder::{BigEndian, U64},
    FromBytes, Immutable, IntoBytes, KnownLayout,
};

use super::error::FrameError;
use crate::pow::Solution;

/// On-the-wire size of a solution frame, in bytes.
pub const SOLUTION_FRAME_LEN: usize = 8;

/// Fixed 8-byte binary layout for a [`Solution`]: `nonce` as a big-endian
/// `u64`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct SolutionFrame {
    nonce: U64<BigEndian>,
}

const _: () = assert!(core::mem::size_of::<SolutionFrame>() == SOLUTION_FRAME_LEN);

impl From<Solution> for SolutionFrame {
    fn from(s: Solution) -> Self {
        SolutionFrame {
            nonce: U64::new(s.nonce),
        }
    }
}

impl From<SolutionFrame> for Solution {
    fn from(f: SolutionFrame) -> Self {
        Solution { nonce: f.nonce.get() }
    }
}

/// Encodes a solution into its 8-byte wire form.
pub fn encode(solution: &Solution) -> [u8; SOLUTION_FRAME_LEN] {
    let frame = SolutionFrame::from(*solution);
    let mut buf = [0u8; SOLUTION_FRAME_LEN];
    buf.copy_from_slice(frame.as_bytes());
    buf
}

/// Decodes an 8-byte solution frame. Returns [`FrameError::Truncated`] if
/// `bytes` is not exactly [`SOLUTION_FRAME_LEN`] long.
pub fn decode(bytes: &[u8]) -> Result<Solution, FrameError> {
    if bytes.len() != SOLUTION_FRAME_LEN {
        return Err(FrameError::Truncated {
            expected: SOLUTION_FRAME_LEN,
            got: bytes.len(),
        });
    }
    let frame = SolutionFrame::read_from_bytes(bytes)
        .unwrap_or_else(|_| unreachable!("length checked above"));
    Ok(frame.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let s = Solution { nonce: 0xDEAD_BEEF_0000_1234 };
        let decoded = decode(&encode(&s)).expect("decode");
        assert_eq!(decoded, s);
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let short = [0u8; 7];
        assert!(matches!(
            decode(&short),
            Err(FrameError::Truncated { expected: 8, got: 7 })
        ));
    }

    #[test]
    fn fuzz_round_trip() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..10_000 {
            let nonce: u64 = rng.random();
            let s = Solution { nonce };
            let decoded = decode(&encode(&s)).expect("decode");
            assert_eq!(decoded, s);
        }
    }
}
