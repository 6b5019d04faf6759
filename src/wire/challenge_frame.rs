// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use zerocopy::{
    byteorder::{BigEndian, I32, I64},
    FromBytes, Immutable, IntoBytes, KnownLayout,
};

use super::error::FrameError;
use crate::pow::Challenge;

/// On-the-wire size of a challenge frame, in bytes.
pub const CHALLENGE_FRAME_LEN: usize = 44;

/// Fixed 44-byte binary layout for a [`Challenge`]:
///
/// ```text
/// bytes  0.. 7   timestamp   (int64, BE)
/// bytes  8..39   randomBytes (32 bytes, opaque)
/// bytes 40..43   difficulty  (int32, BE)
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ChallengeFrame {
    timestamp: I64<BigEndian>,
    random_bytes: [u8; 32],
    difficulty: I32<BigEndian>,
}

const _: () = assert!(core::mem::size_of::<ChallengeFrame>() == CHALLENGE_FRAME_LEN);

impl From<Challenge> for ChallengeFrame {
    fn from(c: Challenge) -> Self {
        ChallengeFrame {
            timestamp: I64::new(c.timestamp),
            random_bytes: c.random_bytes,
            difficulty: I32::new(c.difficulty),
        }
    }
}

impl From<ChallengeFrame> for Challenge {
    fn from(f: ChallengeFrame) -> Self {
        Challenge {
            timestamp: f.timestamp.get(),
            random_bytes: f.random_bytes,
            difficulty: f.difficulty.get(),
        }
    }
}

/// Encodes a challenge into its 44-byte wire form.
pub fn encode(challenge: &Challenge) -> [u8; CHALLENGE_FRAME_LEN] {
    let frame = ChallengeFrame::from(*challenge);
    let mut buf = [0u8; CHALLENGE_FRAME_LEN];
    buf.copy_from_slice(frame.as_bytes());
    buf
}

/// Decodes a 44-byte challenge frame. Returns [`FrameError::Truncated`] if
/// `bytes` is not exactly [`CHALLENGE_FRAME_LEN`] long.
pub fn decode(bytes: &[u8]) -> Result<Challenge, FrameError> {
    if bytes.len() != CHALLENGE_FRAME_LEN {
        return Err(FrameError::Truncated {
            expected: CHALLENGE_FRAME_LEN,
            got: bytes.len(),
        });
    }
    let frame = ChallengeFrame::read_from_bytes(bytes)
        .unwrap_or_else(|_| unreachable!("length checked above"));
    Ok(frame.into())
}
