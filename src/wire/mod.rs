// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Binary and JSON wire framing for the PoW handshake. See spec §4.2.

pub mod challenge_frame;
pub mod error;
pub mod quote_response;
pub mod solution_frame;

pub use challenge_frame::CHALLENGE_FRAME_LEN;
pub use error::FrameError;
pub use quote_response::{QuoteResponse, MAX_RESPONSE_LEN};
pub use solution_frame::SOLUTION_FRAME_LEN;
