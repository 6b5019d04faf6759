// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Re-exports of the domain error types, so callers outside this crate don't
//! need to know which submodule each one lives in.

pub use crate::client::error::ClientError;
pub use crate::pow::error::PowError;
pub use crate::quotes::QuoteError;
pub use crate::server::handler::HandlerError;
pub use crate::wire::error::FrameError;
