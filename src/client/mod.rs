// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The quote client: one handshake, start to finish, against a single
//! server address.

pub mod controller;
pub mod error;

pub use controller::get_quote;
pub use error::ClientError;
