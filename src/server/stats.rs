// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Lock-free counters shared by every connection handler.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Server-wide counters, updated from any handler task without locking.
#[derive(Debug, Default)]
pub struct ServerStats {
    pub accepted: AtomicU64,
    pub challenges_sent: AtomicU64,
    pub solutions_accepted: AtomicU64,
    pub solutions_rejected: AtomicU64,
    pub stale_rejected: AtomicU64,
    pub timed_out: AtomicU64,
    /// Total bytes read across every connection, tallied by `TrackedStream`.
    pub bytes_read: AtomicU64,
    /// Total bytes written across every connection, tallied by `TrackedStream`.
    pub bytes_written: AtomicU64,
    /// Unix seconds of the most recent state transition, for idle reporting.
    pub last_activity: AtomicI64,
}

impl ServerStats {
    pub fn touch(&self, now_unix: i64) {
        self.last_activity.store(now_unix, Ordering::Relaxed);
    }

    pub fn record_accept(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bytes_read(&self, n: u64) {
        self.bytes_read.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_bytes_written(&self, n: u64) {
        self.bytes_written.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_challenge_sent(&self) {
        self.challenges_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_solution_accepted(&self) {
        self.solutions_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_solution_rejected(&self) {
        self.solutions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_rejected(&self) {
        self.stale_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timed_out(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }
}
