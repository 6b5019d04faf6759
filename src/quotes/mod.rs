// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The quote catalog: a pure "draw one at random" function over a fixed,
//! non-empty list.

use rand::Rng;
use thiserror::Error;

/// A single quotation drawn from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("no quotes configured")]
    NoQuotesConfigured,
}

/// The built-in catalog, carried over from the reference implementation.
const CATALOG: &[&str] = &[
    "The greatest glory in living lies not in never falling, but in rising every time we fall. - Nelson Mandela",
    "The way to get started is to quit talking and begin doing. - Walt Disney",
    "Your time is limited, don't waste it living someone else's life. - Steve Jobs",
    "If life were predictable it would cease to be life, and be without flavor. - Eleanor Roosevelt",
    "If you look at what you have in life, you'll always have more. If you look at what you don't have in life, you'll never have enough. - Oprah Winfrey",
    "Life is what happens when you're busy making other plans. - John Lennon",
    "Spread love everywhere you go. Let no one ever come to you without leaving happier. - Mother Teresa",
    "Tell me and I forget. Teach me and I remember. Involve me and I learn. - Benjamin Franklin",
    "The best and most beautiful things in the world cannot be seen or even touched - they must be felt with the heart. - Helen Keller",
    "It is during our darkest moments that we must focus to see the light. - Aristotle",
];

/// A quote catalog. Cheap to construct and clone — it only ever borrows the
/// built-in list.
#[derive(Debug, Clone, Copy)]
pub struct QuoteProvider {
    catalog: &'static [&'static str],
}

impl Default for QuoteProvider {
    fn default() -> Self {
        QuoteProvider { catalog: CATALOG }
    }
}

impl QuoteProvider {
    /// Builds a provider over a custom, non-empty catalog.
    pub fn with_catalog(catalog: &'static [&'static str]) -> Self {
        QuoteProvider { catalog }
    }

    /// Draws a quote uniformly at random. Each call uses a fresh
    /// thread-local RNG, so no shared mutable state crosses handler tasks.
    pub fn draw(&self) -> Result<Quote, QuoteError> {
        if self.catalog.is_empty() {
            return Err(QuoteError::NoQuotesConfigured);
        }
        let index = rand::rng().random_range(0..self.catalog.len());
        Ok(Quote {
            text: self.catalog[index].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_from_the_ten_quote_catalog() {
        let provider = QuoteProvider::default();
        for _ in 0..50 {
            let quote = provider.draw().expect("draw");
            assert!(CATALOG.contains(&quote.text.as_str()));
        }
    }

    #[test]
    fn empty_catalog_fails() {
        let provider = QuoteProvider::with_catalog(&[]);
        assert_eq!(provider.draw().unwrap_err(), QuoteError::NoQuotesConfigured);
    }
}
