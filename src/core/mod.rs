//! Foundational types: currency codes, currency pairs, rate records, errors.

pub mod currency;
pub mod rate;
