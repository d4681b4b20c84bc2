//! Rate resolution and conversion: the resolver engine and its
//! injectable static fallback table.

pub mod engine;
pub mod fallback;

pub use engine::FxResolver;
pub use fallback::FallbackRates;
