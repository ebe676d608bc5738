//! # Dovetail
//!
//! Value providers for property-based testing.
//!
//! Every supported domain (booleans, fixed-width and arbitrary-precision
//! integers, characters, floats, decimals, and composites such as tuples,
//! lists and strings) is available from two providers behind one contract,
//! [`IterableProvider`]:
//!
//! - [`ExhaustiveProvider`] enumerates each domain deterministically and
//!   totally, reaching every finite value after finitely many steps even when
//!   the domain is infinite.
//! - [`RandomProvider`] produces reproducible pseudorandom streams from a
//!   [`Seed`], shaped by a scale and a secondary scale.
//!
//! Properties written against the contract run unchanged in both modes.

pub mod config;
pub mod decimals;
pub mod distributions;
pub mod dovetail;
pub mod error;
pub mod exhaustive;
pub mod floats;
pub mod ints;
pub mod iterables;
pub mod providers;
pub mod random;
pub mod strings;

pub use config::{ProviderConfig, Seed, SEED_SIZE};
pub use error::{GenerationError, Result};
pub use exhaustive::ExhaustiveProvider;
pub use floats::{FloatWidth, PrimitiveFloat};
pub use ints::BoundedInteger;
pub use iterables::Iter;
pub use providers::{IterableProvider, Nullable};
pub use random::RandomProvider;
