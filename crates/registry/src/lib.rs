#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Glyph factory registry.
//!
//! Maps annotation tag kinds to the factories that materialize their margin
//! glyphs, and assigns each kind a stable paint order. The registry is built
//! once per editor-view instance from a provider list and is immutable
//! afterwards; the provider list itself may be process-wide, the resolved
//! registry never is.

mod factory;
mod registry;

pub use factory::{GlyphFactory, GlyphFactoryProvider, GlyphVisual};
pub use registry::{GlyphDescriptor, GlyphRegistry};
