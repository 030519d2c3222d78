// Life of a key:
// 1. A value arrives (parsed text, builder output, or a point)
// 2. The registry picks the layout for its family
// 3. The layout encodes value + entity id into a fixed-size page region
// 4. Searches and splits order keys with the layout comparator, no decode
// 5. On open, tree metadata is checked against the registry's layout
//
// Components:
//  - Temporal value model (times with a fixed offset, parsing, builder)
//  - Spatial value model (reference systems, points, Hilbert curve)
//  - Layouts (identifiers, key codecs, tree metadata, key search)

pub mod config;
pub mod layout;
pub mod registry;
pub mod spatial;
pub mod temporal;
pub mod time;

#[cfg(test)]
mod e2e_tests;

pub use config::{ConfigError, IndexConfig};
pub use layout::{AnyLayout, IndexKey, IndexValue, KeyLayout, LayoutIdentifier, LayoutKey, TreeMeta};
pub use registry::LayoutRegistry;
