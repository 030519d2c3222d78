//! End-to-end tests from value construction to keys in a page.
//!
//! Each test file covers a specific scenario, using deterministic inputs
//! (fixed clocks, seeded generators) to exercise registry, codecs, search
//! and metadata together.

#![cfg(test)]

mod helpers;

mod test_families;
mod test_parse_and_truncate;
mod test_reopen;
mod test_spatial_range;
mod test_time_keys;
