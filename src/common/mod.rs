//! Common, shared types.

pub mod category;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
