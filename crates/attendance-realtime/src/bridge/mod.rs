//! Change feed implementations.

pub mod memory_feed;

pub use memory_feed::MemoryChangeFeed;
