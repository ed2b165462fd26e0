pub mod memory;
pub mod order;
pub mod product;

pub use self::memory::InMemoryStore;
