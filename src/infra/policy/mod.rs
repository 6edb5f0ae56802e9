// Policy store implementations.

pub mod in_memory;
pub mod json_store;

pub use in_memory::InMemoryPolicyStore;
pub use json_store::JsonPolicyStore;
