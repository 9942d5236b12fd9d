pub mod memory;

pub use memory::InMemoryPoleRepository;
