pub mod pole_repository;

pub use pole_repository::SeaOrmPoleRepository;
