//! Database entities

pub mod pole;
pub mod pole_company;
