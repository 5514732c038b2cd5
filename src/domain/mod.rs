//! Domain layer - pure models and contracts

pub mod abi;
