// Kyokumen - motor de regras de shogi com pesquisa alfa-beta paralela

pub mod core;
pub mod moves;
pub mod search;

pub use crate::core::*;
