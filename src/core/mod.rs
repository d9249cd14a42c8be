pub mod board;
pub mod error;
pub mod game;
pub mod ruleset;
pub mod sfen;
pub mod types;

pub use board::*;
pub use error::*;
pub use game::*;
pub use ruleset::*;
pub use types::*;
