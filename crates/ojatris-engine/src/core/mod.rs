pub use self::{board::*, kick_table::*, piece::*};

pub(crate) mod board;
pub(crate) mod kick_table;
pub(crate) mod piece;
