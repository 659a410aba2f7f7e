mod book;
mod claims;

pub use book::*;
pub use claims::*;
