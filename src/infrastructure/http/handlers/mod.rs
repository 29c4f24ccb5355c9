//! HTTP Handlers

mod generate;
mod health;
mod index;
mod upload;

pub use generate::*;
pub use health::*;
pub use index::*;
pub use upload::*;
