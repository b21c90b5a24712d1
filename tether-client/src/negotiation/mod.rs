mod action;
mod controller;
mod error;

pub use action::*;
pub use controller::*;
pub use error::*;
