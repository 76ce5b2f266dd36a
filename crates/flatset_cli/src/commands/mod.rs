//! CLI command implementations.

pub mod add;
pub mod contains;
pub mod inspect;
pub mod list;
pub mod verify;
