pub mod action;
pub mod client;

pub use action::ParsedAction;
pub use client::{ParseRequest, ParserClient, ParserError};
