pub mod dto;
pub mod handler;

pub use dto::{Bracket, BracketChoice};
pub use handler::{calculate_cashback, parse_amount};
