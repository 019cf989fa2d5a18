mod bet;
mod block;

pub use bet::BetTag;
pub use block::{BlockSummary, BlocksResponse, RawBlock};
