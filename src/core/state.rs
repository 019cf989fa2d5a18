use crate::core::format;
use crate::models::BlockSummary;

/// Blocks held for the lifetime of one dashboard run. Replaced wholesale on
/// every successful fetch, never edited in place.
#[derive(Debug, Default, Clone)]
pub struct ChainState {
    current: Option<BlockSummary>,
    historical: Vec<BlockSummary>,
}

impl ChainState {
    /// Highest block becomes current, the next `history_len` become history.
    /// Empty input keeps the previous state and returns false.
    pub fn apply(&mut self, mut blocks: Vec<BlockSummary>, history_len: usize) -> bool {
        if blocks.is_empty() {
            return false;
        }

        blocks.sort_by(|a, b| b.height.cmp(&a.height));
        let mut blocks = blocks.into_iter();
        self.current = blocks.next();
        self.historical = blocks.take(history_len).collect();
        true
    }

    pub fn current(&self) -> Option<&BlockSummary> {
        self.current.as_ref()
    }

    pub fn historical(&self) -> &[BlockSummary] {
        &self.historical
    }

    pub fn last_char_frequency(&self) -> String {
        format::last_char_frequency(&self.historical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(top: u64, len: u64) -> Vec<BlockSummary> {
        (0..len)
            .map(|i| BlockSummary::new(top - i, format!("{:064x}", top - i)))
            .collect()
    }

    #[test]
    fn seventeen_blocks_fill_history() {
        let mut state = ChainState::default();
        assert!(state.apply(chain(870_016, 17), 16));

        assert_eq!(state.current().map(|b| b.height), Some(870_016));
        assert_eq!(state.historical().len(), 16);
        assert!(state.historical().iter().all(|b| b.height != 870_016));
        assert_eq!(state.historical()[0].height, 870_015);
        assert_eq!(state.historical()[15].height, 870_000);
    }

    #[test]
    fn history_is_truncated() {
        let mut state = ChainState::default();
        state.apply(chain(500, 40), 16);
        assert_eq!(state.historical().len(), 16);
        assert_eq!(state.historical().last().map(|b| b.height), Some(484));
    }

    #[test]
    fn empty_input_keeps_state() {
        let mut state = ChainState::default();
        state.apply(chain(100, 3), 16);
        assert!(!state.apply(Vec::new(), 16));
        assert_eq!(state.current().map(|b| b.height), Some(100));
        assert_eq!(state.historical().len(), 2);
    }

    #[test]
    fn orders_by_descending_height() {
        let mut state = ChainState::default();
        let mut blocks = chain(10, 5);
        blocks.reverse();
        state.apply(blocks, 16);

        assert_eq!(state.current().map(|b| b.height), Some(10));
        let heights: Vec<u64> = state.historical().iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![9, 8, 7, 6]);
    }

    #[test]
    fn tolerates_gaps() {
        let mut state = ChainState::default();
        state.apply(
            vec![BlockSummary::new(20, "a"), BlockSummary::new(15, "b"), BlockSummary::new(9, "a")],
            16,
        );
        assert_eq!(state.historical().len(), 2);
        assert_eq!(state.last_char_frequency(), "a:1 b:1");
    }

    #[test]
    fn replaced_wholesale() {
        let mut state = ChainState::default();
        state.apply(chain(100, 10), 16);
        state.apply(chain(200, 2), 16);
        assert_eq!(state.current().map(|b| b.height), Some(200));
        assert_eq!(state.historical().len(), 1);
    }
}
