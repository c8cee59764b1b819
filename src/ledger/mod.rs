//! Toy ledger that looks like a blockchain.
//!
//! Each block gets a random `HASG-` token as its "hash" and records the
//! previous block's token. Nothing is derived from block contents and nothing
//! is verified or saved.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use std::fmt::Write;

pub const GENESIS_PREV_HASH: &str = "0000";
pub const EMPTY_INPUT_NOTICE: &str = "Please enter data";
pub const CONFIRM_PROMPT: &str = "Are you sure you want to add this block?";

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub index: u64,
    pub data: String,
    pub timestamp: DateTime<Utc>,
    pub hash: String,
    pub prev_hash: String,
}

/// Asks the user whether a block should really be added.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Appended(Block),
    /// Empty input; the user was not asked to confirm.
    Rejected(&'static str),
    Declined,
}

pub fn random_token() -> String {
    let mut rng = rand::rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();
    format!("HASG-{}", token)
}

pub struct Ledger {
    blocks: Vec<Block>,
    next_index: u64,
    prev_hash: String,
    token_source: Box<dyn FnMut() -> String + Send>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_token_source(random_token)
    }

    pub fn with_token_source(source: impl FnMut() -> String + Send + 'static) -> Self {
        Self {
            blocks: Vec::new(),
            next_index: 1,
            prev_hash: GENESIS_PREV_HASH.to_string(),
            token_source: Box::new(source),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn submit(&mut self, data: &str, confirm: &mut dyn Confirm) -> SubmitOutcome {
        if data.is_empty() {
            return SubmitOutcome::Rejected(EMPTY_INPUT_NOTICE);
        }
        if !confirm.confirm(CONFIRM_PROMPT) {
            log::debug!("Block {} declined", self.next_index);
            return SubmitOutcome::Declined;
        }

        let block = Block {
            index: self.next_index,
            data: data.to_string(),
            timestamp: Utc::now(),
            hash: (self.token_source)(),
            prev_hash: self.prev_hash.clone(),
        };

        self.next_index += 1;
        self.prev_hash = block.hash.clone();
        self.blocks.push(block.clone());
        log::debug!("Appended block {} ({})", block.index, block.hash);
        SubmitOutcome::Appended(block)
    }

    /// Renders the full list, oldest first.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            let _ = writeln!(out, "Block #{}", block.index);
            let _ = writeln!(out, "  Data: {}", block.data);
            let _ = writeln!(out, "  Hash: {}", block.hash);
            let _ = writeln!(out, "  Previous Hash: {}", block.prev_hash);
            let _ = writeln!(
                out,
                "  Timestamp: {}",
                block.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(answer: bool) -> impl FnMut(&str) -> bool {
        move |_| answer
    }

    #[test]
    fn test_three_blocks_chain_from_genesis() {
        let mut ledger = Ledger::new();
        for data in ["alice pays bob", "bob pays carol", "carol pays dave"] {
            assert!(matches!(
                ledger.submit(data, &mut always(true)),
                SubmitOutcome::Appended(_)
            ));
        }

        let blocks = ledger.blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks.iter().map(|b| b.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(blocks[0].prev_hash, GENESIS_PREV_HASH);
        assert_eq!(blocks[1].prev_hash, blocks[0].hash);
        assert_eq!(blocks[2].prev_hash, blocks[1].hash);
    }

    #[test]
    fn test_empty_input_rejected_without_prompt() {
        let mut ledger = Ledger::new();
        let mut asked = false;
        let outcome = ledger.submit("", &mut |_: &str| {
            asked = true;
            true
        });

        assert_eq!(outcome, SubmitOutcome::Rejected(EMPTY_INPUT_NOTICE));
        assert!(!asked);
        assert!(ledger.blocks().is_empty());
    }

    #[test]
    fn test_declined_keeps_index_and_prev_hash() {
        let mut tokens = ["HASG-a", "HASG-b"].into_iter().map(String::from);
        let mut ledger = Ledger::with_token_source(move || tokens.next().unwrap_or_default());

        assert_eq!(ledger.submit("first", &mut always(false)), SubmitOutcome::Declined);
        ledger.submit("first", &mut always(true));
        ledger.submit("second", &mut always(true));

        let blocks = ledger.blocks();
        assert_eq!(blocks[0].index, 1);
        assert_eq!(blocks[0].hash, "HASG-a");
        assert_eq!(blocks[1].prev_hash, "HASG-a");
        assert_eq!(blocks[1].hash, "HASG-b");
    }

    #[test]
    fn test_random_token_shape() {
        let token = random_token();
        let suffix = token.strip_prefix("HASG-").unwrap();
        assert_eq!(suffix.len(), TOKEN_LEN);
        assert!(suffix.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_render_lists_every_block() {
        let mut ledger = Ledger::with_token_source(|| "HASG-x".to_string());
        ledger.submit("hello", &mut always(true));

        let text = ledger.render();
        assert!(text.starts_with("Block #1\n"));
        assert!(text.contains("  Data: hello\n"));
        assert!(text.contains("  Hash: HASG-x\n"));
        assert!(text.contains("  Previous Hash: 0000\n"));
        assert!(text.contains("Timestamp: "));
    }
}
