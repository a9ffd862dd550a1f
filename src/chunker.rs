//! Fixed-width text chunking
//!
//! Greedy word wrap over the document text. Chunks are borrowed slices of
//! the input: a chunk starts at a word and ends at a word, and the
//! whitespace separating two chunks belongs to neither. Lengths are counted
//! in characters, so multi-byte text is never split inside a code point.
//!
//! A word longer than the limit is cut into limit-sized pieces.

use crate::types::{AppError, AppResult};

/// A word (or a piece of an over-long word) located in the source text
#[derive(Debug, Clone, Copy)]
struct Token {
    byte_start: usize,
    byte_end: usize,
    char_start: usize,
    char_end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_chars: usize,
}

impl Chunker {
    pub fn new(max_chars: usize) -> AppResult<Self> {
        if max_chars == 0 {
            return Err(AppError::InvalidArgument(
                "maximum chunk length must be greater than zero".to_string(),
            ));
        }
        Ok(Self { max_chars })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split `text` into ordered chunks of at most `max_chars` characters.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let tokens = self.tokenize(text);
        let mut chunks = Vec::new();

        let mut tokens = tokens.iter();
        let Some(first) = tokens.next() else {
            return chunks;
        };

        let mut start = first;
        let mut end = first;
        for token in tokens {
            if token.char_end - start.char_start <= self.max_chars {
                end = token;
            } else {
                chunks.push(&text[start.byte_start..end.byte_end]);
                start = token;
                end = token;
            }
        }
        chunks.push(&text[start.byte_start..end.byte_end]);

        chunks
    }

    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        // (byte_start, char_start) of the word being scanned
        let mut current: Option<(usize, usize)> = None;
        let mut char_count = 0;

        for (char_pos, (byte_pos, ch)) in text.char_indices().enumerate() {
            char_count = char_pos + 1;

            if ch.is_whitespace() {
                if let Some((byte_start, char_start)) = current.take() {
                    tokens.push(Token {
                        byte_start,
                        byte_end: byte_pos,
                        char_start,
                        char_end: char_pos,
                    });
                }
                continue;
            }

            match current {
                None => current = Some((byte_pos, char_pos)),
                Some((byte_start, char_start)) if char_pos - char_start == self.max_chars => {
                    tokens.push(Token {
                        byte_start,
                        byte_end: byte_pos,
                        char_start,
                        char_end: char_pos,
                    });
                    current = Some((byte_pos, char_pos));
                }
                Some(_) => {}
            }
        }

        if let Some((byte_start, char_start)) = current {
            tokens.push(Token {
                byte_start,
                byte_end: text.len(),
                char_start,
                char_end: char_count,
            });
        }

        tokens
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Fails with `InvalidArgument` when `max_chars` is zero.
pub fn chunk_text(text: &str, max_chars: usize) -> AppResult<Vec<&str>> {
    Ok(Chunker::new(max_chars)?.split(text))
}
