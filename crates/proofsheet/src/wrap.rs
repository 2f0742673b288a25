//! Greedy word wrapping over monospace character columns.

use std::collections::VecDeque;
use std::sync::Arc;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A line wrapper bound to a column width at construction.
pub trait TextWrapper {
    /// Wraps `text` into ordered lines. Empty or whitespace-only text wraps
    /// to no lines at all.
    fn wrap(&self, text: &str) -> Vec<String>;
}

pub type SharedWrapper = Arc<dyn TextWrapper + Send + Sync>;

/// Builds a wrapper for a given column count, so alternative wrapping
/// policies can be substituted per typesetting.
pub type WrapperFactory = Arc<dyn Fn(usize) -> SharedWrapper + Send + Sync>;

/// Greedy word-boundary wrapper.
///
/// Words are packed onto a line while they fit within `columns`; a word
/// wider than the whole column budget is split hard mid-word. Column
/// accounting uses display width, so East Asian wide glyphs take two
/// columns. Runs of whitespace (including newlines) collapse to a single
/// separator.
#[derive(Debug, Clone, Copy)]
pub struct GreedyWrapper {
    pub columns: usize,
}

impl GreedyWrapper {
    pub fn new(columns: usize) -> Self {
        Self { columns }
    }

    /// The default [`WrapperFactory`].
    pub fn factory() -> WrapperFactory {
        Arc::new(|columns| Arc::new(GreedyWrapper::new(columns)) as SharedWrapper)
    }
}

impl TextWrapper for GreedyWrapper {
    fn wrap(&self, text: &str) -> Vec<String> {
        let max = self.columns.max(1);
        let mut words: VecDeque<String> = text.split_whitespace().map(str::to_string).collect();
        let mut out: Vec<String> = Vec::new();
        let mut cur = String::new();
        let mut cur_cols = 0usize;

        while let Some(word) = words.pop_front() {
            let word_cols = word.width();
            if cur.is_empty() {
                if word_cols <= max {
                    cur = word;
                    cur_cols = word_cols;
                } else {
                    let (head, tail) = split_at_columns(&word, max);
                    out.push(head);
                    words.push_front(tail);
                }
                continue;
            }
            if cur_cols + 1 + word_cols <= max {
                cur.push(' ');
                cur.push_str(&word);
                cur_cols += 1 + word_cols;
            } else {
                out.push(std::mem::take(&mut cur));
                cur_cols = 0;
                words.push_front(word);
            }
        }
        if !cur.is_empty() {
            out.push(cur);
        }
        out
    }
}

/// Splits `word` so the head fills at most `max` columns; the head always
/// takes at least one character so splitting makes progress.
fn split_at_columns(word: &str, max: usize) -> (String, String) {
    let mut cols = 0usize;
    for (idx, ch) in word.char_indices() {
        let w = ch.width().unwrap_or(0);
        if idx > 0 && cols + w > max {
            return (word[..idx].to_string(), word[idx..].to_string());
        }
        cols += w;
    }
    (word.to_string(), String::new())
}
