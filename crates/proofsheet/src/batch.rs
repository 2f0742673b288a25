//! Fixed-size batching of a sequence into consecutive chunks.

use crate::{Error, Result};

/// Iterator over consecutive chunks of `size` items; the final chunk may be
/// shorter. Single-pass: driven entirely by the underlying iterator.
#[derive(Debug, Clone)]
pub struct Batched<I> {
    inner: I,
    size: usize,
}

/// Splits `items` into chunks of `size` items each.
pub fn batched<I>(items: I, size: usize) -> Result<Batched<I::IntoIter>>
where
    I: IntoIterator,
{
    if size == 0 {
        return Err(Error::ZeroBatchSize);
    }
    Ok(Batched {
        inner: items.into_iter(),
        size,
    })
}

impl<I: Iterator> Iterator for Batched<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Vec<I::Item>> {
        let mut chunk = Vec::with_capacity(self.size);
        for item in self.inner.by_ref() {
            chunk.push(item);
            if chunk.len() == self.size {
                break;
            }
        }
        if chunk.is_empty() { None } else { Some(chunk) }
    }
}
