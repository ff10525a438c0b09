//! Line orderer
//!
//! Splits a block of bytes into line fragments and orders them.

use std::iter::FusedIterator;

/// One pass over the lines of a block.
///
/// Produced by [`split_lines`]. The sequence is consumed as it is iterated;
/// call [`split_lines`] again to start over.
#[derive(Debug)]
pub struct Lines<'a> {
    inner: std::vec::IntoIter<&'a [u8]>,
}

/// Split `block` on `\n` into line fragments.
///
/// Interior empty lines are kept. A trailing empty fragment (the block ends
/// with a newline) and then a leading empty fragment (the block starts with a
/// newline) are dropped. With `newest_first` the last line of the block comes
/// out first.
pub fn split_lines(block: &[u8], newest_first: bool) -> Lines<'_> {
    let mut fragments: Vec<&[u8]> = block.split(|&b| b == b'\n').collect();

    if fragments.last().is_some_and(|f| f.is_empty()) {
        fragments.pop();
    }
    if fragments.first().is_some_and(|f| f.is_empty()) {
        fragments.remove(0);
    }

    if newest_first {
        fragments.reverse();
    }

    Lines {
        inner: fragments.into_iter(),
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Lines<'_> {}

impl FusedIterator for Lines<'_> {}
