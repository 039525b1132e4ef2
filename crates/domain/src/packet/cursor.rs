use thiserror::Error;

/// A parse step ran past the end of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("truncated frame: need {needed} bytes at offset {offset}")]
pub struct Truncated {
    pub offset: usize,
    pub needed: usize,
}

/// Forward-only bounds-checked reader over one frame.
///
/// Invariant: `pos <= buf.len()` at all times; a failed read leaves the
/// position untouched. Lives for exactly one pipeline invocation.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the frame.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Read the next `N` bytes and advance, or fail without advancing.
    pub fn read<const N: usize>(&mut self) -> Result<[u8; N], Truncated> {
        if self.remaining() < N {
            return Err(Truncated {
                offset: self.pos,
                needed: N,
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}
