// Forward-only byte cursor with bounded sub-views for nested scopes.
use crate::core::error::Error;

/// Reads forward through one scope of a borrowed buffer.
///
/// `base` is the absolute offset of the scope inside the root buffer, so
/// errors raised in nested scopes still point at the right byte.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            base: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn absolute_position(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next `n` bytes. On failure the position is unchanged.
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let available = self.remaining();
        if n > available {
            return Err(Error::unexpected_eof(self.absolute_position(), n, available));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.buf[start..self.pos])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    /// Consumes `expected.len()` bytes and checks them against `expected`.
    ///
    /// The bytes stay consumed on mismatch; callers abort the decode anyway.
    pub fn ensure_fixed_content(&mut self, expected: &[u8]) -> Result<&'a [u8], Error> {
        let offset = self.absolute_position();
        let actual = self.read_exact(expected.len())?;
        if actual != expected {
            return Err(Error::constant_mismatch(offset, expected, actual));
        }
        Ok(actual)
    }

    /// Everything left in this scope; may be empty.
    pub fn read_remainder(&mut self) -> &'a [u8] {
        let start = self.pos;
        self.pos = self.buf.len();
        &self.buf[start..]
    }

    /// Carves the next `n` bytes out as a cursor that cannot see past them.
    pub fn sub_view(&mut self, n: usize) -> Result<ByteCursor<'a>, Error> {
        let base = self.absolute_position();
        let buf = self.read_exact(n)?;
        Ok(ByteCursor { buf, pos: 0, base })
    }
}
