//! Big-endian binary streams used by both representations.

use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use msggen_core::ScalarType;

/// Growable big-endian output stream.
#[derive(Debug, Default, Clone)]
pub struct BinaryOStream {
    buf: Vec<u8>,
}

impl BinaryOStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a scalar at its natural width. Non-scalars are ignored.
    pub fn write_scalar(&mut self, value: &Value) {
        match value {
            Value::U8(v) => self.buf.push(*v),
            Value::U16(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Value::U32(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Value::U64(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Value::I8(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Value::I16(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Value::I32(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Value::I64(v) => self.buf.extend_from_slice(&v.to_be_bytes()),
            Value::F32(v) => self.buf.extend_from_slice(&v.to_bits().to_be_bytes()),
            Value::F64(v) => self.buf.extend_from_slice(&v.to_bits().to_be_bytes()),
            Value::Bool(v) => self.buf.push(u8::from(*v)),
            Value::Text(_) | Value::Owned(_) | Value::Opaque(_) => {}
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Big-endian input stream over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct BinaryIStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryIStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    pub fn read_bytes(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        self.take(n)
    }

    /// Consume everything left.
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    pub fn read_scalar(&mut self, ty: ScalarType) -> CodecResult<Value> {
        Ok(match ty {
            ScalarType::U8 => Value::U8(self.read_u8()?),
            ScalarType::U16 => Value::U16(u16::from_be_bytes(self.array()?)),
            ScalarType::U32 => Value::U32(self.read_u32()?),
            ScalarType::U64 => Value::U64(u64::from_be_bytes(self.array()?)),
            ScalarType::I8 => Value::I8(i8::from_be_bytes(self.array()?)),
            ScalarType::I16 => Value::I16(i16::from_be_bytes(self.array()?)),
            ScalarType::I32 => Value::I32(i32::from_be_bytes(self.array()?)),
            ScalarType::I64 => Value::I64(i64::from_be_bytes(self.array()?)),
            ScalarType::F32 => Value::F32(f32::from_bits(u32::from_be_bytes(self.array()?))),
            ScalarType::F64 => Value::F64(f64::from_bits(u64::from_be_bytes(self.array()?))),
            ScalarType::Bool => Value::Bool(self.read_u8()? != 0),
        })
    }
}
