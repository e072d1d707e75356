#![allow(dead_code)]

use std::io;

/// An in-memory writer that can be told to fail after a number of writes.
pub struct Writer {
    buf: Vec<u8>,
    remaining: Option<usize>,
}

impl Writer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            remaining: None,
        }
    }

    pub fn fail_after(writes: usize) -> Self {
        Self {
            buf: Vec::new(),
            remaining: Some(writes),
        }
    }

    #[track_caller]
    pub fn into_string(self) -> String {
        String::from_utf8(self.buf).unwrap()
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.remaining {
            Some(0) => return Err(io::Error::new(io::ErrorKind::Other, "writer is full")),
            Some(n) => *n -= 1,
            None => {}
        }
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
