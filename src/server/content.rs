//! Response content buffers and their release policies.

use std::fmt;

enum Buffer {
    Owned(Vec<u8>),
    Static(&'static [u8]),
}

/// A function run once with the buffer when the content is dropped.
pub type ReleaseFn = Box<dyn FnOnce(Vec<u8>) + Send>;

/// The body of a response.
///
/// Content is either copied from the caller, handed over as an owned buffer,
/// borrowed for the life of the program, or handed over together with a
/// release function that runs exactly once when the content is dropped.
pub struct Content {
    buffer: Buffer,
    release: Option<ReleaseFn>,
}

impl Content {
    /// Copy `bytes` into a new buffer owned by the content.
    pub fn copied(bytes: &[u8]) -> Self {
        Self::owned(bytes.to_vec())
    }

    /// Take ownership of `buffer`; it is dropped normally.
    pub fn owned(buffer: Vec<u8>) -> Self {
        Self {
            buffer: Buffer::Owned(buffer),
            release: None,
        }
    }

    /// Use static data that is never released.
    pub fn from_static(bytes: &'static [u8]) -> Self {
        Self {
            buffer: Buffer::Static(bytes),
            release: None,
        }
    }

    /// Take ownership of `buffer` and hand it to `release` on drop.
    pub fn with_release<F>(buffer: Vec<u8>, release: F) -> Self
    where
        F: FnOnce(Vec<u8>) + Send + 'static,
    {
        Self {
            buffer: Buffer::Owned(buffer),
            release: Some(Box::new(release)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.buffer {
            Buffer::Owned(buffer) => buffer,
            Buffer::Static(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl Drop for Content {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            if let Buffer::Owned(buffer) = &mut self.buffer {
                release(std::mem::take(buffer));
            }
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match (&self.buffer, &self.release) {
            (Buffer::Static(_), _) => "static",
            (Buffer::Owned(_), None) => "owned",
            (Buffer::Owned(_), Some(_)) => "released",
        };
        f.debug_struct("Content")
            .field("kind", &kind)
            .field("len", &self.len())
            .finish()
    }
}

impl From<Vec<u8>> for Content {
    fn from(buffer: Vec<u8>) -> Self {
        Content::owned(buffer)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::owned(text.into_bytes())
    }
}

impl From<&'static str> for Content {
    fn from(text: &'static str) -> Self {
        Content::from_static(text.as_bytes())
    }
}
