use std::fmt;
use std::sync::Arc;

/// Immutable chunk of encoded media plus its content type.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    data: Arc<[u8]>,
    mime_type: String,
}

impl Blob {
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Concatenates `parts` in order into one blob of type `mime_type`.
    pub fn from_parts(parts: &[Blob], mime_type: impl Into<String>) -> Self {
        let size = parts.iter().map(Blob::size).sum();
        let mut data = Vec::with_capacity(size);
        for part in parts {
            data.extend_from_slice(&part.data);
        }
        Self::new(data, mime_type)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("size", &self.size())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_concatenates_in_order() {
        let parts = [
            Blob::new(b"ab".to_vec(), "video/webm"),
            Blob::new(Vec::<u8>::new(), "video/webm"),
            Blob::new(b"cd".to_vec(), "video/webm"),
        ];
        let blob = Blob::from_parts(&parts, "video/webm;codecs=vp9");

        assert_eq!(blob.data(), b"abcd");
        assert_eq!(blob.size(), 4);
        assert_eq!(blob.mime_type(), "video/webm;codecs=vp9");
    }
}
