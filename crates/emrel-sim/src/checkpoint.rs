//! Opaque engine checkpoints.

/// Engine-owned state carried between windows.
///
/// The driver never looks inside; it hands back exactly the bytes the engine
/// produced for the previous window.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Checkpoint(Vec<u8>);

impl Checkpoint {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Checkpoint({} bytes)", self.0.len())
    }
}
