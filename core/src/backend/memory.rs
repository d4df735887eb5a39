use crate::backend::Slot;
use crate::backend::error::BackendError;

/// In-process slot for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    blob: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<String>, BackendError> {
        Ok(self.blob.clone())
    }

    fn write(&mut self, blob: &str) -> Result<(), BackendError> {
        self.blob = Some(blob.to_string());
        Ok(())
    }
}
