/// Errors that can occur when addressing the message storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// The byte index lies past the physical capacity of the storage.
    #[error("byte index {index} out of range (capacity {capacity})")]
    OutOfRange { index: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, BufferError>;
