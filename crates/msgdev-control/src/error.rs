use msgdev_buffer::BufferError;

/// Errors that can occur in control operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// Another control operation holds the gate. Nothing was done.
    #[error("device busy: another control operation is in progress")]
    Busy,

    /// The requested byte index lies past the physical capacity.
    #[error("byte index {index} out of range (capacity {capacity})")]
    OutOfRange { index: usize, capacity: usize },

    /// The destination for a whole-message read cannot even hold a terminator.
    #[error("destination of {capacity} bytes cannot hold a terminated message")]
    DestinationTooSmall { capacity: usize },

    /// The numeric command code does not name a control operation.
    #[error("unknown control command {0:#x}")]
    UnknownCommand(u32),
}

impl From<BufferError> for ControlError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::OutOfRange { index, capacity } => {
                ControlError::OutOfRange { index, capacity }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ControlError>;
