use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Invalid hourly rate: {0}")]
    InvalidRate(f64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Booking conflict: {0}")]
    BookingConflict(String),

    #[error("Submission failed: {0}")]
    Submission(#[from] eyre::Report),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("A booking submission is already in progress")]
    AlreadyInProgress,

    #[error("Booking attempt was abandoned")]
    Abandoned,

    #[error("Resource not found: {0}")]
    NotFound(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Copyable discriminant of a [`BookingError`], used where the full error
/// cannot be cloned (state snapshots, watch channels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidRange,
    InvalidRate,
    Validation,
    SlotUnavailable,
    BookingConflict,
    Submission,
    Timeout,
    AlreadyInProgress,
    Abandoned,
    NotFound,
}

impl BookingError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BookingError::InvalidRange(_) => FailureKind::InvalidRange,
            BookingError::InvalidRate(_) => FailureKind::InvalidRate,
            BookingError::Validation(_) => FailureKind::Validation,
            BookingError::SlotUnavailable(_) => FailureKind::SlotUnavailable,
            BookingError::BookingConflict(_) => FailureKind::BookingConflict,
            BookingError::Submission(_) => FailureKind::Submission,
            BookingError::Timeout(_) => FailureKind::Timeout,
            BookingError::AlreadyInProgress => FailureKind::AlreadyInProgress,
            BookingError::Abandoned => FailureKind::Abandoned,
            BookingError::NotFound(_) => FailureKind::NotFound,
        }
    }

    /// Transient failures the user can retry unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::Submission(_) | BookingError::Timeout(_))
    }

    /// Message suitable for showing to the person making the booking.
    pub fn user_message(&self) -> &'static str {
        match self {
            BookingError::InvalidRange(_) => "End time must be after start time",
            BookingError::InvalidRate(_) => "This turf has no valid hourly price",
            BookingError::Validation(_) => "Please fill in all fields with valid values",
            BookingError::SlotUnavailable(_) => {
                "This time slot is not available. Please choose another time."
            }
            BookingError::BookingConflict(_) => {
                "This time slot was just booked by someone else. Please choose another time."
            }
            BookingError::Submission(_) => "Failed to create booking. Please try again.",
            BookingError::Timeout(_) => "The server took too long to respond. Please try again.",
            BookingError::AlreadyInProgress => "A booking is already being submitted",
            BookingError::Abandoned => "The booking was cancelled before it completed",
            BookingError::NotFound(_) => "The requested item no longer exists",
        }
    }
}
