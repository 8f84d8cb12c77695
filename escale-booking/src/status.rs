use escale_core::tourisme::BookingStatus;

/// Client-side guard for back-office status changes. The server stays the
/// owner of the booking; this only stops obviously invalid patches.
pub struct BookingStatusManager;

impl BookingStatusManager {
    /// Statuses reachable from `from`.
    pub fn allowed_targets(from: BookingStatus) -> &'static [BookingStatus] {
        match from {
            BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed => &[BookingStatus::Completed, BookingStatus::Cancelled],
            BookingStatus::Cancelled | BookingStatus::Completed => &[],
        }
    }

    pub fn is_terminal(status: BookingStatus) -> bool {
        Self::allowed_targets(status).is_empty()
    }

    pub fn check(from: BookingStatus, to: BookingStatus) -> Result<(), TransitionError> {
        if Self::allowed_targets(from).contains(&to) {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_lifecycle() {
        // pending → confirmed → completed
        assert!(BookingStatusManager::check(BookingStatus::Pending, BookingStatus::Confirmed).is_ok());
        assert!(BookingStatusManager::check(BookingStatus::Confirmed, BookingStatus::Completed).is_ok());
        assert!(BookingStatusManager::is_terminal(BookingStatus::Completed));
    }

    #[test]
    fn test_cancellation() {
        assert!(BookingStatusManager::check(BookingStatus::Pending, BookingStatus::Cancelled).is_ok());
        assert!(BookingStatusManager::check(BookingStatus::Confirmed, BookingStatus::Cancelled).is_ok());
        assert!(BookingStatusManager::is_terminal(BookingStatus::Cancelled));
    }

    #[test]
    fn test_invalid_transition() {
        // Cannot go directly from pending to completed
        let result = BookingStatusManager::check(BookingStatus::Pending, BookingStatus::Completed);
        assert_eq!(
            result,
            Err(TransitionError::InvalidTransition {
                from: BookingStatus::Pending,
                to: BookingStatus::Completed,
            })
        );
        assert!(BookingStatusManager::check(BookingStatus::Cancelled, BookingStatus::Confirmed).is_err());
        assert!(BookingStatusManager::check(BookingStatus::Pending, BookingStatus::Pending).is_err());
    }
}
