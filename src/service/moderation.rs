use crate::{error::HttpError, models::propertymodel::PropertyStatus};

/// Outcome of resolving a requested status change against the listing
/// moderation rules. Any status is reachable from any other by an admin;
/// the common paths are pending→approved, pending→rejected-with-reason,
/// approved→suspended and approved→sold.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationUpdate {
    pub status: PropertyStatus,
    /// Persisted verbatim on rejection, cleared on every other transition.
    pub rejection_reason: Option<String>,
    /// Approve stamps approved_at/approved_by.
    pub stamp_approval: bool,
    /// Reject clears any previous approval stamps.
    pub clear_approval: bool,
}

impl ModerationUpdate {
    pub fn resolve(requested_status: &str, reason: Option<&str>) -> Result<Self, HttpError> {
        let status = PropertyStatus::from_str(requested_status).ok_or_else(|| {
            HttpError::bad_request(format!("Invalid status '{}'", requested_status))
        })?;

        match status {
            PropertyStatus::Rejected => {
                let reason = reason.map(str::trim).filter(|r| !r.is_empty()).ok_or_else(|| {
                    HttpError::bad_request("A rejection reason is required to reject a listing")
                })?;

                Ok(ModerationUpdate {
                    status,
                    rejection_reason: Some(reason.to_string()),
                    stamp_approval: false,
                    clear_approval: true,
                })
            }
            PropertyStatus::Approved => Ok(ModerationUpdate {
                status,
                rejection_reason: None,
                stamp_approval: true,
                clear_approval: false,
            }),
            _ => Ok(ModerationUpdate {
                status,
                rejection_reason: None,
                stamp_approval: false,
                clear_approval: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn approve_stamps_approval_and_clears_reason() {
        let update = ModerationUpdate::resolve("approved", None).unwrap();
        assert_eq!(update.status, PropertyStatus::Approved);
        assert!(update.stamp_approval);
        assert!(!update.clear_approval);
        assert_eq!(update.rejection_reason, None);
    }

    #[test]
    fn reject_requires_a_reason() {
        let err = ModerationUpdate::resolve("rejected", None).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = ModerationUpdate::resolve("rejected", Some("   ")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn reject_with_reason_carries_it_and_clears_approval() {
        let update = ModerationUpdate::resolve("rejected", Some("blurry photos")).unwrap();
        assert_eq!(update.status, PropertyStatus::Rejected);
        assert_eq!(update.rejection_reason.as_deref(), Some("blurry photos"));
        assert!(update.clear_approval);
        assert!(!update.stamp_approval);
    }

    #[test]
    fn moving_away_from_rejected_clears_the_reason() {
        // The reason column is always written from the update, so any
        // non-reject transition resolves with reason = None.
        for status in ["pending", "approved", "suspended", "sold"] {
            let update = ModerationUpdate::resolve(status, Some("stale reason")).unwrap();
            assert_eq!(update.rejection_reason, None);
        }
    }

    #[test]
    fn suspend_and_sold_keep_existing_approval_stamps() {
        for status in ["suspended", "sold"] {
            let update = ModerationUpdate::resolve(status, None).unwrap();
            assert!(!update.stamp_approval);
            assert!(!update.clear_approval);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let err = ModerationUpdate::resolve("archived", None).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("archived"));
    }
}
