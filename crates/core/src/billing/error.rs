//! Billing error types.
//!
//! All errors the billing ledger can surface, detected at the point of
//! violation and returned to the caller with no local recovery. The
//! persistence layer translates storage-engine integrity violations into
//! these kinds rather than leaking driver errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during billing operations.
#[derive(Debug, Error)]
pub enum BillingError {
    // ========== Validation Errors ==========
    /// Payment or obligation amount must be positive.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Status override requires a reason for the audit trail.
    #[error("Status override requires a non-empty reason")]
    MissingOverrideReason,

    /// Unknown fee status value.
    #[error("Invalid fee status: {0}")]
    InvalidStatus(String),

    /// Unknown payment method value.
    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    // ========== Not Found Errors ==========
    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Course not found.
    #[error("Course not found: {0}")]
    CourseNotFound(Uuid),

    /// Fee obligation not found.
    #[error("Fee obligation not found: {0}")]
    ObligationNotFound(Uuid),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    // ========== Precondition Errors ==========
    /// Student is not enrolled in the course.
    #[error("Student {student_id} is not enrolled in course {course_id}")]
    NotEnrolled {
        /// The student.
        student_id: Uuid,
        /// The course.
        course_id: Uuid,
    },

    // ========== Conflict Errors ==========
    /// An obligation already exists for this (student, course) pair.
    #[error("Fee obligation already exists for student {student_id} in course {course_id}")]
    DuplicateObligation {
        /// The student.
        student_id: Uuid,
        /// The course.
        course_id: Uuid,
    },

    /// Invoice number collision (structurally prevented by the sequence).
    #[error("Invoice number already exists: {0}")]
    DuplicateInvoiceNumber(String),

    /// Concurrent modification detected.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    // ========== Authorization Errors ==========
    /// Caller lacks the required role or ownership.
    #[error("Access denied")]
    AccessDenied,

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::MissingOverrideReason => "MISSING_OVERRIDE_REASON",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::InvalidPaymentMethod(_) => "INVALID_PAYMENT_METHOD",
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::CourseNotFound(_) => "COURSE_NOT_FOUND",
            Self::ObligationNotFound(_) => "OBLIGATION_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::NotEnrolled { .. } => "NOT_ENROLLED",
            Self::DuplicateObligation { .. } => "DUPLICATE_OBLIGATION",
            Self::DuplicateInvoiceNumber(_) => "DUPLICATE_INVOICE_NUMBER",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NonPositiveAmount(_)
            | Self::MissingOverrideReason
            | Self::InvalidStatus(_)
            | Self::InvalidPaymentMethod(_) => 400,

            // 403 Forbidden - authorization errors
            Self::AccessDenied => 403,

            // 404 Not Found
            Self::StudentNotFound(_)
            | Self::CourseNotFound(_)
            | Self::ObligationNotFound(_)
            | Self::PaymentNotFound(_)
            | Self::InvoiceNotFound(_) => 404,

            // 409 Conflict - duplicates and concurrency
            Self::DuplicateObligation { .. }
            | Self::DuplicateInvoiceNumber(_)
            | Self::ConcurrentModification => 409,

            // 422 Unprocessable Entity - precondition failures
            Self::NotEnrolled { .. } => 422,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BillingError::NonPositiveAmount(dec!(0)).error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            BillingError::DuplicateObligation {
                student_id: Uuid::nil(),
                course_id: Uuid::nil(),
            }
            .error_code(),
            "DUPLICATE_OBLIGATION"
        );
        assert_eq!(
            BillingError::ConcurrentModification.error_code(),
            "CONCURRENT_MODIFICATION"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            BillingError::NonPositiveAmount(dec!(-5)).http_status_code(),
            400
        );
        assert_eq!(BillingError::AccessDenied.http_status_code(), 403);
        assert_eq!(
            BillingError::ObligationNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            BillingError::NotEnrolled {
                student_id: Uuid::nil(),
                course_id: Uuid::nil(),
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            BillingError::DuplicateObligation {
                student_id: Uuid::nil(),
                course_id: Uuid::nil(),
            }
            .http_status_code(),
            409
        );
        assert_eq!(
            BillingError::Database("boom".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(BillingError::ConcurrentModification.is_retryable());
        assert!(!BillingError::NonPositiveAmount(dec!(0)).is_retryable());
        assert!(!BillingError::AccessDenied.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = BillingError::NonPositiveAmount(dec!(-10.50));
        assert_eq!(err.to_string(), "Amount must be positive, got -10.50");

        let err = BillingError::DuplicateInvoiceNumber("INV-2026-00042".to_string());
        assert_eq!(
            err.to_string(),
            "Invoice number already exists: INV-2026-00042"
        );
    }
}
