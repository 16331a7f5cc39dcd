//! Existence and enrollment lookups against the student/course directory.
//!
//! Obligation creation preconditions are checked here so the obligation
//! repository stays focused on billing rows.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use bursar_core::billing::BillingError;

use crate::entities::{courses, enrollments, students};

use super::db_error;

/// Returns an error unless the student exists.
///
/// # Errors
///
/// Returns `BillingError::StudentNotFound` if no such student, or
/// `BillingError::Database` on storage failure.
pub async fn ensure_student<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
) -> Result<(), BillingError> {
    let found = students::Entity::find_by_id(student_id)
        .count(conn)
        .await
        .map_err(db_error)?;
    if found == 0 {
        return Err(BillingError::StudentNotFound(student_id));
    }
    Ok(())
}

/// Returns an error unless the course exists.
///
/// # Errors
///
/// Returns `BillingError::CourseNotFound` if no such course, or
/// `BillingError::Database` on storage failure.
pub async fn ensure_course<C: ConnectionTrait>(
    conn: &C,
    course_id: Uuid,
) -> Result<(), BillingError> {
    let found = courses::Entity::find_by_id(course_id)
        .count(conn)
        .await
        .map_err(db_error)?;
    if found == 0 {
        return Err(BillingError::CourseNotFound(course_id));
    }
    Ok(())
}

/// Returns an error unless the student is enrolled in the course.
///
/// # Errors
///
/// Returns `BillingError::NotEnrolled` if no enrollment record links
/// the pair, or `BillingError::Database` on storage failure.
pub async fn ensure_enrolled<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
    course_id: Uuid,
) -> Result<(), BillingError> {
    let found = enrollments::Entity::find()
        .filter(enrollments::Column::StudentId.eq(student_id))
        .filter(enrollments::Column::CourseId.eq(course_id))
        .count(conn)
        .await
        .map_err(db_error)?;
    if found == 0 {
        return Err(BillingError::NotEnrolled {
            student_id,
            course_id,
        });
    }
    Ok(())
}
