//! Fee obligation repository.
//!
//! Owns the registry of what each student owes per course. One obligation
//! per (student, course) pair; the database unique constraint backs the
//! duplicate check so concurrent creations cannot slip through.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use bursar_core::billing::{self, BillingError};

use crate::entities::{fee_obligations, sea_orm_active_enums::StatusSource};

use super::directory::{ensure_course, ensure_enrolled, ensure_student};
use super::payment::lock_obligation;
use super::{db_error, on_unique_violation};

/// Input for creating a fee obligation.
#[derive(Debug, Clone)]
pub struct CreateObligationInput {
    /// Student who owes the fee.
    pub student_id: Uuid,
    /// Course the fee is for.
    pub course_id: Uuid,
    /// Amount owed. Must be positive.
    pub amount: Decimal,
    /// Payment deadline.
    pub due_date: NaiveDate,
    /// Optional description.
    pub description: Option<String>,
    /// User creating the obligation.
    pub created_by: Uuid,
}

/// Filters for listing obligations. All present filters are ANDed.
#[derive(Debug, Clone, Default)]
pub struct ObligationFilter {
    /// Filter by fee status.
    pub status: Option<billing::FeeStatus>,
    /// Filter by student.
    pub student_id: Option<Uuid>,
    /// Filter by course.
    pub course_id: Option<Uuid>,
}

/// Fee obligation repository for registry operations.
#[derive(Debug, Clone)]
pub struct ObligationRepository {
    db: DatabaseConnection,
}

impl ObligationRepository {
    /// Creates a new obligation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fee obligation for a student/course pair.
    ///
    /// The student and course must exist, the student must be enrolled in
    /// the course, and no obligation may already exist for the pair.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Amount is zero or negative
    /// - Student or course does not exist
    /// - Student is not enrolled in the course
    /// - An obligation already exists for the pair
    /// - Database operation fails
    pub async fn create_obligation(
        &self,
        input: CreateObligationInput,
    ) -> Result<fee_obligations::Model, BillingError> {
        if input.amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveAmount(input.amount));
        }

        ensure_student(&self.db, input.student_id).await?;
        ensure_course(&self.db, input.course_id).await?;
        ensure_enrolled(&self.db, input.student_id, input.course_id).await?;

        let now = Utc::now().into();
        let obligation = fee_obligations::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(input.student_id),
            course_id: Set(input.course_id),
            amount: Set(input.amount),
            due_date: Set(input.due_date),
            status: Set(billing::FeeStatus::Pending.into()),
            status_source: Set(StatusSource::Derived),
            override_reason: Set(None),
            overridden_by: Set(None),
            overridden_at: Set(None),
            description: Set(input.description),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The unique index on (student_id, course_id) is the authoritative
        // duplicate check; a racing insert surfaces here as a conflict.
        obligation.insert(&self.db).await.map_err(|e| {
            on_unique_violation(
                e,
                BillingError::DuplicateObligation {
                    student_id: input.student_id,
                    course_id: input.course_id,
                },
            )
        })
    }

    /// Gets an obligation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the obligation is not found or the query fails.
    pub async fn get_obligation(
        &self,
        obligation_id: Uuid,
    ) -> Result<fee_obligations::Model, BillingError> {
        fee_obligations::Entity::find_by_id(obligation_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(BillingError::ObligationNotFound(obligation_id))
    }

    /// Lists obligations matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_obligations(
        &self,
        filter: ObligationFilter,
    ) -> Result<Vec<fee_obligations::Model>, BillingError> {
        let mut query = fee_obligations::Entity::find();

        if let Some(status) = filter.status {
            let status: crate::entities::sea_orm_active_enums::FeeStatus = status.into();
            query = query.filter(fee_obligations::Column::Status.eq(status));
        }
        if let Some(student_id) = filter.student_id {
            query = query.filter(fee_obligations::Column::StudentId.eq(student_id));
        }
        if let Some(course_id) = filter.course_id {
            query = query.filter(fee_obligations::Column::CourseId.eq(course_id));
        }

        query
            .order_by_desc(fee_obligations::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Lists all obligations for one student, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the student does not exist or the query fails.
    pub async fn obligations_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<fee_obligations::Model>, BillingError> {
        ensure_student(&self.db, student_id).await?;

        fee_obligations::Entity::find()
            .filter(fee_obligations::Column::StudentId.eq(student_id))
            .order_by_desc(fee_obligations::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Manually overrides an obligation's status.
    ///
    /// The override is recorded with its reason and author. It holds only
    /// until the next payment mutation re-derives the status. The row is
    /// locked for the write so an override never interleaves with an
    /// in-flight reconciliation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reason is empty or whitespace
    /// - The obligation is not found
    /// - Database operation fails
    pub async fn override_status(
        &self,
        obligation_id: Uuid,
        status: billing::FeeStatus,
        reason: &str,
        overridden_by: Uuid,
    ) -> Result<fee_obligations::Model, BillingError> {
        if reason.trim().is_empty() {
            return Err(BillingError::MissingOverrideReason);
        }

        let txn = self.db.begin().await.map_err(db_error)?;

        let obligation = lock_obligation(&txn, obligation_id).await?;

        let now = Utc::now().into();
        let mut active: fee_obligations::ActiveModel = obligation.into();
        active.status = Set(status.into());
        active.status_source = Set(StatusSource::Manual);
        active.override_reason = Set(Some(reason.trim().to_string()));
        active.overridden_by = Set(Some(overridden_by));
        active.overridden_at = Set(Some(now));
        active.updated_at = Set(now);

        let updated = active.update(&txn).await.map_err(db_error)?;
        txn.commit().await.map_err(db_error)?;
        Ok(updated)
    }
}
