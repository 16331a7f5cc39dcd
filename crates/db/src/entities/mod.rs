//! `SeaORM` entity definitions.

pub mod courses;
pub mod enrollments;
pub mod fee_obligations;
pub mod invoice_payments;
pub mod invoice_sequences;
pub mod invoices;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod students;
