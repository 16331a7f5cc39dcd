//! Initial schema migration.
//!
//! Creates the collaborator tables (students, courses, enrollments), the
//! billing ledger tables (fee_obligations, payments), the invoice snapshot
//! tables (invoices, invoice_payments), and the invoice sequence counter.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS invoice_payments, invoices, invoice_sequences, payments, \
             fee_obligations, enrollments, courses, students CASCADE; \
             DROP TYPE IF EXISTS fee_status, status_source, payment_method, invoice_status;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Enum types
CREATE TYPE fee_status AS ENUM ('pending', 'partial', 'paid');
CREATE TYPE status_source AS ENUM ('derived', 'manual');
CREATE TYPE payment_method AS ENUM ('cash', 'bank_transfer', 'credit_card', 'debit_card', 'online', 'other');
CREATE TYPE invoice_status AS ENUM ('draft', 'issued', 'paid', 'overdue', 'cancelled');

-- Collaborator tables (consulted only for preconditions)
CREATE TABLE students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE courses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(32) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE enrollments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    enrolled_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_enrollments_student_course UNIQUE (student_id, course_id)
);

-- Fee obligations: one per (student, course) pair
CREATE TABLE fee_obligations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE RESTRICT,
    course_id UUID NOT NULL REFERENCES courses(id) ON DELETE RESTRICT,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    due_date DATE NOT NULL,
    status fee_status NOT NULL DEFAULT 'pending',
    status_source status_source NOT NULL DEFAULT 'derived',
    override_reason TEXT,
    overridden_by UUID,
    overridden_at TIMESTAMPTZ,
    description TEXT,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_obligations_student_course UNIQUE (student_id, course_id)
);

CREATE INDEX idx_obligations_student ON fee_obligations(student_id, created_at DESC);
CREATE INDEX idx_obligations_course ON fee_obligations(course_id, created_at DESC);
CREATE INDEX idx_obligations_status ON fee_obligations(status, created_at DESC);

-- Payments against an obligation
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE RESTRICT,
    obligation_id UUID NOT NULL REFERENCES fee_obligations(id) ON DELETE CASCADE,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    payment_date DATE NOT NULL,
    method payment_method NOT NULL,
    transaction_id VARCHAR(128),
    notes TEXT,
    recorded_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_payments_obligation ON payments(obligation_id, created_at DESC);
CREATE INDEX idx_payments_student ON payments(student_id, created_at DESC);

-- Global invoice sequence: advanced with a single atomic increment
CREATE TABLE invoice_sequences (
    id SMALLINT PRIMARY KEY CHECK (id = 1),
    value BIGINT NOT NULL
);
INSERT INTO invoice_sequences (id, value) VALUES (1, 0);

-- Immutable invoice snapshots
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_number VARCHAR(32) NOT NULL UNIQUE,
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE RESTRICT,
    obligation_id UUID NOT NULL REFERENCES fee_obligations(id) ON DELETE RESTRICT,
    total_amount NUMERIC(19, 4) NOT NULL,
    amount_paid NUMERIC(19, 4) NOT NULL,
    balance NUMERIC(19, 4) NOT NULL,
    status invoice_status NOT NULL,
    issue_date DATE NOT NULL,
    due_date DATE NOT NULL,
    notes TEXT,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_invoice_balance CHECK (balance = total_amount - amount_paid)
);

CREATE INDEX idx_invoices_student ON invoices(student_id, created_at DESC);
CREATE INDEX idx_invoices_status ON invoices(status, created_at DESC);
CREATE INDEX idx_invoices_obligation ON invoices(obligation_id);

-- Payment lines captured at generation time; amounts are copied so the
-- snapshot survives later payment corrections or deletions
CREATE TABLE invoice_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    payment_id UUID REFERENCES payments(id) ON DELETE SET NULL,
    position INTEGER NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    payment_date DATE NOT NULL,
    method payment_method NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_invoice_payment_position UNIQUE (invoice_id, position)
);
";
