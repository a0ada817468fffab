//! SQL schema for the Inkbook SQLite store.
//!
//! Instants are stored as RFC 3339 UTC text with a fixed microsecond width,
//! so lexical order matches chronological order and range predicates work on
//! the raw column. Calendar dates are stored as `YYYY-MM-DD`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS clients (
    client_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL CHECK (length(trim(name)) > 0),
    phone       TEXT,
    email       TEXT UNIQUE,           -- NULLs do not collide
    notes       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS artists (
    artist_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS appointments (
    appointment_id   TEXT PRIMARY KEY,
    client_id        TEXT NOT NULL REFERENCES clients(client_id) ON DELETE CASCADE,
    artist_id        TEXT NOT NULL REFERENCES artists(artist_id) ON DELETE RESTRICT,
    appointment_time TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
    description      TEXT,
    status           TEXT NOT NULL DEFAULT 'scheduled'
                     CHECK (status IN ('scheduled', 'completed', 'canceled', 'no-show')),
    payment_status   TEXT NOT NULL DEFAULT 'pending'
                     CHECK (payment_status IN ('pending', 'deposit_paid', 'fully_paid')),
    total_price      INTEGER CHECK (total_price IS NULL OR total_price >= 0),
    amount_paid      INTEGER NOT NULL DEFAULT 0 CHECK (amount_paid >= 0),
    deposit_paid_at  TEXT,             -- write-once
    completed_at     TEXT,             -- write-once
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL,
    CHECK (total_price IS NULL OR amount_paid <= total_price)
);

CREATE TRIGGER IF NOT EXISTS appointments_deposit_paid_at_write_once
BEFORE UPDATE OF deposit_paid_at ON appointments
WHEN OLD.deposit_paid_at IS NOT NULL
 AND (NEW.deposit_paid_at IS NULL OR NEW.deposit_paid_at != OLD.deposit_paid_at)
BEGIN
    SELECT RAISE(ABORT, 'deposit_paid_at is write-once');
END;

CREATE TRIGGER IF NOT EXISTS appointments_completed_at_write_once
BEFORE UPDATE OF completed_at ON appointments
WHEN OLD.completed_at IS NOT NULL
 AND (NEW.completed_at IS NULL OR NEW.completed_at != OLD.completed_at)
BEGIN
    SELECT RAISE(ABORT, 'completed_at is write-once');
END;

CREATE INDEX IF NOT EXISTS appointments_artist_time_idx
    ON appointments(artist_id, appointment_time);
CREATE INDEX IF NOT EXISTS appointments_client_idx       ON appointments(client_id);
CREATE INDEX IF NOT EXISTS appointments_deposit_paid_idx ON appointments(deposit_paid_at);
CREATE INDEX IF NOT EXISTS appointments_completed_idx    ON appointments(completed_at);

CREATE TABLE IF NOT EXISTS expenses (
    expense_id   TEXT PRIMARY KEY,
    description  TEXT NOT NULL CHECK (length(trim(description)) > 0),
    amount       INTEGER NOT NULL CHECK (amount > 0),
    category     TEXT NOT NULL
                 CHECK (category IN ('rent', 'supplies', 'utilities', 'other')),
    expense_date TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS expenses_date_idx ON expenses(expense_date);

PRAGMA user_version = 1;
";
