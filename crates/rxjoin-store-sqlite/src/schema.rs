//! SQL schema for the rxjoin SQLite store.
//!
//! Table and column names are shared with the JSON wire format (`nome`) and
//! with existing datasets, so they stay in Portuguese.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS pacientes (
    id   INTEGER PRIMARY KEY,
    nome TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS medicamentos (
    id   INTEGER PRIMARY KEY,
    nome TEXT NOT NULL UNIQUE CHECK (length(nome) <= 100)
);

-- Many-to-many: a patient holds each drug at most once.
CREATE TABLE IF NOT EXISTS paciente_medicamentos (
    paciente_id    INTEGER NOT NULL REFERENCES pacientes(id),
    medicamento_id INTEGER NOT NULL REFERENCES medicamentos(id),
    PRIMARY KEY (paciente_id, medicamento_id)
);

-- Unordered pairs, stored lower id first.
CREATE TABLE IF NOT EXISTS interacoes_medicamentosas (
    id         INTEGER PRIMARY KEY,
    med1_id    INTEGER NOT NULL REFERENCES medicamentos(id),
    med2_id    INTEGER NOT NULL REFERENCES medicamentos(id),
    severidade TEXT NOT NULL CHECK (severidade IN ('Leve', 'Moderada', 'Grave')),
    descricao  TEXT,
    UNIQUE (med1_id, med2_id),
    CHECK  (med1_id < med2_id)
);

CREATE INDEX IF NOT EXISTS paciente_medicamentos_medicamento_idx
    ON paciente_medicamentos(medicamento_id);
";

/// Drops every table so [`SCHEMA`] can recreate them empty.
pub const DROP_ALL: &str = "
DROP TABLE IF EXISTS interacoes_medicamentosas;
DROP TABLE IF EXISTS paciente_medicamentos;
DROP TABLE IF EXISTS medicamentos;
DROP TABLE IF EXISTS pacientes;
";

/// Split a DDL script into individual statements.
///
/// `sqlx::query` prepares exactly one statement, so scripts are executed
/// statement by statement. Scripts must not contain `;` inside literals or
/// comments.
pub fn statements(script: &str) -> impl Iterator<Item = &str> {
  script.split(';').map(str::trim).filter(|s| !s.is_empty())
}
