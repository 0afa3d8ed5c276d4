//! Versioned schema migrations, tracked with `PRAGMA user_version`.

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Initial schema: tenancy, identity, attendance and stock.
const V1_CORE: &str = r#"
CREATE TABLE IF NOT EXISTS log (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    date      TEXT NOT NULL,
    operation TEXT NOT NULL,
    target    TEXT DEFAULT '',
    message   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS organisations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS zones (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id           INTEGER NOT NULL REFERENCES organisations(id),
    name             TEXT NOT NULL,
    city             TEXT,
    meeting_lat      REAL NOT NULL,
    meeting_lng      REAL NOT NULL,
    geofence_radius  INTEGER NOT NULL CHECK(geofence_radius >= 0)
);

CREATE TABLE IF NOT EXISTS users (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id         INTEGER NOT NULL REFERENCES organisations(id),
    name           TEXT NOT NULL,
    mobile         TEXT NOT NULL DEFAULT '',
    employee_id    TEXT,
    role           TEXT NOT NULL CHECK(role IN ('super_admin','admin','city_manager','supervisor','executive')),
    zone_id        INTEGER,
    supervisor_id  INTEGER REFERENCES users(id),
    fcm_token      TEXT,
    is_active      INTEGER NOT NULL DEFAULT 1,
    created_at     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_org_role ON users(org_id, role);
CREATE INDEX IF NOT EXISTS idx_users_supervisor ON users(supervisor_id);

CREATE TABLE IF NOT EXISTS credentials (
    token       TEXT PRIMARY KEY,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS attendance (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id              INTEGER NOT NULL REFERENCES users(id),
    org_id               INTEGER NOT NULL REFERENCES organisations(id),
    zone_id              INTEGER,
    activity_id          TEXT,
    date                 TEXT NOT NULL,
    status               TEXT NOT NULL CHECK(status IN ('checked_in','on_break','checked_out')),
    checkin_at           TEXT NOT NULL,
    checkin_lat          REAL NOT NULL,
    checkin_lng          REAL NOT NULL,
    checkin_selfie_url   TEXT,
    checkin_distance_m   INTEGER NOT NULL DEFAULT 0,
    checkout_at          TEXT,
    checkout_lat         REAL,
    checkout_lng         REAL,
    checkout_selfie_url  TEXT,
    break_minutes        INTEGER NOT NULL DEFAULT 0,
    working_minutes      INTEGER,
    UNIQUE(user_id, date)
);
CREATE INDEX IF NOT EXISTS idx_attendance_org_date ON attendance(org_id, date);

CREATE TABLE IF NOT EXISTS breaks (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    attendance_id     INTEGER NOT NULL REFERENCES attendance(id),
    user_id           INTEGER NOT NULL REFERENCES users(id),
    started_at        TEXT NOT NULL,
    ended_at          TEXT,
    duration_minutes  INTEGER
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_breaks_one_open
    ON breaks(attendance_id) WHERE ended_at IS NULL;

CREATE TABLE IF NOT EXISTS stock_allocations (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id       INTEGER NOT NULL REFERENCES organisations(id),
    user_id      INTEGER NOT NULL REFERENCES users(id),
    zone_id      INTEGER,
    activity_id  TEXT,
    date         TEXT NOT NULL,
    notes        TEXT,
    status       TEXT NOT NULL DEFAULT 'pending'
                 CHECK(status IN ('pending','accepted','rejected','partially_accepted')),
    created_by   INTEGER NOT NULL REFERENCES users(id),
    created_at   TEXT NOT NULL,
    reviewed_at  TEXT,
    UNIQUE(user_id, date)
);

CREATE TABLE IF NOT EXISTS stock_items (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    allocation_id       INTEGER NOT NULL REFERENCES stock_allocations(id),
    product_name        TEXT NOT NULL,
    sku                 TEXT,
    category            TEXT,
    quantity_allocated  INTEGER NOT NULL CHECK(quantity_allocated > 0),
    quantity_accepted   INTEGER NOT NULL DEFAULT 0,
    unit                TEXT NOT NULL DEFAULT 'units',
    status              TEXT NOT NULL DEFAULT 'pending'
                        CHECK(status IN ('pending','accepted','rejected','partially_accepted')),
    rejection_reason    TEXT
);
CREATE INDEX IF NOT EXISTS idx_stock_items_allocation ON stock_items(allocation_id);
"#;

/// Engagement: leaderboard, SOS, notifications, grievances.
const V2_ENGAGEMENT: &str = r#"
CREATE TABLE IF NOT EXISTS leaderboard_scores (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id        INTEGER NOT NULL REFERENCES users(id),
    org_id         INTEGER NOT NULL REFERENCES organisations(id),
    zone_id        INTEGER,
    period         TEXT NOT NULL CHECK(period IN ('daily','weekly','monthly')),
    period_start   TEXT NOT NULL,
    overall_score  REAL NOT NULL DEFAULT 0,
    UNIQUE(user_id, period, period_start)
);
CREATE INDEX IF NOT EXISTS idx_leaderboard_lookup
    ON leaderboard_scores(org_id, period, period_start);

CREATE TABLE IF NOT EXISTS sos_alerts (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id             INTEGER NOT NULL REFERENCES organisations(id),
    user_id            INTEGER NOT NULL REFERENCES users(id),
    zone_id            INTEGER,
    latitude           REAL NOT NULL,
    longitude          REAL NOT NULL,
    address            TEXT,
    message            TEXT,
    status             TEXT NOT NULL CHECK(status IN ('active','acknowledged','resolved')),
    notified_user_ids  TEXT NOT NULL DEFAULT '[]',
    acknowledged_by    INTEGER,
    acknowledged_at    TEXT,
    resolved_by        INTEGER,
    resolved_at        TEXT,
    resolution_notes   TEXT,
    created_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id      INTEGER NOT NULL REFERENCES organisations(id),
    user_id     INTEGER NOT NULL REFERENCES users(id),
    type        TEXT NOT NULL,
    title       TEXT NOT NULL,
    body        TEXT NOT NULL,
    data        TEXT NOT NULL DEFAULT '{}',
    is_read     INTEGER NOT NULL DEFAULT 0,
    read_at     TEXT,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, is_read);

CREATE TABLE IF NOT EXISTS grievances (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    reference_no   TEXT NOT NULL UNIQUE,
    org_id         INTEGER NOT NULL REFERENCES organisations(id),
    submitted_by   INTEGER NOT NULL REFERENCES users(id),
    category       TEXT NOT NULL,
    against_role   TEXT,
    incident_date  TEXT,
    description    TEXT NOT NULL,
    evidence_urls  TEXT NOT NULL DEFAULT '[]',
    is_anonymous   INTEGER NOT NULL DEFAULT 0,
    status         TEXT NOT NULL DEFAULT 'submitted'
                   CHECK(status IN ('submitted','under_review','resolved','dismissed')),
    resolution     TEXT,
    reviewed_by    INTEGER,
    reviewed_at    TEXT,
    created_at     TEXT NOT NULL
);
"#;

/// Content: broadcast quizzes, learning materials, dynamic forms.
const V3_CONTENT: &str = r#"
CREATE TABLE IF NOT EXISTS broadcast_questions (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id           INTEGER NOT NULL REFERENCES organisations(id),
    created_by       INTEGER NOT NULL REFERENCES users(id),
    question         TEXT NOT NULL,
    options          TEXT NOT NULL,
    correct_option   INTEGER,
    is_urgent        INTEGER NOT NULL DEFAULT 0,
    deadline_at      TEXT,
    target_roles     TEXT NOT NULL DEFAULT '["executive"]',
    target_zone_ids  TEXT NOT NULL DEFAULT '[]',
    status           TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','closed')),
    created_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS broadcast_answers (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id  INTEGER NOT NULL REFERENCES broadcast_questions(id),
    user_id      INTEGER NOT NULL REFERENCES users(id),
    org_id       INTEGER NOT NULL REFERENCES organisations(id),
    selected     INTEGER NOT NULL,
    is_correct   INTEGER,
    answered_at  TEXT NOT NULL,
    UNIQUE(question_id, user_id)
);

CREATE TABLE IF NOT EXISTS learning_materials (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id         INTEGER NOT NULL REFERENCES organisations(id),
    created_by     INTEGER NOT NULL REFERENCES users(id),
    title          TEXT NOT NULL,
    description    TEXT,
    category       TEXT,
    type           TEXT NOT NULL CHECK(type IN ('video','pdf','slides','document','link')),
    file_url       TEXT NOT NULL,
    thumbnail_url  TEXT,
    duration_min   INTEGER,
    page_count     INTEGER,
    target_roles   TEXT NOT NULL DEFAULT '["executive"]',
    is_mandatory   INTEGER NOT NULL DEFAULT 0,
    is_active      INTEGER NOT NULL DEFAULT 1,
    published_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS learning_progress (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    material_id    INTEGER NOT NULL REFERENCES learning_materials(id),
    user_id        INTEGER NOT NULL REFERENCES users(id),
    org_id         INTEGER NOT NULL REFERENCES organisations(id),
    progress_pct   INTEGER NOT NULL DEFAULT 0,
    is_completed   INTEGER NOT NULL DEFAULT 0,
    last_accessed  TEXT NOT NULL,
    completed_at   TEXT,
    UNIQUE(material_id, user_id)
);

CREATE TABLE IF NOT EXISTS form_templates (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id          INTEGER NOT NULL REFERENCES organisations(id),
    activity_id     TEXT NOT NULL,
    name            TEXT NOT NULL,
    description     TEXT,
    requires_photo  INTEGER NOT NULL DEFAULT 0,
    requires_gps    INTEGER NOT NULL DEFAULT 1,
    is_active       INTEGER NOT NULL DEFAULT 1,
    created_by      INTEGER NOT NULL REFERENCES users(id),
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS form_fields (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    template_id  INTEGER NOT NULL REFERENCES form_templates(id),
    label        TEXT NOT NULL,
    field_key    TEXT NOT NULL,
    field_type   TEXT NOT NULL,
    placeholder  TEXT,
    help_text    TEXT,
    is_required  INTEGER NOT NULL DEFAULT 0,
    sort_order   INTEGER NOT NULL DEFAULT 0,
    options      TEXT NOT NULL DEFAULT '[]',
    validation   TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS form_submissions (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id           INTEGER NOT NULL REFERENCES organisations(id),
    user_id          INTEGER NOT NULL REFERENCES users(id),
    template_id      INTEGER NOT NULL REFERENCES form_templates(id),
    activity_id      TEXT,
    attendance_id    INTEGER REFERENCES attendance(id),
    latitude         REAL,
    longitude        REAL,
    address          TEXT,
    is_converted     INTEGER NOT NULL DEFAULT 0,
    outlet_name      TEXT,
    consumer_age     TEXT,
    consumer_gender  TEXT,
    submitted_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS form_responses (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    submission_id  INTEGER NOT NULL REFERENCES form_submissions(id),
    field_id       INTEGER NOT NULL,
    field_key      TEXT NOT NULL,
    value_text     TEXT,
    value_number   REAL,
    value_bool     INTEGER,
    value_json     TEXT,
    photo_url      TEXT
);
"#;

/// Field supervision: visit logs, zone addresses and retirement.
const V4_FIELD: &str = r#"
ALTER TABLE zones ADD COLUMN meeting_address TEXT;
ALTER TABLE zones ADD COLUMN is_active INTEGER NOT NULL DEFAULT 1;

CREATE TABLE IF NOT EXISTS visit_logs (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    org_id        INTEGER NOT NULL REFERENCES organisations(id),
    executive_id  INTEGER NOT NULL REFERENCES users(id),
    visitor_id    INTEGER NOT NULL REFERENCES users(id),
    zone_id       INTEGER,
    date          TEXT NOT NULL,
    visited_at    TEXT NOT NULL,
    rating        TEXT NOT NULL CHECK(rating IN ('excellent','good','average','poor')),
    remarks       TEXT,
    photo_url     TEXT,
    latitude      REAL,
    longitude     REAL
);
CREATE INDEX IF NOT EXISTS idx_visit_logs_org_date ON visit_logs(org_id, date);
"#;

/// Ordered migrations; index + 1 is the schema version they produce.
const MIGRATIONS: [(&str, &str); 4] = [
    ("core", V1_CORE),
    ("engagement", V2_ENGAGEMENT),
    ("content", V3_CONTENT),
    ("field", V4_FIELD),
];

pub fn schema_version(conn: &Connection) -> AppResult<i64> {
    let v: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(v)
}

pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

/// Apply every migration newer than the stored `user_version`.
/// Returns the names of the migrations that ran.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    let current = schema_version(conn)?;
    if current > latest_version() {
        return Err(AppError::Migration(format!(
            "database schema v{} is newer than this binary (v{})",
            current,
            latest_version()
        )));
    }

    let mut applied = Vec::new();
    for (idx, (name, sql)) in MIGRATIONS.iter().enumerate() {
        let version = idx as i64 + 1;
        if version <= current {
            continue;
        }

        let batch = format!("BEGIN;\n{}\nPRAGMA user_version = {};\nCOMMIT;", sql, version);
        if let Err(e) = conn.execute_batch(&batch) {
            let _ = conn.execute_batch("ROLLBACK;");
            return Err(AppError::Migration(format!("{} (v{}): {}", name, version, e)));
        }

        crate::db::log::audit(
            conn,
            "migration_applied",
            name,
            &format!("Schema upgraded to v{}", version),
        );
        applied.push(*name);
    }

    Ok(applied)
}
