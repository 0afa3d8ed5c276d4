use super::{
    date_to_db, get_bool, get_enum, get_json, get_opt_bool, get_ts, to_count, ts_to_db,
};
use crate::errors::AppResult;
use crate::models::form::{
    FieldType, FormField, FormResponse, FormSubmission, FormTemplate, NewField, NewSubmission,
    NewTemplate,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_template(row: &Row) -> rusqlite::Result<FormTemplate> {
    Ok(FormTemplate {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        activity_id: row.get("activity_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        requires_photo: get_bool(row, "requires_photo")?,
        requires_gps: get_bool(row, "requires_gps")?,
        is_active: get_bool(row, "is_active")?,
        created_by: row.get("created_by")?,
        created_at: get_ts(row, "created_at")?,
        fields: Vec::new(),
    })
}

fn map_field(row: &Row) -> rusqlite::Result<FormField> {
    Ok(FormField {
        id: row.get("id")?,
        template_id: row.get("template_id")?,
        label: row.get("label")?,
        field_key: row.get("field_key")?,
        field_type: get_enum(row, "field_type", FieldType::from_db_str)?,
        placeholder: row.get("placeholder")?,
        help_text: row.get("help_text")?,
        is_required: get_bool(row, "is_required")?,
        sort_order: row.get("sort_order")?,
        options: get_json(row, "options")?,
        validation: get_json(row, "validation")?,
    })
}

fn map_submission(row: &Row) -> rusqlite::Result<FormSubmission> {
    Ok(FormSubmission {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        user_id: row.get("user_id")?,
        template_id: row.get("template_id")?,
        template_name: row.get("template_name")?,
        activity_id: row.get("activity_id")?,
        attendance_id: row.get("attendance_id")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        address: row.get("address")?,
        is_converted: get_bool(row, "is_converted")?,
        outlet_name: row.get("outlet_name")?,
        consumer_age: row.get("consumer_age")?,
        consumer_gender: row.get("consumer_gender")?,
        submitted_at: get_ts(row, "submitted_at")?,
        responses: None,
    })
}

fn map_response(row: &Row) -> rusqlite::Result<FormResponse> {
    let json: Option<String> = row.get("value_json")?;
    Ok(FormResponse {
        id: row.get("id")?,
        field_id: row.get("field_id")?,
        field_key: row.get("field_key")?,
        value_text: row.get("value_text")?,
        value_number: row.get("value_number")?,
        value_bool: get_opt_bool(row, "value_bool")?,
        value_json: json.and_then(|s| serde_json::from_str(&s).ok()),
        photo_url: row.get("photo_url")?,
    })
}

const SUBMISSION_SELECT: &str = "SELECT s.*, t.name AS template_name
     FROM form_submissions s
     LEFT JOIN form_templates t ON t.id = s.template_id";

// ---------------------------
// Templates
// ---------------------------

pub fn insert_template(
    conn: &Connection,
    org_id: i64,
    created_by: i64,
    t: &NewTemplate,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO form_templates (org_id, activity_id, name, description, requires_photo,
                                     requires_gps, is_active, created_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8)",
        params![
            org_id,
            t.activity_id,
            t.name,
            t.description,
            t.requires_photo,
            t.requires_gps,
            created_by,
            ts_to_db(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_field(conn: &Connection, template_id: i64, f: &NewField) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO form_fields (template_id, label, field_key, field_type, placeholder,
                                  help_text, is_required, sort_order, options, validation)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            template_id,
            f.label,
            f.field_key,
            f.field_type.to_db_str(),
            f.placeholder,
            f.help_text,
            f.is_required,
            f.sort_order,
            serde_json::to_string(&f.options)?,
            serde_json::to_string(&f.validation)?,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn fields_for(conn: &Connection, template_id: i64) -> AppResult<Vec<FormField>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM form_fields WHERE template_id = ?1 ORDER BY sort_order ASC, id ASC",
    )?;
    let rows = stmt.query_map([template_id], map_field)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_field(conn: &Connection, id: i64) -> AppResult<Option<FormField>> {
    let f = conn
        .query_row("SELECT * FROM form_fields WHERE id = ?1", [id], map_field)
        .optional()?;
    Ok(f)
}

/// A template of the organisation, with its ordered fields.
pub fn find_template_in_org(
    conn: &Connection,
    id: i64,
    org_id: i64,
) -> AppResult<Option<FormTemplate>> {
    let t = conn
        .query_row(
            "SELECT * FROM form_templates WHERE id = ?1 AND org_id = ?2",
            [id, org_id],
            map_template,
        )
        .optional()?;
    match t {
        Some(mut t) => {
            t.fields = fields_for(conn, t.id)?;
            Ok(Some(t))
        }
        None => Ok(None),
    }
}

pub fn active_templates(
    conn: &Connection,
    org_id: i64,
    activity_id: Option<&str>,
) -> AppResult<Vec<FormTemplate>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM form_templates
         WHERE org_id = ?1 AND is_active = 1 AND (?2 IS NULL OR activity_id = ?2)
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![org_id, activity_id], map_template)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    for t in &mut out {
        t.fields = fields_for(conn, t.id)?;
    }
    Ok(out)
}

// ---------------------------
// Submissions
// ---------------------------

pub fn insert_submission(
    conn: &Connection,
    org_id: i64,
    user_id: i64,
    attendance_id: Option<i64>,
    s: &NewSubmission,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO form_submissions (org_id, user_id, template_id, activity_id, attendance_id,
                                       latitude, longitude, address, is_converted, outlet_name,
                                       consumer_age, consumer_gender, submitted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            org_id,
            user_id,
            s.template_id,
            s.activity_id,
            attendance_id,
            s.latitude,
            s.longitude,
            s.address,
            s.is_converted,
            s.outlet_name,
            s.consumer_age,
            s.consumer_gender,
            ts_to_db(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_response(conn: &Connection, submission_id: i64, r: &FormResponse) -> AppResult<()> {
    let json = match &r.value_json {
        Some(v) => Some(serde_json::to_string(v)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO form_responses (submission_id, field_id, field_key, value_text, value_number,
                                     value_bool, value_json, photo_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            submission_id,
            r.field_id,
            r.field_key,
            r.value_text,
            r.value_number,
            r.value_bool,
            json,
            r.photo_url,
        ],
    )?;
    Ok(())
}

pub fn responses_for(conn: &Connection, submission_id: i64) -> AppResult<Vec<FormResponse>> {
    let mut stmt =
        conn.prepare_cached("SELECT * FROM form_responses WHERE submission_id = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map([submission_id], map_response)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// A submission of the organisation with its responses.
pub fn find_submission_in_org(
    conn: &Connection,
    id: i64,
    org_id: i64,
) -> AppResult<Option<FormSubmission>> {
    let sql = format!("{} WHERE s.id = ?1 AND s.org_id = ?2", SUBMISSION_SELECT);
    let s = conn.query_row(&sql, [id, org_id], map_submission).optional()?;
    match s {
        Some(mut s) => {
            s.responses = Some(responses_for(conn, s.id)?);
            Ok(Some(s))
        }
        None => Ok(None),
    }
}

/// Filters for submission listings. `None` means "any".
#[derive(Debug, Default, Clone)]
pub struct SubmissionFilter<'a> {
    pub user_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub activity_id: Option<&'a str>,
}

/// One page of the organisation's submissions, newest first, plus the total.
pub fn list_submissions(
    conn: &Connection,
    org_id: i64,
    filter: &SubmissionFilter,
    limit: u32,
    offset: u32,
) -> AppResult<(Vec<FormSubmission>, u64)> {
    let date = filter.date.as_ref().map(date_to_db);
    let condition = "s.org_id = ?1
         AND (?2 IS NULL OR s.user_id = ?2)
         AND (?3 IS NULL OR substr(s.submitted_at, 1, 10) = ?3)
         AND (?4 IS NULL OR s.activity_id = ?4)";

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM form_submissions s WHERE {}", condition),
        params![org_id, filter.user_id, date, filter.activity_id],
        |row| row.get(0),
    )?;

    let sql = format!(
        "{} WHERE {} ORDER BY s.submitted_at DESC, s.id DESC LIMIT ?5 OFFSET ?6",
        SUBMISSION_SELECT, condition
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![org_id, filter.user_id, date, filter.activity_id, limit, offset],
        map_submission,
    )?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok((out, to_count(total)))
}
