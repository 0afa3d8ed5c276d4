use super::{Context, read_body};
use crate::cli::parser::UsersCmd;
use crate::core::users::UsersLogic;
use crate::db::users::UserFilter;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::{NewUser, UserUpdate};
use crate::ui::envelope;
use serde::{Deserialize, Deserializer};

fn parse_role(role: &str) -> AppResult<Role> {
    Role::from_db_str(role).ok_or_else(|| AppError::validation(format!("Unknown role '{}'", role)))
}

/// Distinguish an explicit `null` (clear) from an absent key (keep).
fn present<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateBody {
    name: String,
    mobile: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    employee_id: Option<String>,
    #[serde(default)]
    zone_id: Option<i64>,
    #[serde(default)]
    supervisor_id: Option<i64>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    employee_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    zone_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    supervisor_id: Option<Option<i64>>,
    #[serde(default)]
    is_active: Option<bool>,
}

pub fn handle(action: &UsersCmd, ctx: &Context) -> AppResult<()> {
    match action {
        UsersCmd::List {
            role,
            zone,
            active,
            page,
            limit,
        } => {
            let filter = UserFilter {
                role: role.as_deref().map(parse_role).transpose()?,
                zone_id: *zone,
                is_active: *active,
                supervisor_id: None,
            };
            let s = ctx.session()?;
            envelope::ok(&UsersLogic::list(&s, &filter, ctx.page(*page, *limit))?)
        }

        UsersCmd::Create { body } => {
            let body: CreateBody = read_body(body)?;
            let role = match &body.role {
                Some(r) => parse_role(r)?,
                None => Role::Executive,
            };
            let user = NewUser {
                org_id: 0,
                name: body.name,
                mobile: body.mobile,
                employee_id: body.employee_id,
                role,
                zone_id: body.zone_id,
                supervisor_id: body.supervisor_id,
                is_active: true,
            };
            let mut s = ctx.session()?;
            let created = UsersLogic::create(&mut s, &user, body.token.as_deref())?;
            envelope::created(&created, "User created")
        }

        UsersCmd::Update { id, body } => {
            let body: UpdateBody = read_body(body)?;
            let update = UserUpdate {
                name: body.name,
                employee_id: body.employee_id,
                zone_id: body.zone_id,
                supervisor_id: body.supervisor_id,
                is_active: body.is_active,
            };
            let s = ctx.session()?;
            envelope::ok_with(&UsersLogic::update(&s, *id, &update)?, "User updated")
        }
    }
}
