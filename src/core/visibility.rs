//! Role-based redaction applied to record sets before they leave the crate.

use crate::models::broadcast::BroadcastQuestion;
use crate::models::grievance::Grievance;
use crate::models::role::Role;
use crate::models::user::UserProfile;

/// Null out submitter identity on anonymous grievances (admin listing only).
pub fn redact_anonymous(grievances: Vec<Grievance>) -> Vec<Grievance> {
    grievances
        .into_iter()
        .map(|mut g| {
            if g.is_anonymous {
                g.submitted_by = None;
                g.submitter = None;
            }
            g
        })
        .collect()
}

/// Hide the answer key of a quiz question from non-administrative roles.
pub fn mask_answer_key(role: Role, mut question: BroadcastQuestion) -> BroadcastQuestion {
    if !role.is_administrative() {
        question.correct_option = None;
        for opt in &mut question.options {
            opt.is_correct = None;
        }
    }
    question
}

/// Restrict an organisation-wide team listing for supervisors to their direct
/// reports. Other roles see the whole set.
pub fn scope_to_team<T, F>(caller: &UserProfile, rows: Vec<T>, supervisor_of: F) -> Vec<T>
where
    F: Fn(&T) -> Option<i64>,
{
    if caller.role != Role::Supervisor {
        return rows;
    }
    rows.into_iter()
        .filter(|row| supervisor_of(row) == Some(caller.id))
        .collect()
}
