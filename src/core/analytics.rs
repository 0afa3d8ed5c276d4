//! Dashboard figures for management: daily KPIs, a merged feed of recent
//! field events, and engagements by hour.

use crate::core::auth::Session;
use crate::db::analytics as store;
use crate::errors::AppResult;
use crate::models::role::Role;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::Serialize;

pub const FEED_DEFAULT_LIMIT: u32 = 20;
pub const FEED_MAX_LIMIT: u32 = 50;

/// Hours always present in the hourly chart, even when empty.
const WORKING_HOURS: std::ops::RangeInclusive<u32> = 8..=20;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub date: NaiveDate,
    pub executives_checked_in: u64,
    pub executives_active: u64,
    pub total_executives: u64,
    pub total_engagements: u64,
    pub total_conversions: u64,
    pub conversion_rate: u64,
    pub active_sos_alerts: u64,
    pub open_grievances: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    CheckIn,
    FormSubmission,
    Sos,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: FeedKind,
    pub time: DateTime<Utc>,
    pub user_name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyBucket {
    pub hour: u32,
    pub label: String,
    pub engagements: u64,
    pub conversions: u64,
}

/// Whole-percent share of conversions; zero when nothing was engaged.
pub fn conversion_rate(engagements: u64, conversions: u64) -> u64 {
    if engagements == 0 {
        return 0;
    }
    (conversions as f64 / engagements as f64 * 100.0).round() as u64
}

/// Bucket submissions by UTC hour, keeping working hours and any busy hour.
pub fn hourly_buckets(submissions: &[(DateTime<Utc>, bool)]) -> Vec<HourlyBucket> {
    let mut buckets: Vec<HourlyBucket> = (0..24)
        .map(|hour| HourlyBucket {
            hour,
            label: format!("{:02}:00", hour),
            engagements: 0,
            conversions: 0,
        })
        .collect();
    for (at, converted) in submissions {
        let b = &mut buckets[at.hour() as usize];
        b.engagements += 1;
        if *converted {
            b.conversions += 1;
        }
    }
    buckets
        .into_iter()
        .filter(|b| b.engagements > 0 || WORKING_HOURS.contains(&b.hour))
        .collect()
}

pub struct AnalyticsLogic;

impl AnalyticsLogic {
    pub fn summary(s: &Session, date: NaiveDate) -> AppResult<Summary> {
        s.require(Role::Supervisor)?;
        let conn = &s.pool.conn;
        let org_id = s.caller.org_id;

        let (checked_in, still_in) = store::attendance_counts(conn, org_id, &date)?;
        let (engagements, conversions) = store::submission_counts(conn, org_id, &date)?;
        Ok(Summary {
            date,
            executives_checked_in: checked_in,
            executives_active: still_in,
            total_executives: store::active_executives(conn, org_id)?,
            total_engagements: engagements,
            total_conversions: conversions,
            conversion_rate: conversion_rate(engagements, conversions),
            active_sos_alerts: store::active_sos(conn, org_id)?,
            open_grievances: store::open_grievances(conn, org_id)?,
        })
    }

    /// Newest events first; `limit` defaults to 20 and is capped at 50.
    pub fn activity_feed(s: &Session, limit: Option<u32>) -> AppResult<Vec<FeedItem>> {
        s.require(Role::Supervisor)?;
        let limit = limit.unwrap_or(FEED_DEFAULT_LIMIT).clamp(1, FEED_MAX_LIMIT);
        let conn = &s.pool.conn;
        let org_id = s.caller.org_id;

        let mut feed: Vec<FeedItem> = Vec::new();
        for c in store::recent_checkins(conn, org_id, limit)? {
            feed.push(FeedItem {
                id: c.id,
                kind: FeedKind::CheckIn,
                time: c.at,
                description: format!(
                    "{} checked in at {}",
                    c.user_name,
                    c.zone_name.as_deref().unwrap_or("Unknown zone")
                ),
                user_name: c.user_name,
                zone: c.zone_name,
                outlet: None,
                activity: None,
                status: None,
            });
        }
        for f in store::recent_submissions(conn, org_id, limit)? {
            let suffix = if f.is_converted { " ✓ Converted" } else { "" };
            feed.push(FeedItem {
                id: f.id,
                kind: FeedKind::FormSubmission,
                time: f.at,
                description: format!("{} submitted form{}", f.user_name, suffix),
                user_name: f.user_name,
                zone: None,
                outlet: f.outlet_name,
                activity: f.activity_id,
                status: None,
            });
        }
        for a in store::recent_sos(conn, org_id, limit)? {
            feed.push(FeedItem {
                id: a.id,
                kind: FeedKind::Sos,
                time: a.at,
                description: format!("{} raised an SOS alert", a.user_name),
                user_name: a.user_name,
                zone: None,
                outlet: None,
                activity: None,
                status: Some(a.status),
            });
        }

        feed.sort_by(|a, b| b.time.cmp(&a.time));
        feed.truncate(limit as usize);
        Ok(feed)
    }

    pub fn hourly(s: &Session, date: NaiveDate) -> AppResult<Vec<HourlyBucket>> {
        s.require(Role::Supervisor)?;
        let rows = store::submissions_on(&s.pool.conn, s.caller.org_id, &date)?;
        Ok(hourly_buckets(&rows))
    }
}
