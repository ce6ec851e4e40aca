//! Overlap validation for owner-scoped validity intervals.
//!
//! Intervals are half-open `[start, end)`: one ending exactly when another
//! starts does not overlap it. Used for membership periods (owned by a member)
//! and plan price windows (owned by a membership plan).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{membership_entity, plan_price_entity};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        self.start < self.end
    }

    pub fn overlaps(&self, other: &Period) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// An existing interval and the id of the row it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub id: i64,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntervalCheck {
    Ok,
    InvalidInput(String),
    /// Id of the existing row the candidate collides with.
    Conflict(i64),
}

impl IntervalCheck {
    pub fn into_result(self, what: &str) -> AppResult<()> {
        match self {
            IntervalCheck::Ok => Ok(()),
            IntervalCheck::InvalidInput(msg) => Err(AppError::ValidationError(msg)),
            IntervalCheck::Conflict(id) => Err(AppError::Conflict(format!(
                "{what} overlaps with existing {what} {id}"
            ))),
        }
    }
}

#[async_trait]
pub trait IntervalSource: Send + Sync {
    async fn intervals_for(&self, owner_id: i64) -> AppResult<Vec<Interval>>;
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_instant(field: &str, raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::ValidationError(format!("{field} is not a valid date: {raw}")))
}

pub fn parse_period(start: &str, end: &str) -> AppResult<Period> {
    Ok(Period::new(
        parse_instant("start date", start)?,
        parse_instant("end date", end)?,
    ))
}

/// First existing interval that overlaps `candidate`, ignoring `exclude_id`.
/// Every interval is checked; the set is not assumed to be sorted.
pub fn find_overlap(
    existing: &[Interval],
    candidate: &Period,
    exclude_id: Option<i64>,
) -> Option<i64> {
    existing
        .iter()
        .filter(|interval| Some(interval.id) != exclude_id)
        .find(|interval| interval.period.overlaps(candidate))
        .map(|interval| interval.id)
}

pub fn has_overlap(existing: &[Interval], candidate: &Period, exclude_id: Option<i64>) -> bool {
    find_overlap(existing, candidate, exclude_id).is_some()
}

/// Check a candidate interval for `owner_id`. Ordering is validated before
/// the source is consulted.
pub async fn validate_interval<S: IntervalSource + ?Sized>(
    source: &S,
    owner_id: i64,
    candidate: Period,
    exclude_id: Option<i64>,
) -> AppResult<IntervalCheck> {
    if !candidate.is_ordered() {
        return Ok(IntervalCheck::InvalidInput(
            "start date must be before end date".to_string(),
        ));
    }

    let existing = source.intervals_for(owner_id).await?;
    Ok(match find_overlap(&existing, &candidate, exclude_id) {
        Some(id) => IntervalCheck::Conflict(id),
        None => IntervalCheck::Ok,
    })
}

/// Membership periods of one member.
pub struct MembershipIntervals<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> MembershipIntervals<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: ConnectionTrait> IntervalSource for MembershipIntervals<'_, C> {
    async fn intervals_for(&self, member_id: i64) -> AppResult<Vec<Interval>> {
        let rows = membership_entity::Entity::find()
            .filter(membership_entity::Column::MemberId.eq(member_id))
            .all(self.conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|m| Interval {
                id: m.id,
                period: Period::new(m.start_date, m.end_date),
            })
            .collect())
    }
}

/// Price validity windows of one membership plan.
pub struct PriceIntervals<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> PriceIntervals<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: ConnectionTrait> IntervalSource for PriceIntervals<'_, C> {
    async fn intervals_for(&self, plan_id: i64) -> AppResult<Vec<Interval>> {
        let rows = plan_price_entity::Entity::find()
            .filter(plan_price_entity::Column::MembershipPlanId.eq(plan_id))
            .all(self.conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|p| Interval {
                id: p.id,
                period: Period::new(p.validity_start, p.validity_end),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryIntervals {
        rows: Mutex<HashMap<i64, Vec<Interval>>>,
        lookups: AtomicUsize,
    }

    impl MemoryIntervals {
        fn push(&self, owner_id: i64, id: i64, period: Period) {
            self.rows
                .lock()
                .unwrap()
                .entry(owner_id)
                .or_default()
                .push(Interval { id, period });
        }
    }

    #[async_trait]
    impl IntervalSource for MemoryIntervals {
        async fn intervals_for(&self, owner_id: i64) -> AppResult<Vec<Interval>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .rows
                .lock()
                .unwrap()
                .get(&owner_id)
                .cloned()
                .unwrap_or_default())
        }
    }

    fn day(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, n, 0, 0, 0).unwrap()
    }

    fn days(start: u32, end: u32) -> Period {
        Period::new(day(start), day(end))
    }

    #[test]
    fn test_touching_boundaries_do_not_overlap() {
        let existing = [Interval { id: 1, period: days(1, 5) }];
        assert!(!has_overlap(&existing, &days(5, 10), None));
    }

    #[test]
    fn test_partial_and_duplicate_intervals_overlap() {
        let existing = [Interval { id: 1, period: days(1, 5) }];
        assert_eq!(find_overlap(&existing, &days(4, 10), None), Some(1));
        assert_eq!(find_overlap(&existing, &days(1, 5), None), Some(1));
        assert_eq!(find_overlap(&existing, &days(2, 3), None), Some(1));
    }

    #[test]
    fn test_exclude_id_allows_update_in_place() {
        let existing = [Interval { id: 7, period: days(1, 5) }];
        assert!(!has_overlap(&existing, &days(1, 5), Some(7)));
        assert!(has_overlap(&existing, &days(1, 5), Some(8)));
    }

    #[test]
    fn test_scan_is_not_limited_to_neighbours() {
        let existing = [
            Interval { id: 3, period: days(20, 25) },
            Interval { id: 1, period: days(1, 3) },
            Interval { id: 2, period: days(10, 12) },
        ];
        assert_eq!(find_overlap(&existing, &days(11, 15), None), Some(2));
        assert_eq!(find_overlap(&existing, &days(3, 10), None), None);
    }

    #[tokio::test]
    async fn test_bad_ordering_rejected_without_lookup() {
        let source = MemoryIntervals::default();
        source.push(1, 1, days(1, 5));

        let same = validate_interval(&source, 1, days(3, 3), None).await.unwrap();
        assert!(matches!(same, IntervalCheck::InvalidInput(_)));
        let reversed = validate_interval(&source, 1, days(5, 3), None).await.unwrap();
        assert!(matches!(reversed, IntervalCheck::InvalidInput(_)));
        assert_eq!(source.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_intervals_are_scoped_to_owner() {
        let source = MemoryIntervals::default();
        source.push(1, 1, days(1, 5));
        let check = validate_interval(&source, 2, days(1, 5), None).await.unwrap();
        assert_eq!(check, IntervalCheck::Ok);
    }

    #[tokio::test]
    async fn test_membership_scenario() {
        let source = MemoryIntervals::default();
        let first = parse_period("2024-01-01", "2024-02-01").unwrap();
        assert_eq!(
            validate_interval(&source, 42, first, None).await.unwrap(),
            IntervalCheck::Ok
        );
        source.push(42, 1, first);

        let clash = parse_period("2024-01-15", "2024-02-15").unwrap();
        assert_eq!(
            validate_interval(&source, 42, clash, None).await.unwrap(),
            IntervalCheck::Conflict(1)
        );

        let next = parse_period("2024-02-01", "2024-03-01").unwrap();
        assert_eq!(
            validate_interval(&source, 42, next, None).await.unwrap(),
            IntervalCheck::Ok
        );
    }

    #[test]
    fn test_parse_instant() {
        assert_eq!(parse_instant("start", "2024-01-05").unwrap(), day(5));
        assert_eq!(
            parse_instant("start", "2024-01-05T00:00:00+00:00").unwrap(),
            day(5)
        );
        assert_eq!(
            parse_instant("start", "2024-01-05T05:30:00+05:30").unwrap(),
            day(5)
        );
        assert!(matches!(
            parse_instant("start", "05/01/2024"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_check_into_result() {
        assert!(IntervalCheck::Ok.into_result("membership").is_ok());
        match IntervalCheck::Conflict(3).into_result("membership") {
            Err(AppError::Conflict(msg)) => assert!(msg.contains('3')),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            IntervalCheck::InvalidInput("bad".into()).into_result("membership"),
            Err(AppError::ValidationError(_))
        ));
    }
}
