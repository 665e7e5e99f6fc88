use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// A homework task as shown in the task tracker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: i64,
    pub subject: String,
    pub description: String,
    /// Raw due date as sent by the backend; parsed by [`parse_due`].
    pub due_date_time: String,
    /// Subject color, e.g. `#2196F3`.
    pub color_tag: String,
}

/// Tasks sharing one due month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    pub month_label: String,
    /// Month number; `None` for the bucket of tasks without a usable due date.
    pub month: Option<u32>,
    pub items: Vec<TaskRecord>,
}

impl MonthBucket {
    /// Id for a task added to this bucket: highest id plus one.
    pub fn next_item_id(&self) -> i64 {
        self.items
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }
}

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a backend due date.
///
/// Returns the date and, when present, the time of day. RFC 3339 values keep
/// the wall-clock time of their own offset.
pub fn parse_due(raw: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let local = dt.naive_local();
        return Some((local.date(), Some(local.time())));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some((dt.date(), Some(dt.time())));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| (date, None))
}

impl TaskRecord {
    /// Human-readable due date, e.g. `30 de marzo a las 11:55 AM`.
    pub fn due_display(&self, locale: Locale) -> Option<String> {
        let (date, time) = parse_due(&self.due_date_time)?;
        let month = locale.month_name(date.month())?;
        let time = time.map(|t| t.format("%-I:%M %p").to_string());
        let text = match locale {
            Locale::Es => {
                let base = format!("{} de {}", date.day(), month.to_lowercase());
                match time {
                    Some(t) => format!("{base} a las {t}"),
                    None => base,
                }
            }
            Locale::En => {
                let base = format!("{} {}", month, date.day());
                match time {
                    Some(t) => format!("{base} at {t}"),
                    None => base,
                }
            }
        };
        Some(text)
    }
}

/// Group tasks per due month using the default locale.
pub fn group_tasks_by_month(records: &[TaskRecord]) -> Vec<MonthBucket> {
    group_tasks_by_month_in(records, Locale::default())
}

/// Group tasks per due month, in first-seen month order.
///
/// Buckets are keyed by month name alone, so the same month of different
/// years shares one bucket. Tasks whose due date cannot be parsed share one
/// unspecified bucket.
pub fn group_tasks_by_month_in(records: &[TaskRecord], locale: Locale) -> Vec<MonthBucket> {
    let mut buckets: IndexMap<Option<u32>, MonthBucket> = IndexMap::new();

    for record in records {
        let key = parse_due(&record.due_date_time).map(|(date, _)| date.month());
        buckets
            .entry(key)
            .or_insert_with(|| {
                let month_label = key
                    .and_then(|month| locale.month_name(month))
                    .unwrap_or_else(|| locale.unspecified_label())
                    .to_string();
                MonthBucket {
                    month_label,
                    month: key,
                    items: Vec::new(),
                }
            })
            .items
            .push(record.clone());
    }

    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, due: &str) -> TaskRecord {
        TaskRecord {
            id,
            subject: "Matemáticas".to_string(),
            description: "Ejercicios 1 al 3".to_string(),
            due_date_time: due.to_string(),
            color_tag: "#2196F3".to_string(),
        }
    }

    #[test]
    fn buckets_follow_first_seen_month() {
        let tasks = vec![task(1, "2025-03-10"), task(2, "2025-04-01"), task(3, "2025-03-20")];
        let buckets = group_tasks_by_month(&tasks);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].month_label, "Marzo");
        assert_eq!(buckets[1].month_label, "Abril");
        let ids: Vec<i64> = buckets[0].items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn later_month_seen_first_stays_first() {
        let tasks = vec![task(1, "2025-05-02"), task(2, "2025-01-15")];
        let labels: Vec<String> = group_tasks_by_month(&tasks)
            .into_iter()
            .map(|b| b.month_label)
            .collect();
        assert_eq!(labels, vec!["Mayo", "Enero"]);
    }

    #[test]
    fn empty_input_gives_no_buckets() {
        assert!(group_tasks_by_month(&[]).is_empty());
    }

    #[test]
    fn unparseable_dates_share_unspecified_bucket() {
        let tasks = vec![task(1, ""), task(2, "2025-03-01"), task(3, "mañana")];
        let buckets = group_tasks_by_month(&tasks);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].month_label, "Sin fecha");
        assert_eq!(buckets[0].month, None);
        assert_eq!(buckets[0].items.len(), 2);
    }

    #[test]
    fn same_month_in_different_years_shares_one_bucket() {
        let tasks = vec![task(1, "2024-03-01"), task(2, "2025-04-02"), task(3, "2025-03-05")];
        let buckets = group_tasks_by_month(&tasks);
        let labels: Vec<&str> = buckets.iter().map(|b| b.month_label.as_str()).collect();
        assert_eq!(labels, vec!["Marzo", "Abril"]);
        assert_eq!(buckets[0].month, Some(3));
        let ids: Vec<i64> = buckets[0].items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn english_labels() {
        let buckets = group_tasks_by_month_in(&[task(1, "2025-03-10T08:00:00Z")], Locale::En);
        assert_eq!(buckets[0].month_label, "March");
    }

    #[test]
    fn parses_supported_formats() {
        assert!(parse_due("2025-03-30").unwrap().1.is_none());
        assert!(parse_due("2025-03-30T11:55").unwrap().1.is_some());
        assert!(parse_due("2025-03-30 11:55:00").unwrap().1.is_some());
        assert!(parse_due("2025-03-30T11:55:00.000Z").is_some());
        assert!(parse_due("2025-03-30T11:55:00-03:00").is_some());
        assert!(parse_due("30/03/2025").is_none());
    }

    #[test]
    fn rfc3339_keeps_its_own_wall_clock() {
        let (date, time) = parse_due("2025-03-31T23:30:00-03:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(23, 30, 0));
    }

    #[test]
    fn due_display_spanish_and_english() {
        let t = task(1, "2025-03-30T11:55:00");
        assert_eq!(t.due_display(Locale::Es).unwrap(), "30 de marzo a las 11:55 AM");
        assert_eq!(t.due_display(Locale::En).unwrap(), "March 30 at 11:55 AM");
        assert_eq!(task(2, "2025-04-02").due_display(Locale::Es).unwrap(), "2 de abril");
        assert!(task(3, "").due_display(Locale::Es).is_none());
    }

    #[test]
    fn next_item_id_is_max_plus_one() {
        let bucket = &group_tasks_by_month(&[task(101, "2025-03-10"), task(103, "2025-03-11")])[0];
        assert_eq!(bucket.next_item_id(), 104);
        let empty = MonthBucket {
            month_label: "Abril".to_string(),
            month: Some(4),
            items: Vec::new(),
        };
        assert_eq!(empty.next_item_id(), 1);
    }

    #[test]
    fn next_item_id_saturates_at_max_id() {
        let bucket = &group_tasks_by_month(&[task(i64::MAX, "2025-03-10")])[0];
        assert_eq!(bucket.next_item_id(), i64::MAX);
    }
}
