use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Event, EventFormat, EventType, TicketType};

/// Inclusive bounds on an event's start instant. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| instant >= start)
            && self.end.map_or(true, |end| instant <= end)
    }
}

/// A browse selection. Unset criteria let every event through; set criteria
/// are combined with AND, and the tag list matches when any one tag does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub event_type: Option<EventType>,
    pub format: Option<EventFormat>,
    pub ticket_type: Option<TicketType>,
    pub tags: Vec<String>,
    pub date_range: DateRange,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }

    pub fn matches(&self, event: &Event) -> bool {
        let details = &event.details;

        self.event_type.map_or(true, |t| details.event_type == t)
            && self.format.map_or(true, |f| event.format() == f)
            && self.ticket_type.map_or(true, |t| details.ticket.ticket_type() == t)
            && (self.tags.is_empty() || self.tags.iter().any(|tag| details.tags.contains(tag)))
            && self.date_range.contains(details.start_date_time)
    }
}

/// Keeps the events matching `criteria`, preserving their order.
pub fn filter_events(events: Vec<Event>, criteria: &FilterCriteria) -> Vec<Event> {
    if criteria.is_empty() {
        return events;
    }
    events.into_iter().filter(|e| criteria.matches(e)).collect()
}

/// Every tag used by `events`, once each, in first-seen order.
pub fn collect_tags(events: &[Event]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in events.iter().flat_map(|e| &e.details.tags) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field} filter: {value}")]
pub struct FilterError {
    pub field: &'static str,
    pub value: String,
}

/// Browse criteria as they arrive in a query string. Tags are comma separated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub format: Option<String>,
    pub ticket_type: Option<String>,
    pub tags: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TryFrom<FilterQuery> for FilterCriteria {
    type Error = FilterError;

    fn try_from(query: FilterQuery) -> Result<Self, Self::Error> {
        Ok(FilterCriteria {
            event_type: parse_param("type", query.event_type.as_deref(), |v| {
                v.parse::<EventType>().ok()
            })?,
            format: parse_param("format", query.format.as_deref(), |v| {
                v.parse::<EventFormat>().ok()
            })?,
            ticket_type: parse_param("ticketType", query.ticket_type.as_deref(), |v| {
                v.parse::<TicketType>().ok()
            })?,
            tags: query
                .tags
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            date_range: DateRange {
                start: parse_param("start", query.start.as_deref(), parse_boundary)?,
                end: parse_param("end", query.end.as_deref(), parse_boundary)?,
            },
        })
    }
}

fn parse_param<T>(
    field: &'static str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, FilterError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse(value).map(Some).ok_or_else(|| FilterError {
            field,
            value: value.to_string(),
        }),
    }
}

/// RFC 3339 instant, or a bare date meaning midnight UTC.
fn parse_boundary(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        })
}
