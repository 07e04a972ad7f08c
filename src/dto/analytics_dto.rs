use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::analytics::scope::ReportFilters;
use crate::error::{Error, Result};

/// Query-string filters accepted by every analytics endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub department_id: Option<String>,
    pub location_id: Option<String>,
    pub job_id: Option<Uuid>,
    pub recruiter_id: Option<Uuid>,
}

impl AnalyticsQuery {
    /// Dates arrive either as RFC 3339 timestamps or bare `YYYY-MM-DD` days.
    /// A bare start day snaps to midnight, a bare end day to the end of that
    /// day, so a same-day window still covers the whole day.
    pub fn into_filters(self) -> Result<ReportFilters> {
        let start_date = self
            .start_date
            .as_deref()
            .map(|raw| parse_window_bound(raw, false))
            .transpose()?;
        let end_date = self
            .end_date
            .as_deref()
            .map(|raw| parse_window_bound(raw, true))
            .transpose()?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(Error::BadRequest(
                    "endDate must not precede startDate".to_string(),
                ));
            }
        }
        Ok(ReportFilters {
            start_date,
            end_date,
            department_id: self.department_id,
            location_id: self.location_id,
            job_id: self.job_id,
            recruiter_id: self.recruiter_id,
        })
    }
}

fn parse_window_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| Error::BadRequest(format!("Invalid date filter: {}", raw)))?;
    let time = if end_of_day {
        day.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        day.and_hms_opt(0, 0, 0)
    };
    time.map(|naive| naive.and_utc())
        .ok_or_else(|| Error::BadRequest(format!("Invalid date filter: {}", raw)))
}
