//! # Schedule Module
//!
//! The weekly lesson schedule shown next to the game on the student dashboard.
//!
//! The document is served per ISO week at `/proxy-schedule/{year}/{week}`,
//! where `year` is the calendar year of the day asked about.
//! This module only models it: the request for a given date, the JSON payload
//! and the three ways a fetch can end (loaded, empty or failed with a retry).

use crate::{StarMazeError, StarMazeResult};
use chrono::{Datelike, Local, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Status value marking a cancelled lesson.
pub const CANCELLED_STATUS: &str = "cancelled";

/// Which week to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Calendar year of the requested date
    pub year: i32,
    /// ISO week, 1..=53
    pub week: u32,
}

impl ScheduleRequest {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// The request for the ISO week containing the given calendar date.
    ///
    /// The path carries the calendar year of the date, not the ISO
    /// week-numbering year, so around New Year the two can disagree.
    ///
    /// # Examples
    ///
    /// ```
    /// use starmaze::ScheduleRequest;
    ///
    /// // 2021-01-01 is a Friday and belongs to ISO week 53
    /// let request = ScheduleRequest::for_date(2021, 1, 1).unwrap();
    /// assert_eq!(request, ScheduleRequest::new(2021, 53));
    /// assert_eq!(request.path(), "/proxy-schedule/2021/53");
    /// ```
    pub fn for_date(year: i32, month: u32, day: u32) -> StarMazeResult<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            StarMazeError::Schedule(format!(
                "invalid date {:04}-{:02}-{:02}",
                year, month, day
            ))
        })?;
        Ok(Self::from_date(date))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.iso_week().week())
    }

    /// The request for the current local date.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Path of the schedule document on the site.
    pub fn path(&self) -> String {
        format!("/proxy-schedule/{}/{}", self.year, self.week)
    }
}

/// Day of month as sent by the server; some feeds send it as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayNumber {
    Number(u32),
    Text(String),
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayNumber::Number(n) => write!(f, "{}", n),
            DayNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub time: String,
    pub subject: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl Lesson {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some(CANCELLED_STATUS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub day_name: String,
    pub day_number: DayNumber,
    #[serde(default)]
    pub is_today: bool,
    #[serde(default)]
    pub full_date: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekInfo {
    pub title: String,
}

/// The schedule document for one week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSchedule {
    #[serde(default)]
    pub week_data: Option<Vec<ScheduleDay>>,
    #[serde(default)]
    pub week_info: Option<WeekInfo>,
}

impl WeekSchedule {
    pub fn from_json(body: &str) -> StarMazeResult<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// What the schedule panel shows after a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleView {
    Loaded(WeekSchedule),
    /// The server answered but had no days for this week
    Empty,
    /// The fetch failed; the same request can be retried
    Failed {
        reason: String,
        retry: ScheduleRequest,
    },
}

impl ScheduleView {
    /// Interprets an HTTP response for `request`.
    pub fn from_response(request: ScheduleRequest, status: u16, body: &str) -> Self {
        if !(200..300).contains(&status) {
            warn!("Schedule {} answered with status {}", request.path(), status);
            return ScheduleView::Failed {
                reason: format!("HTTP error! status: {}", status),
                retry: request,
            };
        }

        match WeekSchedule::from_json(body) {
            Ok(schedule) if schedule.week_data.is_none() => {
                debug!("Schedule {} has no week data", request.path());
                ScheduleView::Empty
            }
            Ok(schedule) => ScheduleView::Loaded(schedule),
            Err(e) => {
                warn!("Schedule {} could not be parsed: {}", request.path(), e);
                ScheduleView::Failed {
                    reason: e.to_string(),
                    retry: request,
                }
            }
        }
    }

    /// Reads a saved schedule document from disk.
    pub fn from_file(request: ScheduleRequest, path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(body) => Self::from_response(request, 200, &body),
            Err(e) => {
                warn!("Could not read schedule {}: {}", path.as_ref().display(), e);
                ScheduleView::Failed {
                    reason: e.to_string(),
                    retry: request,
                }
            }
        }
    }

    /// Plain-text listing of the week.
    pub fn render_lines(&self) -> Vec<String> {
        let schedule = match self {
            ScheduleView::Empty => return vec!["No schedule data to display".to_string()],
            ScheduleView::Failed { .. } => {
                return vec![
                    "Could not load the schedule".to_string(),
                    "Press R to try again".to_string(),
                ]
            }
            ScheduleView::Loaded(schedule) => schedule,
        };

        let mut lines = Vec::new();
        if let Some(info) = &schedule.week_info {
            lines.push(info.title.clone());
        }

        for day in schedule.week_data.iter().flatten() {
            let today = if day.is_today { "  [today]" } else { "" };
            lines.push(format!("{} {}{}", day.day_name, day.day_number, today));

            if day.lessons.is_empty() {
                lines.push("  no lessons".to_string());
            }
            for lesson in &day.lessons {
                let status = if lesson.is_cancelled() { " (cancelled)" } else { "" };
                lines.push(format!("  {} {}{}", lesson.time, lesson.subject, status));
            }
        }
        lines
    }
}

/// A schedule document kept on disk, reloadable after a failure.
#[derive(Debug, Clone)]
pub struct ScheduleSource {
    path: PathBuf,
    pub view: ScheduleView,
}

impl ScheduleSource {
    pub fn load(path: impl Into<PathBuf>, request: ScheduleRequest) -> Self {
        let path = path.into();
        let view = ScheduleView::from_file(request, &path);
        Self { path, view }
    }

    /// Reloads the document if the last load failed. Returns whether a
    /// retry happened.
    pub fn retry(&mut self) -> bool {
        match &self.view {
            ScheduleView::Failed { retry, .. } => {
                self.view = ScheduleView::from_file(*retry, &self.path);
                true
            }
            _ => false,
        }
    }
}
