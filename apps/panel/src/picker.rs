//! Date input of the appointment form.

use chrono::NaiveDate;

use crate::models::WorkingDays;

/// Who moved the date. Only user changes invalidate the downstream selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateChange {
    User,
    Programmatic,
}

#[derive(Debug, Clone, Default)]
pub struct DatePicker {
    working_days: WorkingDays,
    date: Option<NaiveDate>,
}

impl DatePicker {
    pub fn new(working_days: WorkingDays) -> Self {
        Self {
            working_days,
            date: None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Whether the picker lets `date` be chosen.
    pub fn is_enabled(&self, date: NaiveDate) -> bool {
        self.working_days.allows(date)
    }

    /// Same predicate for a widget numbering weekdays Sunday = 0.
    pub fn is_enabled_picker_day(&self, picker_day: u32) -> bool {
        self.working_days.accepts_picker_day(picker_day)
    }

    /// Set the date if it falls on a working day. A disabled date leaves
    /// the picker as it was.
    pub fn set_date(&mut self, date: NaiveDate) -> bool {
        if !self.is_enabled(date) {
            return false;
        }
        self.date = Some(date);
        true
    }

    pub fn clear(&mut self) {
        self.date = None;
    }

    /// Value the form posts, `YYYY-MM-DD`.
    pub fn value(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }
}
