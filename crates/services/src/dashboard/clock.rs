use chrono::{DateTime, Duration, NaiveTime, Utc};

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;

    /// Midnight UTC of the current day.
    fn start_of_today(&self) -> DateTime<Utc> {
        self.now()
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Half-open `[from, until)` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl TimeWindow {
    /// Today 00:00 UTC through the start of the day `days` later.
    pub fn upcoming_days(clock: &dyn Clock, days: u32) -> Self {
        let from = clock.start_of_today();
        Self {
            from,
            until: from + Duration::days(days as i64),
        }
    }

    /// The `days` before now, inclusive of now.
    pub fn trailing_days(clock: &dyn Clock, days: u32) -> Self {
        let until = clock.now();
        Self {
            from: until - Duration::days(days as i64),
            until: until + Duration::milliseconds(1),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.from && instant < self.until
    }

    pub fn bson_bounds(&self) -> (bson::DateTime, bson::DateTime) {
        (
            bson::DateTime::from_chrono(self.from),
            bson::DateTime::from_chrono(self.until),
        )
    }
}
