//! Live "current time" marker for the time grid.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};

use crate::services::layout::TimeMapper;

const MAX_TICK_SECONDS: u64 = 24 * 60 * 60;

/// Source of "now", injected so callers never read the system clock directly.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NowIndicator {
    pub visible: bool,
    pub day_index: Option<usize>,
    pub pixel_offset: f32,
}

/// Position of `now` in the grid showing `dates`.
///
/// Hidden when today is not displayed or the current hour is outside the
/// visible range.
pub fn current_time_indicator(now: NaiveDateTime, dates: &[NaiveDate], mapper: &TimeMapper) -> NowIndicator {
    let Some(day_index) = dates.iter().position(|date| *date == now.date()) else {
        return NowIndicator::default();
    };

    if !mapper.range().contains_hour(now.hour()) {
        return NowIndicator {
            visible: false,
            day_index: Some(day_index),
            pixel_offset: 0.0,
        };
    }

    NowIndicator {
        visible: true,
        day_index: Some(day_index),
        pixel_offset: mapper.time_to_pixel(now.hour() as i32, now.minute() as i32),
    }
}

/// Recurring trigger for re-deriving the indicator.
///
/// Polled from the render loop; a cancelled ticker never fires again.
#[derive(Debug, Clone)]
pub struct NowTicker {
    interval: Duration,
    next_due: Option<NaiveDateTime>,
    cancelled: bool,
}

impl NowTicker {
    pub fn new(interval_seconds: u64) -> Self {
        let seconds = interval_seconds.clamp(1, MAX_TICK_SECONDS) as i64;
        Self {
            interval: Duration::seconds(seconds),
            next_due: None,
            cancelled: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Returns true when the indicator should be recomputed. The first poll
    /// always fires.
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        if self.cancelled {
            return false;
        }

        match self.next_due {
            Some(due) if now < due => false,
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Time left until the next tick, for scheduling a repaint.
    pub fn time_until_next(&self, now: NaiveDateTime) -> Option<std::time::Duration> {
        if self.cancelled {
            return None;
        }
        let remaining = self.next_due.map_or(Duration::zero(), |due| due - now);
        Some(remaining.to_std().unwrap_or(std::time::Duration::ZERO))
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.next_due = None;
    }
}

/// Indicator plus its refresh timer, owned by one grid view.
#[derive(Debug, Clone)]
pub struct LiveIndicator {
    ticker: NowTicker,
    current: NowIndicator,
}

impl LiveIndicator {
    pub fn new(interval_seconds: u64) -> Self {
        Self {
            ticker: NowTicker::new(interval_seconds),
            current: NowIndicator::default(),
        }
    }

    /// Recompute when the ticker is due, otherwise return the last value.
    ///
    /// `force` recomputes immediately (the displayed dates or the mapper changed).
    pub fn refresh(
        &mut self,
        clock: &dyn Clock,
        dates: &[NaiveDate],
        mapper: &TimeMapper,
        force: bool,
    ) -> NowIndicator {
        let now = clock.now();
        if self.ticker.poll(now) || force {
            self.current = current_time_indicator(now, dates, mapper);
        }
        self.current
    }

    pub fn ticker(&self) -> &NowTicker {
        &self.ticker
    }

    pub fn cancel(&mut self) {
        self.ticker.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::VisibleHours;

    fn mapper() -> TimeMapper {
        TimeMapper::new(VisibleHours::new(8, 17).unwrap(), 60.0)
    }

    fn week() -> Vec<NaiveDate> {
        (3..=9)
            .map(|day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap())
            .collect()
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_indicator_inside_range() {
        let indicator = current_time_indicator(at(5, 10, 15), &week(), &mapper());
        assert!(indicator.visible);
        assert_eq!(indicator.day_index, Some(2));
        assert_eq!(indicator.pixel_offset, 135.0);
    }

    #[test]
    fn test_indicator_hidden_outside_hours() {
        let early = current_time_indicator(at(5, 7, 59), &week(), &mapper());
        assert!(!early.visible);
        assert_eq!(early.day_index, Some(2));

        let last_row = current_time_indicator(at(5, 17, 30), &week(), &mapper());
        assert!(last_row.visible);

        let late = current_time_indicator(at(5, 18, 0), &week(), &mapper());
        assert!(!late.visible);
    }

    #[test]
    fn test_indicator_hidden_when_today_not_displayed() {
        let indicator = current_time_indicator(at(12, 10, 0), &week(), &mapper());
        assert_eq!(indicator, NowIndicator::default());
    }

    #[test]
    fn test_ticker_fires_once_per_interval() {
        let mut ticker = NowTicker::new(60);
        assert!(ticker.poll(at(5, 10, 0)));
        assert!(!ticker.poll(at(5, 10, 0) + Duration::seconds(59)));
        assert!(ticker.poll(at(5, 10, 1)));
        assert_eq!(
            ticker.time_until_next(at(5, 10, 1) + Duration::seconds(20)),
            Some(std::time::Duration::from_secs(40))
        );
    }

    #[test]
    fn test_cancelled_ticker_never_fires() {
        let mut ticker = NowTicker::new(60);
        ticker.cancel();
        assert!(!ticker.poll(at(5, 10, 0)));
        assert!(ticker.is_cancelled());
        assert_eq!(ticker.time_until_next(at(5, 10, 0)), None);
    }

    #[test]
    fn test_live_indicator_moves_with_clock() {
        let mut clock = MockClock::new();
        let mut times = vec![at(5, 10, 0), at(5, 10, 0) + Duration::seconds(30), at(5, 10, 1)].into_iter();
        clock.expect_now().times(3).returning(move || times.next().unwrap());

        let mut live = LiveIndicator::new(60);
        let mapper = mapper();
        let dates = week();

        assert_eq!(live.refresh(&clock, &dates, &mapper, false).pixel_offset, 120.0);
        // not due yet: keeps the previous value
        assert_eq!(live.refresh(&clock, &dates, &mapper, false).pixel_offset, 120.0);
        assert_eq!(live.refresh(&clock, &dates, &mapper, false).pixel_offset, 121.0);
    }

    #[test]
    fn test_forced_refresh_ignores_ticker() {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(at(5, 9, 0));

        let mut live = LiveIndicator::new(60);
        let mapper = mapper();
        live.refresh(&clock, &week(), &mapper, false);

        let other_week: Vec<NaiveDate> = week().iter().map(|d| *d + Duration::days(7)).collect();
        let indicator = live.refresh(&clock, &other_week, &mapper, true);
        assert!(!indicator.visible);
        assert_eq!(indicator.day_index, None);
    }
}
