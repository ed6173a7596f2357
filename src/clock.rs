//! Ambient wall clock shown in the header, ticking once a second on its own
//! thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

/// Weekday names, Sunday first.
pub const DEFAULT_WEEKDAYS: [&str; 7] = [
    "Minggu", "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu",
];

const TICK: Duration = Duration::from_secs(1);

/// `HH:MM:SS <Weekday> DD/MM/YYYY`.
pub fn format_clock<Tz: TimeZone>(now: &DateTime<Tz>, weekdays: &[String]) -> String {
    let day = now.weekday().num_days_from_sunday() as usize;
    let weekday = weekdays
        .get(day)
        .map(String::as_str)
        .unwrap_or(DEFAULT_WEEKDAYS[day]);
    format!(
        "{:02}:{:02}:{:02} {} {:02}/{:02}/{}",
        now.hour(),
        now.minute(),
        now.second(),
        weekday,
        now.day(),
        now.month(),
        now.year()
    )
}

/// Running clock thread. Dropping the handle does not stop it; call
/// `cancel`.
pub struct ClockHandle {
    text: Arc<Mutex<String>>,
    cancelled: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl ClockHandle {
    /// Latest rendered time.
    pub fn text(&self) -> String {
        self.text.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Stop ticking and wait for the thread to exit.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            join.thread().unpark();
            let _ = join.join();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Render the clock immediately, then once per second until cancelled.
pub fn spawn_clock(weekdays: Vec<String>) -> ClockHandle {
    let text = Arc::new(Mutex::new(format_clock(&Local::now(), &weekdays)));
    let cancelled = Arc::new(AtomicBool::new(false));

    let text_for_thread = text.clone();
    let cancelled_for_thread = cancelled.clone();
    let join = thread::spawn(move || {
        while !cancelled_for_thread.load(Ordering::Acquire) {
            thread::park_timeout(TICK);
            if cancelled_for_thread.load(Ordering::Acquire) {
                break;
            }
            if let Ok(mut t) = text_for_thread.lock() {
                *t = format_clock(&Local::now(), &weekdays);
            }
        }
    });

    ClockHandle {
        text,
        cancelled,
        join: Some(join),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn names() -> Vec<String> {
        DEFAULT_WEEKDAYS.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn formats_time_weekday_and_date_with_padding() {
        // 2024-03-05 was a Tuesday.
        let t = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_clock(&t, &names()), "07:08:09 Selasa 05/03/2024");
    }

    #[test]
    fn sunday_is_the_first_name() {
        // 2024-12-29 was a Sunday.
        let t = Utc.with_ymd_and_hms(2024, 12, 29, 23, 59, 59).unwrap();
        assert_eq!(format_clock(&t, &names()), "23:59:59 Minggu 29/12/2024");
    }

    #[test]
    fn uses_the_clock_of_the_given_zone() {
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        let t = wib.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_clock(&t, &names()), "00:00:00 Rabu 01/01/2025");
    }

    #[test]
    fn custom_table_and_short_table_fallback() {
        let t = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
        let english: Vec<String> = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(format_clock(&t, &english), "12:00:00 Fri 08/03/2024");
        assert_eq!(format_clock(&t, &[]), "12:00:00 Jumat 08/03/2024");
    }

    #[test]
    fn spawned_clock_renders_immediately_and_cancels() {
        let mut clock = spawn_clock(names());
        assert!(!clock.text().is_empty());
        clock.cancel();
        assert!(clock.is_cancelled());
    }
}
