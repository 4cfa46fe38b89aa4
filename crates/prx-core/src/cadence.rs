//! Re-armable periodic deadlines.
//!
//! A `Cadence` stands in for an interval timer: the host polls it with the
//! current time and it reports whether the period has elapsed. Firing
//! re-arms from the polling instant, so a host that stalls gets one late
//! fire rather than a burst of missed ones.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cadence {
    period: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl Cadence {
    /// A disarmed cadence with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.next_due
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Schedule the next fire one period after `now`.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now + self.period);
    }

    /// Cancel any scheduled fire.
    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    /// Return `true` if due at `now`, re-arming from `now` when it fires.
    pub fn fire(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.arm(now);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::Cadence;

    #[test]
    fn disarmed_cadence_never_fires() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut cadence = Cadence::new(Duration::seconds(5));
        assert!(!cadence.fire(t0 + Duration::hours(1)));
    }

    #[test]
    fn fires_once_per_period_and_rearms_from_poll_time() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut cadence = Cadence::new(Duration::seconds(5));
        cadence.arm(t0);

        assert!(!cadence.fire(t0 + Duration::seconds(4)));
        assert!(cadence.fire(t0 + Duration::seconds(5)));
        assert!(!cadence.fire(t0 + Duration::seconds(5)));

        // A long stall yields a single fire, then a full period from there.
        let late = t0 + Duration::seconds(60);
        assert!(cadence.fire(late));
        assert!(!cadence.fire(late + Duration::seconds(4)));
        assert_eq!(cadence.next_due(), Some(late + Duration::seconds(5)));
    }

    #[test]
    fn disarm_cancels_pending_fire() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut cadence = Cadence::new(Duration::seconds(1));
        cadence.arm(t0);
        cadence.disarm();
        assert!(!cadence.is_armed());
        assert!(!cadence.fire(t0 + Duration::seconds(2)));
    }
}
