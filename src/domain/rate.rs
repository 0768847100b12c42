//! Request rates of the form `"<count>/<period>"`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Error returned when a rate string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateError {
    /// No `/` separator between count and period
    MissingSeparator(String),
    /// Count is not a non-negative integer
    InvalidCount(String),
    /// Period is empty or does not start with `s`, `m`, `h` or `d`
    InvalidPeriod(String),
}

impl fmt::Display for RateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateError::MissingSeparator(raw) => {
                write!(f, "rate {:?} must look like \"<count>/<period>\"", raw)
            }
            RateError::InvalidCount(raw) => {
                write!(f, "rate count {:?} is not a non-negative integer", raw)
            }
            RateError::InvalidPeriod(raw) => {
                write!(
                    f,
                    "rate period {:?} must be one of second, minute, hour, day",
                    raw
                )
            }
        }
    }
}

impl std::error::Error for RateError {}

/// A budget of requests per period.
///
/// Only the first character of the period is significant, so `"5/m"`,
/// `"5/min"` and `"5/minute"` are the same rate.
///
/// # Example
/// ```
/// use working_hours_throttle::Rate;
/// use std::time::Duration;
///
/// let rate: Rate = "10/minute".parse().unwrap();
/// assert_eq!(rate.num_requests(), 10);
/// assert_eq!(rate.period(), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    num_requests: u32,
    period: Duration,
}

impl Rate {
    /// Create a rate directly.
    pub fn new(num_requests: u32, period: Duration) -> Self {
        Self {
            num_requests,
            period,
        }
    }

    /// Requests allowed per period.
    pub fn num_requests(&self) -> u32 {
        self.num_requests
    }

    /// Length of the sliding window.
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FromStr for Rate {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (count, period) = s
            .split_once('/')
            .ok_or_else(|| RateError::MissingSeparator(s.to_string()))?;

        let count = count.trim();
        let num_requests = count
            .parse::<u32>()
            .map_err(|_| RateError::InvalidCount(count.to_string()))?;

        let period = period.trim();
        let secs = match period.chars().next() {
            Some('s') => 1,
            Some('m') => 60,
            Some('h') => 60 * 60,
            Some('d') => 24 * 60 * 60,
            _ => return Err(RateError::InvalidPeriod(period.to_string())),
        };

        Ok(Rate::new(num_requests, Duration::from_secs(secs)))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.period.as_secs() {
            1 => "second",
            60 => "minute",
            3600 => "hour",
            86400 => "day",
            secs => return write!(f, "{}/{}s", self.num_requests, secs),
        };
        write!(f, "{}/{}", self.num_requests, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(
            "3/second".parse::<Rate>().unwrap(),
            Rate::new(3, Duration::from_secs(1))
        );
        assert_eq!(
            "1/minute".parse::<Rate>().unwrap(),
            Rate::new(1, Duration::from_secs(60))
        );
        assert_eq!(
            "100/hour".parse::<Rate>().unwrap(),
            Rate::new(100, Duration::from_secs(3600))
        );
        assert_eq!(
            "1000/day".parse::<Rate>().unwrap(),
            Rate::new(1000, Duration::from_secs(86400))
        );
    }

    #[test]
    fn test_only_first_period_char_matters() {
        let a: Rate = "5/m".parse().unwrap();
        let b: Rate = "5/min".parse().unwrap();
        let c: Rate = "5/minute".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(
            " 2 / hour ".parse::<Rate>().unwrap(),
            Rate::new(2, Duration::from_secs(3600))
        );
    }

    #[test]
    fn test_zero_count_allowed() {
        assert_eq!("0/day".parse::<Rate>().unwrap().num_requests(), 0);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "10".parse::<Rate>(),
            Err(RateError::MissingSeparator("10".to_string()))
        );
        assert_eq!(
            "ten/minute".parse::<Rate>(),
            Err(RateError::InvalidCount("ten".to_string()))
        );
        assert_eq!(
            "-1/minute".parse::<Rate>(),
            Err(RateError::InvalidCount("-1".to_string()))
        );
        assert_eq!(
            "10/week".parse::<Rate>(),
            Err(RateError::InvalidPeriod("week".to_string()))
        );
        assert_eq!(
            "10/".parse::<Rate>(),
            Err(RateError::InvalidPeriod(String::new()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!("1/m".parse::<Rate>().unwrap().to_string(), "1/minute");
        assert_eq!(Rate::new(4, Duration::from_secs(90)).to_string(), "4/90s");
    }
}
