use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get the current date-time in the timezone given by `canonical_timezone`,
/// e.g. "Pacific/Auckland".
pub fn now_local(canonical_timezone: &str) -> Result<OffsetDateTime, Error> {
    get_local_offset(canonical_timezone)
        .map(|offset| OffsetDateTime::now_utc().to_offset(offset))
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))
}
