//! The hash ProtonDB names its per-game report files with.
//!
//! `https://www.protondb.com/data/reports/all-devices/app/{hash}.json` serves
//! the reports of a game, where the hash is derived from the app id, its
//! report count and the timestamp of the current data dump.

/// `None` if `timestamp` is zero.
pub fn report_hash(app_id: u64, reports: u64, timestamp: u64) -> Option<u32> {
    let (app_id, reports, timestamp) = (app_id as u128, reports as u128, timestamp as u128);
    let scaled = app_id * reports.checked_rem(timestamp)?;
    let key = if app_id % 2 == 1 {
        format!("{reports}){scaled}")
    } else {
        format!("{scaled}?{}", app_id * timestamp)
    };
    Some(numberify(&key))
}

/// Java-style string hash of `s + "/"`, without sign.
pub fn numberify(s: &str) -> u32 {
    s.chars()
        .chain(['/'])
        .fold(0i32, |hash, c| hash.wrapping_mul(31).wrapping_add(c as i32))
        .unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::{numberify, report_hash};

    #[test]
    fn known_hashes() {
        assert_eq!(report_hash(620, 1234, 1605000000), Some(1402861882));
        assert_eq!(report_hash(1091500, 5000, 1609459200), Some(577465898));
        assert_eq!(report_hash(730, 37, 1600000000), Some(1978240202));
        assert_eq!(report_hash(1, 0, 1), Some(1470904));
    }

    #[test]
    fn zero_timestamp_has_no_hash() {
        assert_eq!(report_hash(620, 1234, 0), None);
    }

    #[test]
    fn numberify_matches_string_hash() {
        assert_eq!(numberify("abc"), 2987021);
        assert_eq!(numberify(""), '/' as u32);
    }
}
