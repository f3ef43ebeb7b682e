#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    pool: web::Data<DbPool>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](pool, info).await {
                        Ok(response) => response,
                        Err(err) => {
                            tracing::warn!(op = stringify!($func_name), "{:#}", err);
                            <$response>::err(err.to_string())
                        }
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

use anyhow::{bail, Context};
use blake2::{Blake2b, Digest};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

pub fn parse_time_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDateTime> {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
    const TIME_FMT_SPECIAL: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
    const TIME_FMT_NAIVE: &str = "%Y-%m-%dT%H:%M:%S";

    let s = s.as_ref();
    if let Some('Z') = s.chars().last() {
        NaiveDateTime::parse_from_str(s, TIME_FMT_SPECIAL).context("Unknown time format")
    } else if let Ok(t) = DateTime::parse_from_str(s, TIME_FMT) {
        Ok(t.naive_utc())
    } else {
        NaiveDateTime::parse_from_str(s, TIME_FMT_NAIVE).context("Unknown time format")
    }
}

pub fn parse_time_pair_str<S1: AsRef<str>, S2: AsRef<str>>(
    start_time: S1,
    end_time: S2,
) -> anyhow::Result<(NaiveDateTime, NaiveDateTime)> {
    let start_time = parse_time_str(start_time).context("Wrong format on 'start_time'")?;
    let end_time = parse_time_str(end_time).context("Wrong format on 'end_time'")?;
    if start_time >= end_time {
        bail!("Invalid time interval");
    }
    Ok((start_time, end_time))
}

pub fn parse_time_pair_str_opt<S1: AsRef<str>, S2: AsRef<str>>(
    start_time: Option<S1>,
    end_time: Option<S2>,
) -> anyhow::Result<(NaiveDateTime, NaiveDateTime)> {
    let time_min = parse_time_str("1901-01-01T00:00:00.0000Z")?;
    let time_max = parse_time_str("2901-01-01T00:00:00.0000Z")?;
    let start_time = start_time.map_or(Ok(time_min), |t| {
        parse_time_str(t).context("Wrong format on 'start_time'")
    })?;
    let end_time = end_time.map_or(Ok(time_max), |t| {
        parse_time_str(t).context("Wrong format on 'end_time'")
    })?;
    Ok((start_time, end_time))
}

pub fn parse_date_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.as_ref(), "%Y-%m-%d").context("Wrong date format")
}

pub fn parse_clock_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveTime> {
    let s = s.as_ref();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .context("Wrong time of day format")
}

pub fn format_time_str(time: &NaiveDateTime) -> String {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    format!("{}+00:00", time.format(TIME_FMT))
}

/// Builds a fresh meeting url under `prefix`.
///
/// The token hashes a random v4 uuid, so knowing the appointment id and
/// the booking time does not narrow it down.
pub fn generate_link_url(prefix: &str, appointment_id: u64) -> String {
    const TOKEN_LEN: usize = 32;

    let mut hasher = Blake2b::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(appointment_id.to_be_bytes());
    let mut token = format!("{:x}", hasher.finalize());
    token.truncate(TOKEN_LEN);
    format!("{}/{}", prefix.trim_end_matches('/'), token)
}

/// Everything before the token of a url made by [`generate_link_url`].
pub fn link_prefix_of(url: &str) -> Option<&str> {
    url.rsplitn(2, '/').nth(1).filter(|prefix| !prefix.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_zulu_and_naive_times() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_time_str("2024-03-01T09:30:00.000Z").unwrap(), expected);
        assert_eq!(parse_time_str("2024-03-01T11:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_time_str("2024-03-01T09:30:00").unwrap(), expected);
        assert!(parse_time_str("01/03/2024 09:30").is_err());
    }

    #[test]
    fn time_pair_must_be_ordered() {
        assert!(parse_time_pair_str("2024-03-01T10:00:00", "2024-03-01T09:00:00").is_err());
        assert!(parse_time_pair_str("2024-03-01T10:00:00", "2024-03-01T10:00:00").is_err());
        assert!(parse_time_pair_str("2024-03-01T09:00:00", "2024-03-01T10:00:00").is_ok());
    }

    #[test]
    fn clock_accepts_minutes_precision() {
        assert_eq!(
            parse_clock_str("14:05").unwrap(),
            NaiveTime::from_hms_opt(14, 5, 0).unwrap()
        );
        assert!(parse_clock_str("2pm").is_err());
    }

    #[test]
    fn link_urls_are_unique_and_keep_prefix() {
        let a = generate_link_url("https://meet.example.org/room/", 7);
        let b = generate_link_url("https://meet.example.org/room", 7);
        assert_ne!(a, b);
        assert!(a.starts_with("https://meet.example.org/room/"));
        assert_eq!(link_prefix_of(&a), Some("https://meet.example.org/room"));
        assert_eq!(a.len(), "https://meet.example.org/room/".len() + 32);
    }

    #[test]
    fn link_tokens_do_not_repeat_for_one_appointment() {
        let tokens: std::collections::HashSet<String> = (0..500)
            .map(|_| generate_link_url("https://meet.example.org/room", 42))
            .map(|url| url.rsplit('/').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(tokens.len(), 500);
        assert!(tokens
            .iter()
            .all(|t| t.len() == 32 && t.chars().all(|c| c.is_ascii_hexdigit())));
    }

    #[test]
    fn prefix_of_bare_token_is_none() {
        assert_eq!(link_prefix_of("token"), None);
        assert_eq!(link_prefix_of("/token"), None);
    }
}
