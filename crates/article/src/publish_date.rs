use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Parses the publish-date formats commonly found in article metadata.
///
/// Offsets are dropped rather than converted: the result is the wall clock
/// the page itself reported.
pub fn parse_publish_date(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let with_offset = OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc2822))
        .or_else(|_| {
            OffsetDateTime::parse(
                raw,
                format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
                ),
            )
        });
    if let Ok(dt) = with_offset {
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }

    if let Ok(dt) = PrimitiveDateTime::parse(
        raw,
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
        ),
    ) {
        return Some(dt);
    }
    if let Ok(dt) = PrimitiveDateTime::parse(
        raw,
        format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
        ),
    ) {
        return Some(dt);
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(Date::midnight)
}

/// `YYYY-MM-DD HH:MM:SS`
pub fn format_publish_date(dt: PrimitiveDateTime) -> Option<String> {
    dt.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .ok()
}

pub fn normalize_publish_date(raw: &str) -> Option<String> {
    parse_publish_date(raw).and_then(format_publish_date)
}
