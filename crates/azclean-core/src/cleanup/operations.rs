use chrono::{DateTime, Utc};

use crate::cleanup::exemptions::ExemptionList;
use crate::provider::Resource;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days elapsed between `created` and `now`, rounded down.
///
/// Negative when `created` lies in the future.
pub fn age_in_days(created: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Stable sort, newest first. Resources without a creation time go last.
pub fn sort_newest_first(resources: &mut [Resource]) {
    resources.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Policy decision for one resource, before any deletion is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Keep { age_days: Option<i64> },
    Exempt { age_days: i64, prefix: String },
    Delete { age_days: i64 },
}

/// Apply the age check first, then the exemption list.
pub fn classify_resource(
    resource: &Resource,
    now: DateTime<Utc>,
    ttl_days: u32,
    exemptions: &ExemptionList,
) -> Disposition {
    let Some(created_at) = resource.created_at else {
        return Disposition::Keep { age_days: None };
    };

    let age_days = age_in_days(created_at, now);
    if age_days <= i64::from(ttl_days) {
        return Disposition::Keep {
            age_days: Some(age_days),
        };
    }

    match exemptions.matching_prefix(&resource.id) {
        Some(prefix) => Disposition::Exempt {
            age_days,
            prefix: prefix.to_string(),
        },
        None => Disposition::Delete { age_days },
    }
}
