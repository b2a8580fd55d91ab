use serde::Deserialize;

/// Constants of the monthly revenue split.
///
/// `local_share` of each event's revenue goes to the site that produced it;
/// `capacity_share` of the post-cut revenue is spread over all sites by
/// battery capacity. Daily fees are billed for `billing_days` regardless of
/// the calendar length of the month.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllocationPolicy {
    /// Fraction of event revenue credited to the event's own site.
    pub local_share: f64,
    /// Fraction of post-cut revenue distributed by capacity.
    pub capacity_share: f64,
    /// Days of daily fee charged per site per report.
    pub billing_days: u32,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            local_share: 0.8,
            capacity_share: 0.2,
            billing_days: 28,
        }
    }
}

impl AllocationPolicy {
    /// Daily fees owed by one site over a billing period.
    pub fn fees_for(&self, daily_fee: f64) -> f64 {
        daily_fee * f64::from(self.billing_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_eighty_twenty_over_28_days() {
        let policy = AllocationPolicy::default();
        assert_eq!(policy.local_share, 0.8);
        assert_eq!(policy.capacity_share, 0.2);
        assert_eq!(policy.fees_for(2.5), 70.0);
    }
}
