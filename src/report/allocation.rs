//! Monthly revenue allocation between a VPP operator and its sites.

use std::collections::HashMap;

use tracing::warn;

use super::policy::AllocationPolicy;
use super::types::{MonthlyReport, SiteRevenue};
use crate::events::{EventStore, YearMonth};
use crate::registry::{Registry, Vpp};

/// Splits one month of event revenue between `vpp` and every registered site.
///
/// The operator keeps `revenue_percentage` of gross revenue plus every site's
/// daily fees. Each site is credited `local_share` of its own events' revenue
/// and a capacity-weighted slice of `capacity_share` of the post-cut revenue.
///
/// Events whose NMI is not registered count toward the gross and the
/// operator's cut but credit no site. When the registry's total capacity is
/// exactly zero the capacity slice is zero for every site.
pub fn allocate(
    vpp: &Vpp,
    month: YearMonth,
    registry: &Registry,
    events: &EventStore,
    policy: &AllocationPolicy,
) -> MonthlyReport {
    let mut total_revenue = 0.0;
    let mut local: HashMap<&str, f64> = HashMap::new();
    let mut orphaned = 0_usize;
    let mut orphaned_revenue = 0.0;

    for event in events.in_month(month) {
        let revenue = event.revenue();
        total_revenue += revenue;
        if registry.site(&event.nmi).is_some() {
            *local.entry(event.nmi.as_str()).or_default() += revenue * policy.local_share;
        } else {
            orphaned += 1;
            orphaned_revenue += revenue;
        }
    }

    if orphaned > 0 {
        warn!(
            vpp = %vpp.name,
            month = %month,
            events = orphaned,
            revenue = orphaned_revenue,
            "events for unregistered sites credit no site"
        );
    }

    let vpp_cut = total_revenue * (vpp.revenue_percentage / 100.0);
    let remaining_revenue = total_revenue - vpp_cut;

    let total_capacity = registry.total_capacity();
    if total_capacity == 0.0 && remaining_revenue != 0.0 {
        warn!(
            vpp = %vpp.name,
            month = %month,
            "no registered capacity, skipping capacity-weighted distribution"
        );
    }

    let daily_fees = policy.fees_for(vpp.daily_fee);
    let mut vpp_revenue = vpp_cut;
    let mut site_revenues = Vec::new();

    for site in registry.sites() {
        let mut revenue = local.get(site.nmi.as_str()).copied().unwrap_or(0.0);
        if total_capacity != 0.0 {
            let weight = site.capacity() / total_capacity;
            revenue += remaining_revenue * policy.capacity_share * weight;
        }
        vpp_revenue += daily_fees;
        site_revenues.push(SiteRevenue {
            nmi: site.nmi.clone(),
            revenue,
            daily_fees,
        });
    }

    MonthlyReport {
        vpp_name: vpp.name.clone(),
        year_month: month,
        total_revenue,
        vpp_revenue,
        site_revenues,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::events::Event;

    fn march() -> YearMonth {
        YearMonth { year: 2024, month: 3 }
    }

    fn registry(capacities: &[(&str, f64)]) -> Registry {
        let mut registry = Registry::new();
        for (i, &(nmi, capacity)) in capacities.iter().enumerate() {
            registry.create_site("TestVPP", nmi, "1 Test St");
            if capacity != 0.0 {
                registry
                    .create_battery(nmi, "TestMfg", &format!("SN{i}"), &capacity.to_string())
                    .ok();
            }
        }
        registry
    }

    fn events(rows: &[(&str, &str, f64, f64)]) -> EventStore {
        let mut store = EventStore::new();
        for &(nmi, date, energy, tariff) in rows {
            if let Ok(event) = Event::parse(nmi, date, &energy.to_string(), &tariff.to_string()) {
                store.push(event);
            }
        }
        store
    }

    fn vpp() -> Vpp {
        Vpp::new("TestVPP", 10.0, 2.5)
    }

    #[test]
    fn splits_local_and_capacity_shares() {
        let registry = registry(&[("a", 10.0), ("b", 15.0)]);
        let events = events(&[("a", "2024-03-01", 10.0, 1.0), ("b", "2024-03-02", 20.0, 1.0)]);
        let report = allocate(&vpp(), march(), &registry, &events, &AllocationPolicy::default());

        assert_relative_eq!(report.total_revenue, 30.0);
        assert_relative_eq!(report.vpp_revenue, 3.0 + 2.0 * 70.0);
        let a = report.site("a").map(|s| s.revenue).unwrap_or(f64::NAN);
        let b = report.site("b").map(|s| s.revenue).unwrap_or(f64::NAN);
        assert_relative_eq!(a, 0.8 * 10.0 + 0.2 * 27.0 * 0.4, epsilon = 1e-9);
        assert_relative_eq!(b, 0.8 * 20.0 + 0.2 * 27.0 * 0.6, epsilon = 1e-9);
    }

    #[test]
    fn ignores_events_outside_month() {
        let registry = registry(&[("a", 10.0)]);
        let events = events(&[
            ("a", "2024-02-29", 100.0, 1.0),
            ("a", "2024-04-01", 100.0, 1.0),
            ("a", "2023-03-15", 100.0, 1.0),
        ]);
        let report = allocate(&vpp(), march(), &registry, &events, &AllocationPolicy::default());
        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.vpp_revenue, report.total_daily_fees());
        assert_eq!(report.site_revenues[0].revenue, 0.0);
    }

    #[test]
    fn site_without_events_still_gets_capacity_share_and_fees() {
        let registry = registry(&[("a", 10.0), ("idle", 10.0)]);
        let events = events(&[("a", "2024-03-01", 10.0, 1.0)]);
        let report = allocate(&vpp(), march(), &registry, &events, &AllocationPolicy::default());

        let idle = report.site("idle");
        assert_eq!(idle.map(|s| s.daily_fees), Some(70.0));
        assert_relative_eq!(
            idle.map(|s| s.revenue).unwrap_or(f64::NAN),
            0.2 * 9.0 * 0.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_capacity_skips_distribution() {
        let registry = registry(&[("a", 0.0), ("b", 0.0)]);
        let events = events(&[("a", "2024-03-01", 10.0, 1.0)]);
        let report = allocate(&vpp(), march(), &registry, &events, &AllocationPolicy::default());

        assert_eq!(report.site_revenues.len(), 2);
        assert!(report.site_revenues.iter().all(|s| s.revenue.is_finite()));
        assert_relative_eq!(report.site("a").map(|s| s.revenue).unwrap_or(f64::NAN), 8.0);
        assert_eq!(report.site("b").map(|s| s.revenue), Some(0.0));
    }

    #[test]
    fn negative_total_capacity_still_weights_by_capacity() {
        let registry = registry(&[("a", -10.0), ("b", -15.0)]);
        let events = events(&[("a", "2024-03-01", 100.0, 1.0)]);
        let report = allocate(&vpp(), march(), &registry, &events, &AllocationPolicy::default());

        let a = report.site("a").map(|s| s.revenue).unwrap_or(f64::NAN);
        let b = report.site("b").map(|s| s.revenue).unwrap_or(f64::NAN);
        assert_relative_eq!(a, 80.0 + 0.2 * 90.0 * 0.4, epsilon = 1e-9);
        assert_relative_eq!(b, 0.2 * 90.0 * 0.6, epsilon = 1e-9);
    }

    #[test]
    fn unregistered_site_events_count_only_toward_totals() {
        let registry = registry(&[("a", 10.0)]);
        let events = events(&[("ghost", "2024-03-01", 10.0, 1.0)]);
        let report = allocate(&vpp(), march(), &registry, &events, &AllocationPolicy::default());

        assert_relative_eq!(report.total_revenue, 10.0);
        assert_relative_eq!(report.vpp_revenue, 1.0 + 70.0);
        assert_eq!(report.site_revenues.len(), 1);
        assert!(report.site("ghost").is_none());
        assert_relative_eq!(report.site_revenues[0].revenue, 0.2 * 9.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_registry_keeps_only_the_cut() {
        let registry = Registry::new();
        let events = events(&[("a", "2024-03-01", 10.0, 1.0)]);
        let report = allocate(&vpp(), march(), &registry, &events, &AllocationPolicy::default());
        assert!(report.site_revenues.is_empty());
        assert_relative_eq!(report.vpp_revenue, 1.0);
    }

    #[test]
    fn duplicate_events_are_all_counted() {
        let registry = registry(&[("a", 10.0)]);
        let events = events(&[("a", "2024-03-01", 10.0, 1.0), ("a", "2024-03-01", 10.0, 1.0)]);
        let report = allocate(&vpp(), march(), &registry, &events, &AllocationPolicy::default());
        assert_relative_eq!(report.total_revenue, 20.0);
    }

    #[test]
    fn policy_changes_split_and_fees() {
        let registry = registry(&[("a", 10.0)]);
        let events = events(&[("a", "2024-03-01", 10.0, 1.0)]);
        let policy = AllocationPolicy {
            local_share: 0.5,
            capacity_share: 0.5,
            billing_days: 30,
        };
        let report = allocate(&vpp(), march(), &registry, &events, &policy);
        assert_relative_eq!(report.site_revenues[0].revenue, 5.0 + 4.5, epsilon = 1e-12);
        assert_relative_eq!(report.site_revenues[0].daily_fees, 75.0);
    }
}
