//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use vpp_revenue::Ledger;

pub const VPP_NAME: &str = "TestVPP";
pub const NMI_1: &str = "1234567890";
pub const NMI_2: &str = "2345678901";
pub const MARCH: &str = "2024-03";

/// March 2024 revenue of site 1 in `test_events.csv`.
pub const R1: f64 = 10.5 * 0.15 + 8.2 * 0.14 + 11.0 * 0.15;
/// March 2024 revenue of site 2 in `test_events.csv`.
pub const R2: f64 = 12.3 * 0.16 + 9.7 * 0.15 + 10.5 * 0.14;

/// Path to a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Two-site registry: 10% cut, 2.5/day fee, capacities 10 and 15.
pub fn two_site_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger
        .create_vpp(VPP_NAME, "10", "2.5")
        .expect("vpp should register");
    ledger.create_site(VPP_NAME, NMI_1, "123 Test St, Test City");
    ledger.create_site(VPP_NAME, NMI_2, "456 Sample Rd, Sample Town");
    ledger
        .create_battery(NMI_1, "TestMfg", "SN123456", "10")
        .expect("battery 1 should register");
    ledger
        .create_battery(NMI_2, "TestMfg", "SN789012", "15")
        .expect("battery 2 should register");
    ledger
}

/// [`two_site_ledger`] with `test_events.csv` imported.
pub fn two_site_ledger_with_events() -> Ledger {
    let mut ledger = two_site_ledger();
    ledger
        .import_events(fixture("test_events.csv"))
        .expect("fixture events should import");
    ledger
}
