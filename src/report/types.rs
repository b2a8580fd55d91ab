use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::events::YearMonth;

/// Revenue split between a VPP operator and its sites for one month.
///
/// Serializes to the public report JSON layout. Field order is fixed, so
/// identical inputs always produce identical text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub vpp_name: String,
    pub year_month: YearMonth,
    /// Gross revenue of every event in the month.
    pub total_revenue: f64,
    /// Operator's percentage cut plus all daily fees.
    pub vpp_revenue: f64,
    /// One entry per registered site, in registration order.
    pub site_revenues: Vec<SiteRevenue>,
}

/// A single site's line in a [`MonthlyReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteRevenue {
    pub nmi: String,
    /// Local share of the site's own events plus its capacity share.
    pub revenue: f64,
    /// Fees the site owes the operator for the month.
    pub daily_fees: f64,
}

impl MonthlyReport {
    /// Compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the report cannot be encoded.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON text.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the report cannot be encoded.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn site(&self, nmi: &str) -> Option<&SiteRevenue> {
        self.site_revenues.iter().find(|s| s.nmi == nmi)
    }

    pub fn total_site_revenue(&self) -> f64 {
        self.site_revenues.iter().map(|s| s.revenue).sum()
    }

    pub fn total_daily_fees(&self) -> f64 {
        self.site_revenues.iter().map(|s| s.daily_fees).sum()
    }
}

impl fmt::Display for MonthlyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Revenue Report: {} {} ---", self.vpp_name, self.year_month)?;
        writeln!(f, "Total revenue:   {:.2}", self.total_revenue)?;
        writeln!(f, "VPP revenue:     {:.2}", self.vpp_revenue)?;
        writeln!(f, "Daily fees:      {:.2}", self.total_daily_fees())?;
        write!(f, "Sites:           {}", self.site_revenues.len())?;
        for site in &self.site_revenues {
            write!(
                f,
                "\n  {:<14} revenue {:>10.2}  fees {:>8.2}",
                site.nmi, site.revenue, site.daily_fees
            )?;
        }
        Ok(())
    }
}
