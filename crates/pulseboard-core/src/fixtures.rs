//! Sample datasets served when live aggregation yields nothing.
//!
//! Kept as plain tables so tests can assert on them and deployments can see
//! exactly what the dashboard shows when the analytics service is down.

use crate::reports::acquisition::SourceUsers;
use crate::reports::devices::DeviceUsers;
use crate::reports::geo::CountryUsers;
use crate::reports::overview::EngagementRate;
use crate::reports::pages::PageViews;
use crate::reports::revenue::MonthlyRevenue;

/// (device, users, percentage)
pub const DEVICES: &[(&str, u64, f64)] = &[
    ("desktop", 2840, 45.0),
    ("mobile", 2650, 42.0),
    ("tablet", 820, 13.0),
];

/// (country, ISO code, users, percentage)
pub const COUNTRIES: &[(&str, &str, u64, f64)] = &[
    ("United States", "US", 2840, 45.0),
    ("United Kingdom", "GB", 1650, 26.0),
    ("Canada", "CA", 1100, 17.0),
    ("Australia", "AU", 480, 8.0),
    ("Germany", "DE", 250, 4.0),
];

/// (source, users, percentage, colour)
pub const SOURCES: &[(&str, u64, f64, &str)] = &[
    ("Organic Search", 2840, 45.0, "#4ade80"),
    ("Direct", 1650, 26.0, "#60a5fa"),
    ("Social", 1100, 17.0, "#f472b6"),
    ("Referral", 750, 12.0, "#fbbf24"),
];

/// (path, title, pageviews, percentage)
pub const PAGES: &[(&str, &str, u64, f64)] = &[
    ("/", "Home", 1250, 35.0),
    ("/products", "Products", 820, 23.0),
    ("/about", "About Us", 540, 15.0),
    ("/contact", "Contact", 320, 9.0),
    ("/blog/top-tips", "Top Tips", 280, 8.0),
];

/// (month, free, business, custom)
pub const REVENUE: &[(&str, i64, i64, i64)] = &[
    ("Jan", 1000, 2000, 3000),
    ("Feb", 1200, 2200, 3200),
    ("Mar", 1100, 2400, 3400),
    ("Apr", 1300, 2600, 3600),
    ("May", 1400, 2800, 3800),
    ("Jun", 1600, 3000, 4000),
    ("Jul", 1500, 3200, 4200),
];

/// Engagement rate in percent, previous period, and change in percent. The
/// previous period is unknown in the sample, so it stays at zero.
pub const ENGAGEMENT: (f64, f64, f64) = (65.8, 0.0, 12.3);

pub fn devices() -> Vec<DeviceUsers> {
    DEVICES
        .iter()
        .map(|(device, users, percentage)| DeviceUsers {
            device: device.to_string(),
            users: *users,
            percentage: *percentage,
        })
        .collect()
}

pub fn countries() -> Vec<CountryUsers> {
    COUNTRIES
        .iter()
        .map(|(country, code, users, percentage)| CountryUsers {
            country: country.to_string(),
            country_code: code.to_string(),
            users: *users,
            percentage: *percentage,
        })
        .collect()
}

pub fn sources() -> Vec<SourceUsers> {
    SOURCES
        .iter()
        .map(|(source, users, percentage, color)| SourceUsers {
            source: source.to_string(),
            users: *users,
            percentage: *percentage,
            color: color.to_string(),
        })
        .collect()
}

pub fn pages() -> Vec<PageViews> {
    PAGES
        .iter()
        .map(|(path, title, pageviews, percentage)| PageViews {
            page_path: path.to_string(),
            page_title: title.to_string(),
            pageviews: *pageviews,
            percentage: *percentage,
        })
        .collect()
}

pub fn revenue() -> Vec<MonthlyRevenue> {
    REVENUE
        .iter()
        .map(|(month, free, business, custom)| MonthlyRevenue {
            month: month.to_string(),
            free_plan_revenue: *free,
            business_plan_revenue: *business,
            custom_plan_revenue: *custom,
        })
        .collect()
}

pub fn engagement() -> EngagementRate {
    let (current, previous, change_percent) = ENGAGEMENT;
    EngagementRate {
        current,
        previous,
        change_percent,
    }
}
