use serde::{Deserialize, Serialize};

use crate::aggregate::{self, DeviceKind};
use crate::fallback::{self, DataSource, Resolution};
use crate::fixtures;
use crate::report::{ReportClient, ReportQuery};

use super::LAST_30_DAYS;

const PRECISION: u32 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUsers {
    pub device: String,
    pub users: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicesReport {
    pub devices: Vec<DeviceUsers>,
    pub source: DataSource,
}

pub fn primary_query() -> ReportQuery {
    by_dimension("deviceCategory")
}

/// Free-text device names, used when `deviceCategory` yields nothing.
pub fn alternate_query() -> ReportQuery {
    by_dimension("device")
}

fn by_dimension(dimension: &str) -> ReportQuery {
    ReportQuery::new()
        .date_range(LAST_30_DAYS.0, LAST_30_DAYS.1)
        .dimension(dimension)
        .metric("totalUsers")
        .order_by_metric_desc("totalUsers")
}

pub fn reduce(resolution: Resolution) -> DevicesReport {
    let source = resolution.source();
    let categories = match resolution {
        // deviceCategory rows are already bucketed; only odd labels such as
        // "smart tv" need collapsing.
        Resolution::Primary(rows) => aggregate::reduce_rows(&rows, "other", PRECISION, |label| {
            DeviceKind::classify(label).as_str().to_string()
        }),
        Resolution::Alternate(rows) => aggregate::group_devices(&rows, PRECISION),
        Resolution::Fallback => {
            return DevicesReport {
                devices: fixtures::devices(),
                source,
            }
        }
    };

    DevicesReport {
        devices: categories
            .into_iter()
            .map(|c| DeviceUsers {
                device: c.label,
                users: c.count,
                percentage: c.percentage,
            })
            .collect(),
        source,
    }
}

pub async fn fetch(client: &dyn ReportClient, property_id: &str) -> DevicesReport {
    let resolution = fallback::resolve(
        client,
        property_id,
        &primary_query(),
        Some(&alternate_query()),
    )
    .await;
    reduce(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::fallback::testing::ScriptedClient;
    use crate::report::ReportRow;

    #[tokio::test]
    async fn category_rows_are_normalized_per_row() {
        let client = ScriptedClient::default().with(
            "deviceCategory",
            Ok(vec![
                ReportRow::new(["desktop"], ["300"]),
                ReportRow::new(["mobile"], ["150"]),
                ReportRow::new(["smart tv"], ["50"]),
            ]),
        );
        let report = fetch(&client, "1").await;
        assert_eq!(report.source, DataSource::Live);
        let labels: Vec<_> = report.devices.iter().map(|d| d.device.as_str()).collect();
        assert_eq!(labels, vec!["desktop", "mobile", "desktop"]);
        assert_eq!(report.devices[0].percentage, 60.0);
        assert_eq!(report.devices[1].percentage, 30.0);
        assert_eq!(report.devices[2].percentage, 10.0);
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_category_falls_back_to_grouped_device_names() {
        let client = ScriptedClient::default().with(
            "device",
            Ok(vec![
                ReportRow::new(["iPhone 12"], ["50"]),
                ReportRow::new(["Windows PC"], ["150"]),
            ]),
        );
        let report = fetch(&client, "1").await;
        assert_eq!(
            report.devices,
            vec![
                DeviceUsers {
                    device: "mobile".into(),
                    users: 50,
                    percentage: 25.0
                },
                DeviceUsers {
                    device: "desktop".into(),
                    users: 150,
                    percentage: 75.0
                },
            ]
        );
        assert_eq!(report.source, DataSource::Live);
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn both_queries_failing_serves_fixture() {
        let client = ScriptedClient::default()
            .with("deviceCategory", Err(ReportError::Transport("reset".into())))
            .with("device", Err(ReportError::Transport("reset".into())));
        let report = fetch(&client, "1").await;
        assert_eq!(report.devices, fixtures::devices());
        assert_eq!(report.source, DataSource::Fallback);
    }

    #[test]
    fn primary_query_shape() {
        let q = primary_query();
        assert_eq!(q.dimensions, vec!["deviceCategory"]);
        assert_eq!(q.metrics, vec!["totalUsers"]);
        assert_eq!(q.limit, None);
        assert_eq!(alternate_query().dimensions, vec!["device"]);
    }
}
