/// BDD integration tests for the dashboard data endpoints.
mod common;

use axum::http::StatusCode;
use serde_json::json;

use pulseboard_core::report::ReportRow;
use pulseboard_core::{fixtures, ReportError};

use common::{config_with, data_source, get, json_body, setup, test_config, MockReports};

// ============================================================
// BDD: acquisition channels are title-cased with shares and colours
// ============================================================
#[tokio::test]
async fn test_acquisition_channels_from_live_rows() {
    let reports = MockReports::default().with(
        "sessionDefaultChannelGroup",
        Ok(vec![
            ReportRow::new(["organic_search"], ["120"]),
            ReportRow::new(["direct"], ["80"]),
        ]),
    );
    let (reports, app) = setup(test_config(), reports);

    let response = get(app, "/api/analytics/acquisition").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data_source(&response).as_deref(), Some("live"));

    let json = json_body(response).await;
    assert_eq!(
        json["sources"],
        json!([
            {"source": "Organic Search", "users": 120, "percentage": 60.0, "color": "#4ade80"},
            {"source": "Direct", "users": 80, "percentage": 40.0, "color": "#60a5fa"}
        ])
    );
    assert_eq!(json["source"], "live");
    assert_eq!(reports.calls(), 1);

    let seen = reports.seen.lock().expect("lock");
    assert_eq!(seen[0].0, "123456789");
    assert_eq!(seen[0].1.limit, Some(6));
}

// ============================================================
// BDD: empty device categories fall back to grouped device names
// ============================================================
#[tokio::test]
async fn test_devices_group_alternate_dimension() {
    let reports = MockReports::default().with(
        "device",
        Ok(vec![
            ReportRow::new(["iPhone 12"], ["50"]),
            ReportRow::new(["Windows PC"], ["150"]),
        ]),
    );
    let (reports, app) = setup(test_config(), reports);

    let response = get(app, "/api/analytics/devices").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(
        json["devices"],
        json!([
            {"device": "mobile", "users": 50, "percentage": 25.0},
            {"device": "desktop", "users": 150, "percentage": 75.0}
        ])
    );
    assert_eq!(json["source"], "live");
    assert_eq!(reports.calls(), 2);

    let seen = reports.seen.lock().expect("lock");
    assert_eq!(seen[0].1.dimensions, vec!["deviceCategory"]);
    assert_eq!(seen[1].1.dimensions, vec!["device"]);
}

// ============================================================
// BDD: failing queries serve the fixture with 200, flagged as fallback
// ============================================================
#[tokio::test]
async fn test_devices_fixture_when_both_queries_fail() {
    let reports = MockReports::default()
        .with(
            "deviceCategory",
            Err(ReportError::Transport("connection reset".into())),
        )
        .with("device", Err(ReportError::Auth("token expired".into())));
    let (reports, app) = setup(test_config(), reports);

    let response = get(app, "/api/analytics/devices").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data_source(&response).as_deref(), Some("fallback"));

    let json = json_body(response).await;
    assert_eq!(
        json["devices"],
        serde_json::to_value(fixtures::devices()).expect("json")
    );
    assert_eq!(json["source"], "fallback");
    assert_eq!(reports.calls(), 2);
}

#[tokio::test]
async fn test_geo_fixture_when_query_fails() {
    let reports = MockReports::default().with(
        "country",
        Err(ReportError::Query("property not found".into())),
    );
    let (reports, app) = setup(test_config(), reports);

    let response = get(app, "/api/analytics/geo").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["countries"][0]["countryCode"], "US");
    assert_eq!(
        json["countries"].as_array().map(Vec::len),
        Some(fixtures::COUNTRIES.len())
    );
    assert_eq!(json["source"], "fallback");
    assert_eq!(reports.calls(), 1);
}

// ============================================================
// BDD: missing credentials fail fast without calling the service
// ============================================================
#[tokio::test]
async fn test_missing_credentials_return_500_without_queries() {
    for uri in [
        "/api/analytics",
        "/api/analytics/devices",
        "/api/analytics/geo",
        "/api/analytics/acquisition",
        "/api/analytics/pages",
        "/api/analytics/revenue",
    ] {
        let config = config_with(&[("GOOGLE_PRIVATE_KEY", None)]);
        let (reports, app) = setup(config, MockReports::default());

        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");

        let json = json_body(response).await;
        assert_eq!(json["error"], "configuration_error");
        assert!(
            json["message"]
                .as_str()
                .is_some_and(|m| m.contains("GOOGLE_PRIVATE_KEY")),
            "{uri}: {json}"
        );
        assert_eq!(reports.calls(), 0, "{uri}");
    }
}

#[tokio::test]
async fn test_blank_property_id_counts_as_missing() {
    let config = config_with(&[("GOOGLE_ANALYTICS_PROPERTY_ID", Some("  "))]);
    let (reports, app) = setup(config, MockReports::default());

    let response = get(app, "/api/analytics/pages").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert!(json["message"]
        .as_str()
        .is_some_and(|m| m.contains("GOOGLE_ANALYTICS_PROPERTY_ID")));
    assert_eq!(reports.calls(), 0);
}

#[tokio::test]
async fn test_pages_top_ten() {
    let reports = MockReports::default().with(
        "pagePath",
        Ok(vec![
            ReportRow::new(["/", "Home"], ["2"]),
            ReportRow::new(["/pricing", ""], ["1"]),
        ]),
    );
    let (reports, app) = setup(test_config(), reports);

    let response = get(app, "/api/analytics/pages").await;
    let json = json_body(response).await;
    assert_eq!(
        json["pages"],
        json!([
            {"pagePath": "/", "pageTitle": "Home", "pageviews": 2, "percentage": 66.7},
            {"pagePath": "/pricing", "pageTitle": "Unknown Page", "pageviews": 1, "percentage": 33.3}
        ])
    );
    let seen = reports.seen.lock().expect("lock");
    assert_eq!(seen[0].1.limit, Some(10));
}

#[tokio::test]
async fn test_revenue_is_a_bare_array_of_seven_months() {
    let (_reports, app) = setup(test_config(), MockReports::default());

    let response = get(app, "/api/analytics/revenue").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data_source(&response).as_deref(), Some("fallback"));

    let json = json_body(response).await;
    assert_eq!(json, serde_json::to_value(fixtures::revenue()).expect("json"));
}

#[tokio::test]
async fn test_revenue_live_months_carry_plan_split() {
    let reports = MockReports::default().with(
        "yearMonth",
        Ok(vec![ReportRow::new(["190001"], ["1"])]),
    );
    let (_reports, app) = setup(test_config(), reports);

    let response = get(app, "/api/analytics/revenue").await;
    assert_eq!(data_source(&response).as_deref(), Some("live"));

    let json = json_body(response).await;
    let months = json.as_array().expect("array");
    assert_eq!(months.len(), 7);
    // Rows outside the window are ignored, so every month is zero.
    assert!(months.iter().all(|m| m["freePlanRevenue"] == 0
        && m["businessPlanRevenue"] == 0
        && m["customPlanRevenue"] == 0));
}

// ============================================================
// BDD: overview combines three independent sections
// ============================================================
#[tokio::test]
async fn test_overview_combines_sections() {
    let reports = MockReports::default()
        .with(
            "date",
            Ok(vec![
                ReportRow::new(["20250301"], ["10", "4"]),
                ReportRow::new(["20250302"], ["12", "5"]),
            ]),
        )
        .with(
            "totalUsers",
            Ok(vec![
                ReportRow::new(["date_range_0"], ["120", "100", "600", "10", "3"]),
                ReportRow::new(["date_range_1"], ["100", "100", "600", "20", "0"]),
            ]),
        )
        .with(
            "engagementRate",
            Ok(vec![
                ReportRow::new(["date_range_0"], ["0.6"]),
                ReportRow::new(["date_range_1"], ["0.5"]),
            ]),
        );
    let (reports, app) = setup(test_config(), reports);

    let response = get(app, "/api/analytics").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data_source(&response).as_deref(), Some("live"));
    assert_eq!(reports.calls(), 3);

    let json = json_body(response).await;
    assert_eq!(
        json["dailyUsers"],
        json!([
            {"date": "2025-03-01", "activeUsers": 10, "newUsers": 4},
            {"date": "2025-03-02", "activeUsers": 12, "newUsers": 5}
        ])
    );

    let cards = &json["todayMetrics"];
    assert_eq!(cards["totalUsers"]["current"], 120.0);
    assert_eq!(cards["totalUsers"]["previous"], 100.0);
    assert_eq!(cards["totalUsers"]["changePercent"], 20.0);
    assert_eq!(cards["activeUsers"]["changePercent"], 0.0);
    assert_eq!(cards["avgSessionDuration"]["current"], 60.0);
    assert_eq!(cards["avgSessionDuration"]["previous"], 30.0);
    assert_eq!(cards["avgSessionDuration"]["changePercent"], 100.0);
    assert_eq!(cards["transactions"]["current"], 3.0);
    assert_eq!(cards["transactions"]["changePercent"], 0.0);

    let rate = &json["engagementRate"];
    let current = rate["current"].as_f64().expect("number");
    let change = rate["changePercent"].as_f64().expect("number");
    assert!((current - 60.0).abs() < 1e-9);
    assert!((change - 20.0).abs() < 1e-9);

    assert_eq!(json["sources"]["dailyUsers"], "live");
    assert_eq!(json["sources"]["engagementRate"], "live");
}

#[tokio::test]
async fn test_overview_sections_degrade_independently() {
    let reports = MockReports::default()
        .with(
            "date",
            Ok(vec![ReportRow::new(["20250301"], ["10", "4"])]),
        )
        .with("totalUsers", Err(ReportError::Transport("timeout".into())));
    let (_reports, app) = setup(test_config(), reports);

    let response = get(app, "/api/analytics").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data_source(&response).as_deref(), Some("fallback"));

    let json = json_body(response).await;
    assert_eq!(json["dailyUsers"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["todayMetrics"]["totalUsers"]["current"], 0.0);
    assert_eq!(json["engagementRate"]["current"], 65.8);
    assert_eq!(json["engagementRate"]["changePercent"], 12.3);
    assert_eq!(json["sources"]["dailyUsers"], "live");
    assert_eq!(json["sources"]["todayMetrics"], "fallback");
    assert_eq!(json["sources"]["engagementRate"], "fallback");
}
