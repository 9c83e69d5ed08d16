//! 投诉生命周期集成测试
//!
//! create → 挂服务申请单 → 清除, 以及 diff 更新语义的边界用例.

mod common;

use http::StatusCode;
use serde_json::json;

use common::{TestApp, data};

fn sample_complaint() -> serde_json::Value {
    json!({
        "customerName": "Budi Santoso",
        "address": "Jl. Merdeka No. 12",
        "complaintText": "Air keruh sejak kemarin",
        "category": "Distribusi",
        "phone": "0812345678",
    })
}

#[tokio::test]
async fn create_leaves_linkage_unset() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, body) = app.post("/api/complaints", &token, sample_complaint()).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let complaint = data(&body);
    assert_eq!(complaint["customerName"], "Budi Santoso");
    assert_eq!(complaint["category"], "Distribusi");
    assert!(complaint["serviceRequestId"].is_null());
    assert!(complaint["workOrderId"].is_null());
    assert!(complaint["repairReportId"].is_null());
    assert!(complaint["processedAt"].is_null());
}

#[tokio::test]
async fn link_then_clear_scenario() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    // 先准备一个服务申请单和一个指令单作为链接目标
    let (_, body) = app
        .post(
            "/api/service-requests",
            &token,
            json!({ "customerName": "Budi", "address": "Jl. Merdeka 12" }),
        )
        .await;
    let sr_id = data(&body)["id"].as_i64().unwrap();

    let (_, body) = app
        .post(
            "/api/work-orders",
            &token,
            json!({ "number": "690/SPK/IV/2025" }),
        )
        .await;
    let wo_id = data(&body)["id"].as_i64().unwrap();

    let (_, body) = app.post("/api/complaints", &token, sample_complaint()).await;
    let id = data(&body)["id"].as_i64().unwrap();

    // 挂上两个链接
    let (status, body) = app
        .put(
            &format!("/api/complaints/{id}"),
            &token,
            json!({ "serviceRequestId": sr_id, "workOrderId": wo_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(data(&body)["serviceRequestId"].as_i64(), Some(sr_id));
    assert_eq!(data(&body)["workOrderId"].as_i64(), Some(wo_id));

    // 清除 serviceRequestId: null; workOrderId 缺席不动
    let (status, body) = app
        .put(
            &format!("/api/complaints/{id}"),
            &token,
            json!({ "serviceRequestId": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(data(&body)["serviceRequestId"].is_null());
    assert_eq!(data(&body)["workOrderId"].as_i64(), Some(wo_id));

    // 同一补丁再应用一次, 结果不变 (幂等)
    let (status, body) = app
        .put(
            &format!("/api/complaints/{id}"),
            &token,
            json!({ "serviceRequestId": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(data(&body)["serviceRequestId"].is_null());
    assert_eq!(data(&body)["workOrderId"].as_i64(), Some(wo_id));
}

#[tokio::test]
async fn empty_diff_changes_nothing() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (_, body) = app.post("/api/complaints", &token, sample_complaint()).await;
    let created = data(&body).clone();
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .put(&format!("/api/complaints/{id}"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    // 空 diff 完全不写库, 连 updatedAt 都不动
    assert_eq!(data(&body), &created);
}

#[tokio::test]
async fn empty_diff_is_noop_for_downstream_entities() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (_, body) = app
        .post(
            "/api/service-requests",
            &token,
            json!({ "customerName": "Budi", "address": "Jl. Merdeka 12" }),
        )
        .await;
    let sr = data(&body).clone();
    let sr_id = sr["id"].as_i64().unwrap();

    let (status, body) = app
        .put(&format!("/api/service-requests/{sr_id}"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body), &sr);

    let (_, body) = app
        .post("/api/work-orders", &token, json!({ "number": "7/SPK/2025" }))
        .await;
    let wo = data(&body).clone();
    let wo_id = wo["id"].as_i64().unwrap();

    let (status, body) = app
        .put(&format!("/api/work-orders/{wo_id}"), &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body), &wo);
}

#[tokio::test]
async fn absent_fields_stay_untouched() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (_, body) = app.post("/api/complaints", &token, sample_complaint()).await;
    let id = data(&body)["id"].as_i64().unwrap();

    let (status, body) = app
        .put(
            &format!("/api/complaints/{id}"),
            &token,
            json!({ "address": "Jl. Pahlawan 3" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let updated = data(&body);
    assert_eq!(updated["address"], "Jl. Pahlawan 3");
    assert_eq!(updated["customerName"], "Budi Santoso");
    assert_eq!(updated["phone"], "0812345678");
    assert_eq!(updated["complaintText"], "Air keruh sejak kemarin");
}

#[tokio::test]
async fn null_clears_optional_fields() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let mut payload = sample_complaint();
    payload["processedAt"] = json!("2025-04-17T08:30:00+07:00");
    let (_, body) = app.post("/api/complaints", &token, payload).await;
    let created = data(&body);
    assert!(created["processedAt"].is_i64());
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .put(
            &format!("/api/complaints/{id}"),
            &token,
            json!({ "phone": null, "processedAt": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(data(&body)["phone"].is_null());
    assert!(data(&body)["processedAt"].is_null());
}

#[tokio::test]
async fn dangling_link_fails_and_applies_nothing() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (_, body) = app.post("/api/complaints", &token, sample_complaint()).await;
    let created = data(&body).clone();
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .put(
            &format!("/api/complaints/{id}"),
            &token,
            json!({ "address": "Jl. Baru 1", "serviceRequestId": 999999 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");

    // 事务回滚: address 也不能生效
    let (_, body) = app.get(&format!("/api/complaints/{id}"), &token).await;
    assert_eq!(data(&body), &created);
}

#[tokio::test]
async fn validation_rejections() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    // 必填字段为空
    let mut payload = sample_complaint();
    payload["customerName"] = json!("  ");
    let (status, body) = app.post("/api/complaints", &token, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // mapsLink 不是 URL
    let mut payload = sample_complaint();
    payload["mapsLink"] = json!("bukan url");
    let (status, _) = app.post("/api/complaints", &token, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // mapsLink 空字符串被 coerce 成未设置
    let mut payload = sample_complaint();
    payload["mapsLink"] = json!("");
    let (status, body) = app.post("/api/complaints", &token, payload).await;
    assert_eq!(status, StatusCode::OK);
    assert!(data(&body)["mapsLink"].is_null());

    // 不存在的 id
    let (status, _) = app.get("/api/complaints/42", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_resolves_linked_entities() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (_, body) = app
        .post(
            "/api/service-requests",
            &token,
            json!({ "customerName": "Budi", "address": "Jl. Merdeka 12" }),
        )
        .await;
    let sr_id = data(&body)["id"].as_i64().unwrap();

    let (_, body) = app
        .post(
            "/api/repair-reports",
            &token,
            json!({ "content": { "pipe": "PVC 3\"", "length_m": 4 } }),
        )
        .await;
    let rr_id = data(&body)["id"].as_i64().unwrap();

    let (_, body) = app.post("/api/complaints", &token, sample_complaint()).await;
    let id = data(&body)["id"].as_i64().unwrap();

    app.put(
        &format!("/api/complaints/{id}"),
        &token,
        json!({ "serviceRequestId": sr_id, "repairReportId": rr_id }),
    )
    .await;

    let (status, body) = app.get(&format!("/api/complaints/{id}/detail"), &token).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let detail = data(&body);
    assert_eq!(detail["complaint"]["id"].as_i64(), Some(id));
    assert_eq!(detail["serviceRequest"]["id"].as_i64(), Some(sr_id));
    assert_eq!(detail["repairReport"]["id"].as_i64(), Some(rr_id));
    assert_eq!(detail["repairReport"]["content"]["pipe"], "PVC 3\"");
    assert!(detail["workOrder"].is_null());
}

#[tokio::test]
async fn service_request_reasons_and_cost_bearer() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/service-requests",
            &token,
            json!({
                "customerName": "Siti",
                "address": "Jl. Kenanga 8",
                "reasons": ["Pipa bocor", "Meter rusak"],
                "serviceCostBy": "PERUMDA AM",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let sr = data(&body);
    assert_eq!(sr["reasons"], json!(["Pipa bocor", "Meter rusak"]));
    assert_eq!(sr["serviceCostBy"], "PERUMDA AM");

    // 未知费用承担方被拒
    let (status, _) = app
        .post(
            "/api/service-requests",
            &token,
            json!({ "customerName": "Siti", "address": "Jl. Kenanga 8", "serviceCostBy": "Gratis" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn repair_report_content_must_be_object() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .post("/api/repair-reports", &token, json!({ "content": [1, 2, 3] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/repair-reports", &token, json!({ "content": {} }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}
