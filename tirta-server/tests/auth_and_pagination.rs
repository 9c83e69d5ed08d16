//! 认证、角色门禁与分页契约集成测试

mod common;

use http::{Method, StatusCode};
use serde_json::json;

use common::{ADMIN_PASSWORD, TestApp, data};

#[tokio::test]
async fn login_and_me() {
    let app = TestApp::spawn().await;

    // 错误密码和不存在的用户名返回同一条消息
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "salah" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let wrong_password_msg = body["message"].clone();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "tidak-ada", "password": "salah" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], wrong_password_msg);

    // 正常登录
    let token = app.login("admin", ADMIN_PASSWORD).await;
    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["username"], "admin");
    assert_eq!(data(&body)["role"], "admin");
    // 凭据材料绝不下发
    assert!(data(&body).get("passwordHash").is_none());
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(Method::GET, "/api/complaints", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E1001");

    let (status, _) = app
        .request(Method::GET, "/api/complaints", Some("bukan.token.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 健康检查是公共路由
    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["status"], "ok");
}

#[tokio::test]
async fn role_gates() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    // 管理员建一个 humas 账号
    let (status, body) = app
        .post(
            "/api/employees",
            &admin,
            json!({
                "username": "sari",
                "password": "kata-sandi-sari",
                "displayName": "Sari",
                "role": "humas",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let humas = app.login("sari", "kata-sandi-sari").await;

    // humas 可以管理投诉
    let (status, _) = app
        .post(
            "/api/complaints",
            &humas,
            json!({
                "customerName": "Budi",
                "address": "Jl. Merdeka 12",
                "complaintText": "Air mati",
                "category": "Distribusi",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // 但不能开指令单
    let (status, body) = app
        .post("/api/work-orders", &humas, json!({ "number": "1/SPK/2025" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");

    // 也不能碰员工管理
    let (status, _) = app.get("/api/employees", &humas).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 读对所有已认证员工开放
    let (status, _) = app.get("/api/work-orders", &humas).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let payload = json!({
        "username": "dewi",
        "password": "kata-sandi-dewi",
        "displayName": "Dewi",
        "role": "distribusi",
    });
    let (status, _) = app.post("/api/employees", &admin, payload.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/api/employees", &admin, payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");
}

#[tokio::test]
async fn deactivated_employee_cannot_login() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let (_, body) = app
        .post(
            "/api/employees",
            &admin,
            json!({
                "username": "joko",
                "password": "kata-sandi-joko",
                "displayName": "Joko",
                "role": "distribusi",
            }),
        )
        .await;
    let id = data(&body)["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/employees/{id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "joko", "password": "kata-sandi-joko" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pagination_is_deterministic() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for i in 0..25 {
        let (status, _) = app
            .post(
                "/api/complaints",
                &token,
                json!({
                    "customerName": format!("Pelanggan {i}"),
                    "address": format!("Jl. Nomor {i}"),
                    "complaintText": "Air kecil",
                    "category": "Distribusi",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app.get("/api/complaints?page=1&pageSize=20", &token).await;
    assert_eq!(status, StatusCode::OK);
    let page1 = data(&body);
    assert_eq!(page1["total"].as_i64(), Some(25));
    assert_eq!(page1["totalPages"].as_i64(), Some(2));
    assert_eq!(page1["items"].as_array().unwrap().len(), 20);

    let (_, body) = app.get("/api/complaints?page=2&pageSize=20", &token).await;
    let page2 = data(&body).clone();
    assert_eq!(page2["items"].as_array().unwrap().len(), 5);

    // 两页拼起来无重复, 且按 created_at DESC, id DESC 排好
    let mut ids: Vec<i64> = page1["items"]
        .as_array()
        .unwrap()
        .iter()
        .chain(page2["items"].as_array().unwrap())
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 25);
    let keys: Vec<(i64, i64)> = page1["items"]
        .as_array()
        .unwrap()
        .iter()
        .chain(page2["items"].as_array().unwrap())
        .map(|c| (c["createdAt"].as_i64().unwrap(), c["id"].as_i64().unwrap()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(keys, sorted);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 25);
}

#[tokio::test]
async fn pagination_rejects_bad_params() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, _) = app.get("/api/complaints?page=0", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/complaints?pageSize=101", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // page 大到 offset 会溢出 i64 也必须是 400 而不是 panic
    let (status, body) = app
        .get(&format!("/api/complaints?page={}", i64::MAX), &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    let (status, _) = app.get("/api/complaints?from=2025-99-01", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn free_text_search_filters() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for name in ["Budi Santoso", "Siti Rahma", "Budi Hartono"] {
        app.post(
            "/api/complaints",
            &token,
            json!({
                "customerName": name,
                "address": "Jl. Melati 1",
                "complaintText": "Air keruh",
                "category": "Distribusi",
            }),
        )
        .await;
    }

    let (status, body) = app.get("/api/complaints?q=Budi", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&body)["total"].as_i64(), Some(2));
}

#[tokio::test]
async fn statistics_aggregates() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    for (category, processed) in [
        ("Distribusi", Some("2025-04-17T08:30:00+07:00")),
        ("Distribusi", None),
        ("Hubungan Langganan", None),
    ] {
        let mut payload = json!({
            "customerName": "Budi",
            "address": "Jl. Merdeka 12",
            "complaintText": "Air mati",
            "category": category,
        });
        if let Some(ts) = processed {
            payload["processedAt"] = json!(ts);
        }
        app.post("/api/complaints", &token, payload).await;
    }

    app.post(
        "/api/service-requests",
        &token,
        json!({ "customerName": "Budi", "address": "Jl. Merdeka 12", "serviceCostBy": "Langganan" }),
    )
    .await;

    let (status, body) = app.get("/api/statistics", &token).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let stats = data(&body);
    assert_eq!(stats["complaints"]["total"].as_i64(), Some(3));
    assert_eq!(stats["complaints"]["processed"].as_i64(), Some(1));
    assert_eq!(stats["complaints"]["open"].as_i64(), Some(2));

    let by_category = stats["byCategory"].as_array().unwrap();
    assert_eq!(by_category[0]["category"], "Distribusi");
    assert_eq!(by_category[0]["count"].as_i64(), Some(2));

    let trend = stats["monthlyTrend"].as_array().unwrap();
    assert_eq!(trend.iter().map(|m| m["count"].as_i64().unwrap()).sum::<i64>(), 3);

    let bearers = stats["serviceRequestsByCostBearer"].as_array().unwrap();
    assert_eq!(bearers[0]["costBearer"], "Langganan");
    assert_eq!(bearers[0]["count"].as_i64(), Some(1));
}
