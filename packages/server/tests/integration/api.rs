use serde_json::json;

use crate::common::{PNG_BYTES, TestApp, b64, item_id, routes};

mod api_list {
    use super::*;

    #[tokio::test]
    async fn empty_catalog_lists_nothing() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::API_ITEMS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn items_are_listed_in_creation_order() {
        let app = TestApp::spawn().await;
        app.create_item("First", "one", b"first-blob").await;
        app.create_item("Second", "two", b"second-blob").await;

        let items = app.list_items().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "First");
        assert_eq!(items[1]["name"], "Second");
        assert!(item_id(&items[0]) < item_id(&items[1]));
    }

    #[tokio::test]
    async fn allows_cross_origin_requests() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .get(app.url(routes::API_ITEMS))
            .header("Origin", "http://flutter.local")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(
            res.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn configured_origins_restrict_cross_origin_requests() {
        let app = TestApp::spawn_with(|config| {
            config.server.cors.allow_origins = vec!["http://app.local".to_string()];
        })
        .await;

        let allowed = app.get_with_origin(routes::API_ITEMS, "http://app.local").await;
        assert_eq!(allowed.status, 200);
        assert_eq!(
            allowed.header("access-control-allow-origin"),
            Some("http://app.local")
        );

        let other = app
            .get_with_origin(routes::API_ITEMS, "http://elsewhere.local")
            .await;
        assert_eq!(other.header("access-control-allow-origin"), None);
    }
}

mod api_create {
    use super::*;

    #[tokio::test]
    async fn widget_scenario_creates_listed_item_with_image() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::API_CREATE,
                &json!({
                    "name": "Widget",
                    "description": "A widget",
                    "image": b64(b"0123456789"),
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.text.is_empty());

        let items = app.list_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Widget");
        assert_eq!(items[0]["description"], "A widget");
        let image = items[0]["image"].as_str().expect("image should be set");
        assert!(
            image.starts_with(&format!("http://{}/static/uploads/", app.addr)),
            "unexpected image url {image}"
        );
        // Unrecognised bytes are stored as JPEG.
        assert!(image.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn image_url_serves_uploaded_bytes() {
        let app = TestApp::spawn().await;
        let blob = b"\x00\x01\x02binary\xffdata".to_vec();

        let item = app.create_and_fetch("Blob", &blob).await;
        let url = item["image"].as_str().unwrap();
        let (status, bytes) = app.get_bytes(url).await;

        assert_eq!(status, 200);
        assert_eq!(bytes, blob);
    }

    #[tokio::test]
    async fn png_payload_keeps_png_extension() {
        let app = TestApp::spawn().await;

        let item = app.create_and_fetch("Picture", PNG_BYTES).await;

        assert!(item["image"].as_str().unwrap().ends_with(".png"));
    }

    #[tokio::test]
    async fn accepts_data_url_payload() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::API_CREATE,
                &json!({
                    "name": "Data URL",
                    "description": "from a browser canvas",
                    "image": format!("data:image/png;base64,{}", b64(PNG_BYTES)),
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(app.upload_files().len(), 1);
    }

    #[tokio::test]
    async fn missing_description_is_rejected_without_writes() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::API_CREATE,
                &json!({ "name": "Widget", "image": b64(b"0123456789") }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "missing required fields");
        assert!(
            catalog_server::repository::list_all(&app.db)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(app.upload_files().is_empty());
    }

    #[tokio::test]
    async fn missing_image_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::API_CREATE,
                &json!({ "name": "Widget", "description": "A widget" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "missing required fields");
    }

    #[tokio::test]
    async fn null_field_counts_as_missing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::API_CREATE,
                &json!({ "name": null, "description": "A widget", "image": b64(b"x") }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "missing required fields");
    }

    #[tokio::test]
    async fn request_without_json_body_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_empty(routes::API_CREATE).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "missing required fields");
    }

    #[tokio::test]
    async fn invalid_base64_is_rejected_without_orphaned_file() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::API_CREATE,
                &json!({
                    "name": "Widget",
                    "description": "A widget",
                    "image": "this is not base64!!",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "invalid/undecodable image");
        assert!(app.upload_files().is_empty());
        assert!(app.list_items().await.is_empty());
    }

    #[tokio::test]
    async fn oversized_image_is_rejected() {
        let app = TestApp::spawn().await;
        let big = vec![0u8; 1024 * 1024 + 1];

        let res = app
            .post_json(
                routes::API_CREATE,
                &json!({ "name": "Huge", "description": "too big", "image": b64(&big) }),
            )
            .await;

        assert_eq!(res.status, 413);
        assert!(app.upload_files().is_empty());
        assert!(app.list_items().await.is_empty());
    }

    #[tokio::test]
    async fn body_over_request_limit_is_413() {
        let app = TestApp::spawn().await;
        let big = vec![0u8; 2 * 1024 * 1024];

        let res = app
            .post_json(
                routes::API_CREATE,
                &json!({ "name": "Huge", "description": "way too big", "image": b64(&big) }),
            )
            .await;

        assert_eq!(res.status, 413);
        assert!(res.body["error"].is_string());
        assert!(app.upload_files().is_empty());
        assert!(app.list_items().await.is_empty());
    }
}

mod api_update {
    use super::*;

    #[tokio::test]
    async fn update_without_image_keeps_current_image() {
        let app = TestApp::spawn().await;
        let item = app.create_and_fetch("Widget", b"original").await;
        let id = item_id(&item);

        let res = app
            .put_json(
                &routes::api_update(id),
                &json!({ "name": "Widget v2", "description": "Improved" }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.text.is_empty());

        let items = app.list_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Widget v2");
        assert_eq!(items[0]["description"], "Improved");
        assert_eq!(items[0]["image"], item["image"]);
    }

    #[tokio::test]
    async fn update_with_image_replaces_and_removes_old_file() {
        let app = TestApp::spawn().await;
        let item = app.create_and_fetch("Widget", b"old image").await;
        let old_url = item["image"].as_str().unwrap().to_string();

        let res = app
            .put_json(
                &routes::api_update(item_id(&item)),
                &json!({
                    "name": "Widget",
                    "description": "New picture",
                    "image": b64(b"new image"),
                }),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let items = app.list_items().await;
        let new_url = items[0]["image"].as_str().unwrap();
        assert_ne!(new_url, old_url);

        let (status, bytes) = app.get_bytes(new_url).await;
        assert_eq!(status, 200);
        assert_eq!(bytes, b"new image");

        let (old_status, _) = app.get_bytes(&old_url).await;
        assert_eq!(old_status, 404);
        assert_eq!(app.upload_files().len(), 1);
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let app = TestApp::spawn().await;
        let item = app.create_and_fetch("Widget", b"img").await;

        let res = app
            .put_json(
                &routes::api_update(item_id(&item)),
                &json!({ "description": "no name" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "missing required fields");
        assert_eq!(app.list_items().await[0]["description"], "Widget description");
    }

    #[tokio::test]
    async fn invalid_image_is_rejected_and_row_untouched() {
        let app = TestApp::spawn().await;
        let item = app.create_and_fetch("Widget", b"img").await;

        let res = app
            .put_json(
                &routes::api_update(item_id(&item)),
                &json!({ "name": "Changed", "description": "Changed", "image": "%%%" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["error"], "invalid/undecodable image");
        assert_eq!(app.list_items().await[0]["name"], "Widget");
        assert_eq!(app.upload_files().len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_returns_404_without_orphaned_file() {
        let app = TestApp::spawn().await;

        let res = app
            .put_json(
                &routes::api_update(999),
                &json!({ "name": "Ghost", "description": "none", "image": b64(b"ghost") }),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "item not found");
        assert!(app.upload_files().is_empty());
        assert!(app.list_items().await.is_empty());
    }

    #[tokio::test]
    async fn non_numeric_id_returns_json_error() {
        let app = TestApp::spawn().await;

        let res = app
            .put_json(
                "/api/update/abc",
                &json!({ "name": "Widget", "description": "A widget" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert!(res.body["error"].is_string(), "{}", res.text);
    }

    #[tokio::test]
    async fn concurrent_updates_to_one_item_all_succeed() {
        let app = TestApp::spawn().await;
        let item = app.create_and_fetch("Widget", b"img").await;
        let url = app.url(&routes::api_update(item_id(&item)));

        let mut handles = Vec::new();
        for n in 0..30 {
            let client = app.client.clone();
            let url = url.clone();
            handles.push(tokio::spawn(async move {
                client
                    .put(url)
                    .json(&json!({ "name": format!("Widget {n}"), "description": "racing" }))
                    .send()
                    .await
                    .expect("Failed to send PUT request")
                    .status()
                    .as_u16()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 200);
        }

        let items = app.list_items().await;
        assert_eq!(items.len(), 1);
        assert!(items[0]["name"].as_str().unwrap().starts_with("Widget "));
        assert_eq!(items[0]["description"], "racing");
    }

    #[tokio::test]
    async fn unknown_id_without_image_returns_404() {
        let app = TestApp::spawn().await;

        let res = app
            .put_json(
                &routes::api_update(999),
                &json!({ "name": "Ghost", "description": "none" }),
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod api_delete {
    use super::*;

    #[tokio::test]
    async fn deleting_twice_succeeds_both_times() {
        let app = TestApp::spawn().await;
        let item = app.create_and_fetch("Widget", b"img").await;
        let id = item_id(&item);

        let first = app.delete(&routes::api_delete(id)).await;
        assert_eq!(first.status, 200);
        assert_eq!(first.body, json!({ "message": "deleted" }));
        assert!(app.list_items().await.is_empty());

        let second = app.delete(&routes::api_delete(id)).await;
        assert_eq!(second.status, 200);
        assert_eq!(second.body, json!({ "message": "deleted" }));
        assert!(app.list_items().await.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_image_file() {
        let app = TestApp::spawn().await;
        let item = app.create_and_fetch("Widget", b"img").await;
        assert_eq!(app.upload_files().len(), 1);

        let res = app.delete(&routes::api_delete(item_id(&item))).await;

        assert_eq!(res.status, 200);
        assert!(app.upload_files().is_empty());
        let (status, _) = app.get_bytes(item["image"].as_str().unwrap()).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn delete_leaves_other_items_alone() {
        let app = TestApp::spawn().await;
        let keep = app.create_and_fetch("Keep", b"keep").await;
        let gone = app.create_and_fetch("Gone", b"gone").await;

        app.delete(&routes::api_delete(item_id(&gone))).await;

        let items = app.list_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], keep["id"]);
        let (status, bytes) = app.get_bytes(keep["image"].as_str().unwrap()).await;
        assert_eq!(status, 200);
        assert_eq!(bytes, b"keep");
    }

    #[tokio::test]
    async fn non_numeric_id_returns_json_error() {
        let app = TestApp::spawn().await;

        let res = app.delete("/api/delete/abc").await;

        assert_eq!(res.status, 400);
        assert!(res.body["error"].is_string(), "{}", res.text);
    }

    #[tokio::test]
    async fn deleting_unknown_id_succeeds() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::api_delete(12345)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "deleted");
    }
}
