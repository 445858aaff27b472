//! 路由：把HTTP请求翻译为注册表操作
//!
//! | 方法 | 路径 | 操作 |
//! |------|------|------|
//! | GET  | `/scans` | 列出所有扫描 |
//! | POST | `/scans` | 创建扫描 |
//! | GET  | `/scans/{id}` | 获取扫描 |
//! | PUT  | `/scans/{id}` | 部分更新扫描 |
//! | GET  | `/scans/{id}/boundingbox` | 只返回包围盒和中心 |

use crate::http::{HttpError, Request, Response, Status};
use pointscan_core::math::{Point3, Vector3};
use pointscan_core::scan::{NewScan, Scan, ScanId, ScanPatch};
use pointscan_registry::{Registry, RegistryError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// `/scans/{id}/boundingbox` 的响应体
#[derive(Debug, Serialize)]
struct BoundingBoxView {
    bounding_box: Vector3,
    center: Point3,
}

impl From<&Scan> for BoundingBoxView {
    fn from(scan: &Scan) -> Self {
        Self {
            bounding_box: scan.bounding_box(),
            center: scan.center(),
        }
    }
}

impl From<RegistryError> for HttpError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) => HttpError::NotFound(err.to_string()),
            RegistryError::InvalidInput(_) => HttpError::BadRequest(err.to_string()),
            RegistryError::Io(_) | RegistryError::Json(_) => HttpError::Internal(err.to_string()),
        }
    }
}

/// 处理一个请求，错误也转换为响应
pub fn handle(registry: &Registry, request: &Request) -> Response {
    route(registry, request).unwrap_or_else(HttpError::into_response)
}

fn route(registry: &Registry, request: &Request) -> Result<Response, HttpError> {
    let segments: Vec<&str> = request.path.trim_matches('/').split('/').collect();

    match (request.method.as_str(), segments.as_slice()) {
        ("GET", ["scans"]) => Response::json(Status::Ok, &registry.list()),
        ("POST", ["scans"]) => {
            let new_scan: NewScan = parse_body(&request.body)?;
            let scan = registry.create(new_scan.points)?;
            Response::json(Status::Created, &scan)
        }
        ("GET", ["scans", id]) => {
            let scan = registry.get(parse_id(id)?)?;
            Response::json(Status::Ok, &scan)
        }
        ("PUT", ["scans", id]) => {
            let id = parse_id(id)?;
            let patch: ScanPatch = parse_body(&request.body)?;
            let scan = registry.update(id, patch)?;
            Response::json(Status::Ok, &scan)
        }
        ("GET", ["scans", id, "boundingbox"]) => {
            let scan = registry.get(parse_id(id)?)?;
            Response::json(Status::Ok, &BoundingBoxView::from(&scan))
        }
        (method, ["scans"] | ["scans", _] | ["scans", _, "boundingbox"]) => {
            Err(HttpError::MethodNotAllowed(method.to_string()))
        }
        _ => Err(HttpError::NotFound(format!("No route for {}", request.path))),
    }
}

fn parse_id(segment: &str) -> Result<ScanId, HttpError> {
    segment
        .parse()
        .map_err(|_| HttpError::BadRequest(format!("invalid scan id: {segment}")))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, HttpError> {
    serde_json::from_slice(body).map_err(|e| HttpError::BadRequest(format!("invalid payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointscan_registry::seed::demo_point_sets;
    use serde_json::{json, Value};

    fn request(method: &str, path: &str, body: &str) -> Request {
        Request {
            method: method.to_string(),
            path: path.to_string(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn call(registry: &Registry, method: &str, path: &str, body: &str) -> (u16, Value) {
        let response = handle(registry, &request(method, path, body));
        let value = serde_json::from_slice(&response.body).unwrap();
        (response.status.code(), value)
    }

    fn assert_close(value: &Value, expected: [f64; 3]) {
        let actual: Vec<f64> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_create_then_get() {
        let registry = Registry::new();
        let (status, created) = call(
            &registry,
            "POST",
            "/scans",
            r#"{"points": [[5.0,7.0,-3.4],[8.0,5.0,2.2],[10.0,12.0,6],[15.1,9.2,2.2],[9.3,10.2,3.1]]}"#,
        );

        assert_eq!(status, 201);
        assert_eq!(created["id"], 1);
        assert_eq!(created["points"].as_array().unwrap().len(), 5);
        assert_close(&created["bounding_box"], [10.1, 7.0, 9.4]);
        assert_close(&created["center"], [10.05, 8.5, 1.3]);

        let (status, fetched) = call(&registry, "GET", "/scans/1", "");
        assert_eq!(status, 200);
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_list_scans() {
        let registry = Registry::with_seed(demo_point_sets()).unwrap();
        let (status, list) = call(&registry, "GET", "/scans", "");

        assert_eq!(status, 200);
        let ids: Vec<_> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_bounding_box_projection() {
        let registry = Registry::with_seed(demo_point_sets()).unwrap();
        let (status, view) = call(&registry, "GET", "/scans/1/boundingbox", "");

        assert_eq!(status, 200);
        let keys: Vec<_> = view.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 2);
        assert_close(&view["bounding_box"], [10.1, 7.0, 9.4]);
        assert_close(&view["center"], [10.05, 8.5, 1.3]);
    }

    #[test]
    fn test_update_recomputes_bounds() {
        let registry = Registry::with_seed(demo_point_sets()).unwrap();
        let (status, updated) = call(
            &registry,
            "PUT",
            "/scans/2",
            r#"{"points": [[0, 0, 0], [2, 4, 6]]}"#,
        );

        assert_eq!(status, 200);
        assert_eq!(updated["id"], 2);
        assert_eq!(updated["bounding_box"], json!([2.0, 4.0, 6.0]));
        assert_eq!(updated["center"], json!([1.0, 2.0, 3.0]));

        let (_, view) = call(&registry, "GET", "/scans/2/boundingbox", "");
        assert_eq!(view["center"], json!([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_not_found() {
        let registry = Registry::new();

        let (status, body) = call(&registry, "GET", "/scans/7", "");
        assert_eq!(status, 404);
        assert_eq!(body["message"], "Scan 7 doesn't exist");

        let (status, _) = call(&registry, "PUT", "/scans/7", r#"{"points": [[1, 2, 3]]}"#);
        assert_eq!(status, 404);

        let (status, _) = call(&registry, "GET", "/scans/7/boundingbox", "");
        assert_eq!(status, 404);

        let (status, _) = call(&registry, "GET", "/elsewhere", "");
        assert_eq!(status, 404);
    }

    #[test]
    fn test_bad_requests() {
        let registry = Registry::new();

        for body in [
            r#"{"points": []}"#,
            r#"{"points": [[1, 2]]}"#,
            r#"{"points": [["a", 2, 3]]}"#,
            r#"{"id": 9, "points": [[1, 2, 3]]}"#,
            r#"not json"#,
            "",
        ] {
            let (status, body_json) = call(&registry, "POST", "/scans", body);
            assert_eq!(status, 400, "body: {body}");
            assert!(body_json["message"].is_string());
        }
        assert!(registry.is_empty());

        let (status, _) = call(&registry, "GET", "/scans/abc", "");
        assert_eq!(status, 400);
    }

    #[test]
    fn test_update_rejects_unknown_fields() {
        let registry = Registry::with_seed(demo_point_sets()).unwrap();
        let before = registry.get(ScanId(1)).unwrap();

        let (status, _) = call(&registry, "PUT", "/scans/1", r#"{"center": [0, 0, 0]}"#);
        assert_eq!(status, 400);
        assert_eq!(registry.get(ScanId(1)).unwrap(), before);

        let (status, unchanged) = call(&registry, "PUT", "/scans/1", "{}");
        assert_eq!(status, 200);
        assert_eq!(unchanged, serde_json::to_value(&before).unwrap());
    }

    #[test]
    fn test_submitted_coordinates_are_stored_exactly() {
        let registry = Registry::new();
        let coords: [f64; 3] = [1.3000000000000003, 0.1 + 0.2, 2.0 / 3.0];
        let body = format!(
            r#"{{"points": [[{:?}, {:?}, {:?}]]}}"#,
            coords[0], coords[1], coords[2]
        );

        let (status, _) = call(&registry, "POST", "/scans", &body);
        assert_eq!(status, 201);

        let stored = registry.get(ScanId(1)).unwrap().points()[0];
        for (axis, expected) in coords.iter().enumerate() {
            assert_eq!(stored[axis].to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn test_method_not_allowed() {
        let registry = Registry::new();

        assert_eq!(call(&registry, "DELETE", "/scans/1", "").0, 405);
        assert_eq!(call(&registry, "PUT", "/scans", "").0, 405);
        assert_eq!(call(&registry, "POST", "/scans/1/boundingbox", "").0, 405);
    }
}
