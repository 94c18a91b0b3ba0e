use super::*;

#[test]
fn error_conversion_wraps_in_error_variant() {
    let resp: Response = RpcError::NotFound("web".to_string()).into();
    assert!(matches!(resp, Response::Error { error: RpcError::NotFound(s) } if s == "web"));
}

#[test]
fn response_roundtrips_through_json() {
    let resp = Response::Health { service: "DaemonService".to_string(), serving: true };
    let json = serde_json::to_string(&resp).unwrap();
    let back: Response = serde_json::from_str(&json).unwrap();
    assert_eq!(resp, back);
}
