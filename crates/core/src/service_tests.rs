use super::*;

#[test]
fn rejects_empty() {
    assert_eq!(ServiceName::new(""), Err(ServiceNameError::Empty));
}

#[test]
fn rejects_non_ascii() {
    assert!(matches!(ServiceName::new("café"), Err(ServiceNameError::NotAscii(_))));
}

#[test]
fn accepts_ascii_name() {
    let name = ServiceName::new("web").unwrap();
    assert_eq!(name.as_str(), "web");
    assert_eq!(name.to_string(), "web");
}

#[test]
fn borrows_as_str_for_map_lookup() {
    use std::collections::HashMap;
    let mut map: HashMap<ServiceName, u32> = HashMap::new();
    map.insert(ServiceName::new("db").unwrap(), 1);
    assert_eq!(map.get("db"), Some(&1));
}
