use super::*;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn memory_max_parses_numeric_limit() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("svc")).unwrap();
    write(&tmp.path().join("svc"), "memory.max", "134217728\n");
    let provider = CgroupV2Provider::with_root(tmp.path());
    assert_eq!(provider.read_limit("svc", "memory.max"), Some(134_217_728));
}

#[test]
fn memory_max_of_unbounded_cgroup_is_none() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("svc")).unwrap();
    write(&tmp.path().join("svc"), "memory.max", "max\n");
    let provider = CgroupV2Provider::with_root(tmp.path());
    assert_eq!(provider.read_limit("svc", "memory.max"), None);
}

#[test]
fn cpu_quota_reads_first_field_of_cpu_max() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("svc")).unwrap();
    write(&tmp.path().join("svc"), "cpu.max", "50000 100000\n");
    let provider = CgroupV2Provider::with_root(tmp.path());
    assert_eq!(provider.read_cpu_quota("svc"), Some(50_000));
}

#[test]
fn missing_cgroup_directory_yields_none_not_error() {
    let tmp = tempfile::tempdir().unwrap();
    let provider = CgroupV2Provider::with_root(tmp.path());
    assert_eq!(provider.read_limit("absent", "memory.max"), None);
}
