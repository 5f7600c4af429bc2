use probe_render::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../probe-render.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.page.region_id, "content");
    assert!(cfg.page.address.is_empty());
    assert!(!cfg.fetch.user_agent.is_empty());
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("probe-render.toml");
    std::fs::write(&path, "[output]\npath = \"out/page.html\"\nprint_summary = false\n")
        .expect("write config");
    let cfg = Config::load(&path).expect("load");
    assert_eq!(cfg.output.path, "out/page.html");
    assert!(!cfg.output.print_summary);
}

#[test]
fn load_rejects_bad_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[page\n").expect("write config");
    assert!(Config::load(&path).is_err());
}
