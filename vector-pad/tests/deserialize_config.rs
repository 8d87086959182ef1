#[test]
fn empty_config_falls_back_to_defaults() {
    let config: vector_pad::Config = serde_json::from_str("{}").unwrap();
    assert!(config.base_url.is_none());
    assert!(config.surface_dir.is_none());
    assert_eq!(config.canvas_size, [800, 600]);
    assert_eq!(config.egui.viewport, [1024.0, 768.0]);
}

#[test]
fn partial_config_keeps_remaining_defaults() {
    let config: vector_pad::Config = serde_json::from_str(
        "{\"base_url\": \"http://localhost:8000\", \"surfaces\": [\"/static/a.svg\"]}",
    )
    .unwrap();
    assert_eq!(config.base_url.as_deref(), Some("http://localhost:8000"));
    assert_eq!(config.surfaces, ["/static/a.svg"]);
    assert_eq!(config.canvas_size, [800, 600]);
}
