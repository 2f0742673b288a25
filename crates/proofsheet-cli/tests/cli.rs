use assert_cmd::Command;

#[test]
fn renders_a_manifest_with_the_fixed_cell_surface() {
    let dir = tempfile::tempdir().unwrap();
    for (name, color) in [("a.png", [255, 0, 0]), ("b.png", [0, 0, 255])] {
        let img = image::RgbImage::from_pixel(32, 24, image::Rgb(color));
        img.save(dir.path().join(name)).unwrap();
    }
    let manifest = serde_json::json!({
        "cols": 2,
        "cell_width": 32,
        "cell_height": 24,
        "title": "smoke",
        "samples": [
            {"image": "a.png", "caption": "left"},
            {"image": "b.png", "caption": "right"}
        ]
    });
    std::fs::write(dir.path().join("grid.json"), manifest.to_string()).unwrap();

    Command::cargo_bin("proofsheet-cli")
        .unwrap()
        .current_dir(dir.path())
        .args(["render", "--fixed-cell", "--out", "grid.png", "grid.json"])
        .assert()
        .success();

    // Fixed cell: 10px title line + 10px caption line + 24px images.
    let decoder = png::Decoder::new(std::fs::File::open(dir.path().join("grid.png")).unwrap());
    let reader = decoder.read_info().unwrap();
    let info = reader.info();
    assert_eq!((info.width, info.height), (64, 44));
}

#[test]
fn missing_font_without_fixed_cell_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = serde_json::json!({
        "cols": 1,
        "cell_width": 8,
        "cell_height": 8,
        "samples": []
    });
    std::fs::write(dir.path().join("grid.json"), manifest.to_string()).unwrap();

    Command::cargo_bin("proofsheet-cli")
        .unwrap()
        .current_dir(dir.path())
        .args(["render", "grid.json"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn layout_errors_surface_as_failures() {
    let dir = tempfile::tempdir().unwrap();
    // The image on disk is not the declared cell size.
    let img = image::RgbImage::from_pixel(16, 16, image::Rgb([1, 2, 3]));
    img.save(dir.path().join("a.png")).unwrap();
    let manifest = serde_json::json!({
        "cols": 1,
        "cell_width": 32,
        "cell_height": 32,
        "samples": [{"image": "a.png", "caption": "too small"}]
    });
    std::fs::write(dir.path().join("grid.json"), manifest.to_string()).unwrap();

    Command::cargo_bin("proofsheet-cli")
        .unwrap()
        .current_dir(dir.path())
        .args(["render", "--fixed-cell", "grid.json"])
        .assert()
        .failure()
        .code(1);
}
