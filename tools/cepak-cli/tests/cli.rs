//! End-to-end tests driving the `cepak` binary.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn cepak(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cepak"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run cepak")
}

fn cepak_with_log(dir: &Path, rust_log: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cepak"))
        .current_dir(dir)
        .args(args)
        .env("RUST_LOG", rust_log)
        .output()
        .expect("failed to run cepak")
}

fn bundle_entries(path: &Path) -> Vec<(String, String)> {
    let mut zip = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut file = zip.by_index(i).unwrap();
            let mut text = String::new();
            file.read_to_string(&mut text).unwrap();
            (file.name().to_string(), text)
        })
        .collect()
}

fn names(entries: &[(String, String)]) -> Vec<&str> {
    entries.iter().map(|(n, _)| n.as_str()).collect()
}

fn write_png(path: &Path, width: u32, height: u32, pixel: [u8; 4]) {
    image::RgbaImage::from_fn(width, height, |_, _| image::Rgba(pixel))
        .save(path)
        .unwrap();
}

fn write_wav(path: &Path) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for s in [-128i8, 0, 127] {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
    std::fs::read(path).unwrap()
}

#[test]
fn convert_without_inputs_bundles_demo() {
    let dir = tempfile::tempdir().unwrap();
    let out = cepak(dir.path(), &["convert"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let bundle = dir.path().join("ti84_full_game.8pk");
    let entries = bundle_entries(&bundle);
    assert_eq!(
        names(&entries),
        ["player_sprite.c", "demo_map.c", "assets.h", "main.c"]
    );

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Bundle hash:"));
    assert!(stdout.contains("demo set"));
}

#[test]
fn demo_bundle_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    assert!(cepak(dir.path(), &["convert", "-o", "a.8pk"]).status.success());
    assert!(cepak(dir.path(), &["convert", "-o", "b.8pk"]).status.success());

    let a = std::fs::read(dir.path().join("a.8pk")).unwrap();
    let b = std::fs::read(dir.path().join("b.8pk")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn convert_png_and_wav() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("hero.png"), 2, 1, [255, 255, 255, 255]);
    let wav = write_wav(&dir.path().join("jump.wav"));

    let out = cepak(dir.path(), &["convert", "hero.png", "jump.wav", "--name", "maze"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let entries = bundle_entries(&dir.path().join("maze.8pk"));
    assert_eq!(names(&entries), ["hero.c", "jump.c", "assets.h", "main.c"]);
    assert_eq!(entries[0].1, "const uint8_t hero[] = {\n16,16,\n};\n");

    let values: Vec<String> = wav.iter().map(|b| b.to_string()).collect();
    assert!(entries[1].1.contains(&format!("\n{},\n", values.join(","))));

    let header = &entries[2].1;
    assert!(header.contains("#include \"hero.c\""));
    assert!(header.contains("#include \"jump.c\""));
}

#[test]
fn convert_fails_when_every_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();

    let out = cepak(dir.path(), &["convert", "broken.png"]);
    assert!(!out.status.success());
    assert!(!dir.path().join("ti84_full_game.8pk").exists());
}

#[test]
fn convert_writes_report_and_unpacked_files() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("hero.png"), 1, 1, [0, 0, 0, 255]);
    std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

    let out = cepak(
        dir.path(),
        &["convert", "hero.png", "notes.txt", "--report", "report.json", "--out-dir", "project"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["bundle"], "ti84_full_game.8pk");
    assert_eq!(report["assets"][0]["symbol"], "hero");
    assert_eq!(report["diagnostics"][0]["kind"], "unrecognized_extension");

    let project: PathBuf = dir.path().join("project");
    assert!(project.join("hero.c").exists());
    assert!(project.join("assets.h").exists());
    assert!(project.join("main.c").exists());
}

#[test]
fn manifest_settings_apply() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cepak.toml"),
        "[project]\nname = \"arena\"\nasset_dir = \"assets\"\n\n[encode]\nemit_length = true\n",
    )
    .unwrap();
    write_png(&dir.path().join("hero.png"), 1, 1, [0, 0, 0, 255]);

    let out = cepak(dir.path(), &["convert", "hero.png"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let entries = bundle_entries(&dir.path().join("arena.8pk"));
    assert_eq!(names(&entries), ["assets/hero.c", "assets.h", "main.c"]);
    assert!(entries[0].1.contains("const uint32_t hero_len = 1;"));
    assert!(entries[1].1.contains("#include \"assets/hero.c\""));
}

#[test]
fn export_prints_c_source() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("dot.png"), 1, 1, [255, 255, 255, 255]);

    let out = cepak(dir.path(), &["export", "dot.png", "-q", "luma"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "const uint8_t dot[] = {\n15,\n};\n"
    );
}

#[test]
fn init_then_convert() {
    let dir = tempfile::tempdir().unwrap();
    assert!(cepak(dir.path(), &["init", "--name", "maze"]).status.success());
    assert!(dir.path().join("cepak.toml").exists());
    assert!(!cepak(dir.path(), &["init"]).status.success());

    assert!(cepak(dir.path(), &["convert"]).status.success());
    assert!(dir.path().join("maze.8pk").exists());
}

#[test]
fn rust_log_overrides_default_level() {
    let dir = tempfile::tempdir().unwrap();

    let out = cepak(dir.path(), &["convert"]);
    assert!(String::from_utf8_lossy(&out.stderr).contains("using demo assets"));

    let out = cepak_with_log(dir.path(), "warn", &["--verbose", "convert"]);
    assert!(out.status.success());
    assert!(!String::from_utf8_lossy(&out.stderr).contains("using demo assets"));
}
