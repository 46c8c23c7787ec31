//! Integration tests for filtra-config.
//!
//! These tests verify end-to-end functionality across modules.

use filtra_config::{
    BiquadConfig, ConfigError, FilterConfig, Preset, check_graph, parse_chain, validate_preset,
};
use filtra_core::{FilterSpec, Pipeline};
use tempfile::TempDir;

fn telephone() -> Preset {
    Preset::new("Telephone")
        .with_description("Band-limited voice")
        .with_sample_rate(44100)
        .with_filter(BiquadConfig::new("highpass", 300.0))
        .with_filter(FilterConfig::List(vec![
            BiquadConfig::new("peaking", 1800.0)
                .with_q(1.2)
                .with_gain(4.0)
                .into(),
            BiquadConfig::new("lowpass", 3400.0).into(),
        ]))
}

fn test_signal(frames: usize) -> Vec<f32> {
    (0..frames)
        .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 44100.0).sin() * 0.5)
        .collect()
}

/// Test preset save/load roundtrip produces an identical graph.
#[test]
fn test_preset_save_load_roundtrip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let preset_path = temp_dir.path().join("nested").join("telephone.toml");

    let original = telephone();
    original.save(&preset_path).expect("should save preset");
    let loaded = Preset::load(&preset_path).expect("should load preset");
    assert_eq!(loaded, original);

    let mut first = original.build().unwrap();
    let mut second = loaded.build().unwrap();

    let mut a = test_signal(1024);
    let mut b = a.clone();
    first.process(&mut a, 1);
    second.process(&mut b, 1);
    assert_eq!(a, b, "identical presets must produce identical output");
}

/// JSON presets load through the same path as TOML ones.
#[test]
fn test_load_json_by_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("rumble.json");
    std::fs::write(
        &path,
        r#"{"name": "Rumble", "sample_rate": 44100,
            "filters": [{"kind": "highpass", "frequency": 40, "q": 0.5}]}"#,
    )
    .unwrap();

    let preset = Preset::load(&path).unwrap();
    assert_eq!(preset.name, "Rumble");
    assert_eq!(
        preset.filters,
        vec![BiquadConfig::new("highpass", 40.0).with_q(0.5).into()]
    );
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = Preset::load(temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

/// A preset and the equivalent chain string build the same graph.
#[test]
fn test_chain_string_matches_preset() {
    let chain = parse_chain(
        "highpass:frequency=300|peaking:freq=1800Hz,q=1.2,gain=4dB|lowpass:frequency=3.4kHz",
    )
    .unwrap();
    let spec = FilterSpec::List(
        chain
            .iter()
            .map(BiquadConfig::to_params)
            .map(Into::into)
            .collect(),
    );
    let mut from_chain = Pipeline::new(spec).unwrap();
    from_chain.prepare(44100);

    let mut from_preset = telephone().build().unwrap();

    let mut a = test_signal(2048);
    let mut b = a.clone();
    from_chain.process(&mut a, 1);
    from_preset.process(&mut b, 1);
    assert_eq!(a, b);
}

/// Validation catches what graph construction would silently accept.
#[test]
fn test_validate_before_build() {
    let preset = Preset::new("Too High")
        .with_sample_rate(16000)
        .with_filter(BiquadConfig::new("lowpass", 12000.0));

    assert!(validate_preset(&preset).is_err());
    assert!(preset.build().is_ok(), "building does not range-check");

    assert!(validate_preset(&telephone()).is_ok());
}

/// Channel negotiation through a preset graph.
#[test]
fn test_check_graph_for_preset() {
    let preset = telephone();
    assert_eq!(check_graph(preset.to_spec(), 1).unwrap(), 1);
    assert_eq!(check_graph(preset.to_spec(), 16).unwrap(), 16);
    assert!(check_graph(preset.to_spec(), 0).is_err());
}

/// Long preset lists are split internally but behave like one chain.
#[test]
fn test_long_preset_processes_cleanly() {
    let mut preset = Preset::new("Graphic EQ").with_sample_rate(48000);
    for band in 0..12 {
        let frequency = 31.25 * 2f32.powi(band / 2) * if band % 2 == 0 { 1.0 } else { 1.41 };
        preset = preset.with_filter(
            BiquadConfig::new("peaking", frequency)
                .with_q(1.4)
                .with_gain(if band % 2 == 0 { 3.0 } else { -3.0 }),
        );
    }
    assert!(validate_preset(&preset).is_ok());

    let mut pipeline = preset.build().unwrap();
    let mut block = test_signal(512)
        .into_iter()
        .flat_map(|s| [s, -s])
        .collect::<Vec<_>>();
    pipeline.process(&mut block, 2);

    assert!(block.iter().all(|s| s.is_finite()));
    assert!(block.chunks(2).all(|frame| frame[0] == -frame[1]));
}
