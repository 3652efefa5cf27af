//! End-to-end runs over temp directories: dumps → results on disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use photometric_compare::compare::ComparatorKind;
use photometric_compare::config::{DtwMode, InputSource, ReferenceSource};
use photometric_compare::data::model::{ProfileSet, ResultValue};
use photometric_compare::{pipeline, AnalysisError, Config};

const HEADER: &str = "Instrument: test\nSource: unit\nRate: 1\nWindow: 128\nData:\n";

/// A legacy-format dump: five header lines then `windows` x 128 samples.
fn write_dump(dir: &Path, name: &str, seed: usize, windows: usize) {
    let mut text = String::from(HEADER);
    for w in 0..windows {
        for i in 0..128 {
            let v = (i * (13 + seed) + w * 5 + seed * 101) % 4000;
            writeln!(text, "{v}").unwrap();
        }
        writeln!(text, "glitch").unwrap();
    }
    std::fs::write(dir.join(name), text).unwrap();
}

/// A revised-format dump: four header lines, then `windows` repeats of the
/// same 1500-sample window with a couple of rejected lines in between.
fn write_revised_dump(dir: &Path, name: &str, window: &[u32], windows: usize) {
    let mut text = String::from("Instrument: test\nChannel: revised\nRate: 1\nData:\n");
    for _ in 0..windows {
        for v in window {
            writeln!(text, "{v}").unwrap();
        }
        writeln!(text, "4097").unwrap();
        writeln!(text, "n/a").unwrap();
    }
    std::fs::write(dir.join(name), text).unwrap();
}

fn revised_window(seed: u32) -> Vec<u32> {
    (0..1500u32).map(|i| (i * (7 + seed) + seed * 131) % 4000).collect()
}

fn legacy_in(root: &Path) -> Config {
    Config {
        input: InputSource::Samples {
            dir: root.join("SamplesOld"),
        },
        sanitised_output: Some(root.join("sanitised_data.txt")),
        results_dir: root.join("results"),
        ..Config::legacy()
    }
}

fn lines(path: PathBuf) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn identical_profiles_score_perfectly() {
    let config = Config {
        comparators: vec![
            ComparatorKind::Pearson,
            ComparatorKind::RSquared,
            ComparatorKind::KsTest,
        ],
        ..Config::revised()
    };
    let reference = ProfileSet::from_arrays("theoretical", vec![vec![0.0, 1.0, 2.0, 3.0]]);
    let experimental = ProfileSet::from_arrays("experimental", vec![vec![0.0, 1.0, 2.0, 3.0]]);

    let result = pipeline::compare(&config, &reference, &experimental).unwrap();

    assert_eq!(
        result.output("pearson_results.txt").unwrap().values,
        vec![ResultValue::Scalar(1.0)]
    );
    assert_eq!(
        result.output("rsquare_results.txt").unwrap().values,
        vec![ResultValue::Scalar(1.0)]
    );
    assert_eq!(
        result.output("kstest_results.txt").unwrap().values,
        vec![ResultValue::Pair(0.0, 1.0)]
    );
}

#[test]
fn legacy_run_writes_every_result_file() {
    let root = tempfile::tempdir().unwrap();
    let samples = root.path().join("SamplesOld");
    std::fs::create_dir(&samples).unwrap();
    write_dump(&samples, "run_b.txt", 2, 3);
    write_dump(&samples, "run_a.txt", 1, 2);
    write_dump(&samples, "run_c.txt", 3, 4);

    let config = legacy_in(root.path());
    let result = pipeline::run_and_write(&config).unwrap();

    assert_eq!(result.experimental.names(), vec!["run_a.txt", "run_b.txt", "run_c.txt"]);
    assert_eq!(result.ingest.as_ref().unwrap().total_rejected(), 9);

    let results = root.path().join("results");
    assert_eq!(lines(results.join("coherence_results.txt")).len(), 6);
    assert_eq!(lines(results.join("dtw_results.txt")).len(), 6);
    assert_eq!(lines(results.join("kstest_results.txt")).len(), 6);
    assert_eq!(lines(results.join("cluster_results.txt")).len(), 5);
    assert_eq!(lines(results.join("fourier_theoretical_results.txt")).len(), 2);
    assert_eq!(lines(results.join("fourier_experimental_results.txt")).len(), 3);
    assert_eq!(lines(results.join("wavelet_experimental_results.txt")).len(), 3);

    let xcorr = lines(results.join("xcorr_results.txt"));
    assert_eq!(xcorr.len(), 6);
    assert_eq!(xcorr[0].split(", ").count(), 255);

    // Legacy comparator set has no R² / Pearson.
    assert!(!results.join("pearson_results.txt").exists());

    let sanitised = lines(root.path().join("sanitised_data.txt"));
    assert_eq!(sanitised.len(), 3);
    assert!(sanitised[0].starts_with('[') && sanitised[0].ends_with(']'));

    let manifest_text = std::fs::read_to_string(results.join("manifest.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest_text).unwrap();
    assert_eq!(manifest["files"].as_array().unwrap().len(), 9);
    assert_eq!(manifest["experimental"][1], "run_b.txt");
}

#[test]
fn sanitised_input_runs_the_full_suite() {
    let root = tempfile::tempdir().unwrap();
    let sanitised = root.path().join("sanitised_data.txt");
    let reference = root.path().join("reference.txt");
    std::fs::write(
        &sanitised,
        "[1.0, 3.0, 2.0, 5.0]\n[4.0, 3.0, 2.0, 1.0]\n[0.0, 2.0, 2.0, 7.0]\n",
    )
    .unwrap();
    std::fs::write(&reference, "[1.0, 2.0, 3.0, 4.0]\n[2.0, 9.0, 1.0, 0.5]\n").unwrap();

    let config = Config {
        input: InputSource::Sanitised { path: sanitised },
        reference: ReferenceSource::File { path: reference },
        results_dir: root.path().join("results"),
        sanitised_output: None,
        ..Config::revised()
    };
    let result = pipeline::run_and_write(&config).unwrap();

    assert!(result.averaged.is_none());
    assert_eq!(result.outputs.len(), 11);
    let pearson = lines(root.path().join("results").join("pearson_results.txt"));
    assert_eq!(pearson.len(), 6);
    for line in pearson {
        let r: f64 = line.parse().unwrap();
        assert!((-1.0..=1.0).contains(&r));
    }
    let clusters = lines(root.path().join("results").join("cluster_results.txt"));
    assert_eq!(clusters.len(), 5);
    // Reference-seeded centroids: reference profiles keep their own clusters.
    assert_eq!(clusters[0], "0");
    assert_eq!(clusters[1], "1");
}

#[test]
fn failed_run_leaves_previous_results_untouched() {
    let root = tempfile::tempdir().unwrap();
    let samples = root.path().join("SamplesOld");
    std::fs::create_dir(&samples).unwrap();
    write_dump(&samples, "run_a.txt", 1, 2);

    let config = legacy_in(root.path());
    pipeline::run_and_write(&config).unwrap();
    let before = std::fs::read_to_string(root.path().join("results/dtw_results.txt")).unwrap();

    // Header only: nothing survives filtering.
    std::fs::write(samples.join("run_b.txt"), HEADER).unwrap();
    let err = pipeline::run_and_write(&config).unwrap_err();
    assert!(matches!(err, AnalysisError::DegenerateInput { ref what, .. } if what == "run_b.txt"));

    let after = std::fs::read_to_string(root.path().join("results/dtw_results.txt")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn shape_mismatch_names_the_pair() {
    let root = tempfile::tempdir().unwrap();
    let sanitised = root.path().join("s.txt");
    std::fs::write(&sanitised, "[0.0, 1.0, 0.5, 0.2]\n[0.0, 1.0, 0.5]\n").unwrap();

    let config = Config {
        input: InputSource::Sanitised { path: sanitised },
        comparators: vec![ComparatorKind::CrossCorrelation, ComparatorKind::Dtw],
        results_dir: root.path().join("results"),
        ..Config::legacy()
    };
    let reference = ProfileSet::from_arrays("t", vec![vec![1.0, 0.0, 1.0, 0.0]]);
    let (experimental, _) = pipeline::load_experimental(&config).unwrap();

    let err = pipeline::compare(&config, &reference, &experimental).unwrap_err();
    match err {
        AnalysisError::ShapeMismatch {
            comparator,
            reference,
            experimental,
            ..
        } => {
            assert_eq!(comparator, "dtw");
            assert_eq!((reference, experimental), (0, 1));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!root.path().join("results").exists());
}

#[test]
fn constant_reference_is_rejected() {
    let config = Config::legacy();
    let reference = ProfileSet::from_arrays("t", vec![vec![2.0; 8]]);
    let experimental =
        ProfileSet::from_arrays("e", vec![vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]]);
    assert!(matches!(
        pipeline::compare(&config, &reference, &experimental),
        Err(AnalysisError::DegenerateInput { .. })
    ));
}

#[test]
fn warping_mode_tolerates_unequal_lengths() {
    let config = Config {
        comparators: vec![ComparatorKind::Dtw],
        dtw_mode: DtwMode::Warping,
        ..Config::legacy()
    };
    let reference = ProfileSet::from_arrays("t", vec![vec![0.0, 1.0, 0.0]]);
    let experimental = ProfileSet::from_arrays("e", vec![vec![0.0, 0.0, 1.0, 0.0]]);
    let result = pipeline::compare(&config, &reference, &experimental).unwrap();
    assert_eq!(result.outputs[0].values, vec![ResultValue::Scalar(0.0)]);
}

#[test]
fn revised_preset_runs_from_raw_dumps() {
    let root = tempfile::tempdir().unwrap();
    let samples = root.path().join("Samples");
    std::fs::create_dir(&samples).unwrap();
    let apd = revised_window(1);
    write_revised_dump(&samples, "APD_ch1.txt", &apd, 3);
    write_revised_dump(&samples, "PMT_ch2.txt", &revised_window(2), 3);
    write_revised_dump(&samples, "PMT_ch3.txt", &revised_window(3), 2);

    let config = Config {
        input: InputSource::Samples { dir: samples },
        sanitised_output: Some(root.path().join("sanitised_data.txt")),
        results_dir: root.path().join("results"),
        ..Config::revised()
    };
    let result = pipeline::run_and_write(&config).unwrap();

    assert!(result.reference.iter().all(|p| p.len() == 1500));
    assert!(result.experimental.iter().all(|p| p.len() == 1500));
    assert_eq!(result.ingest.as_ref().unwrap().total_rejected(), 16);

    let averaged = result.averaged.as_ref().unwrap();
    let inverted: Vec<f64> = apd.iter().map(|&v| f64::from(4096 - v)).collect();
    assert_eq!(averaged.profiles[0].name, "APD_ch1.txt");
    assert_eq!(averaged.profiles[0].values, inverted);
    let plain: Vec<f64> = revised_window(2).iter().map(|&v| f64::from(v)).collect();
    assert_eq!(averaged.profiles[1].values, plain);

    let results = root.path().join("results");
    for file in [
        "coherence_results.txt",
        "xcorr_results.txt",
        "dtw_results.txt",
        "fourier_theoretical_results.txt",
        "fourier_experimental_results.txt",
        "wavelet_theoretical_results.txt",
        "wavelet_experimental_results.txt",
        "cluster_results.txt",
        "kstest_results.txt",
        "rsquare_results.txt",
        "pearson_results.txt",
    ] {
        assert!(results.join(file).exists(), "{file} missing");
    }
    assert_eq!(lines(results.join("pearson_results.txt")).len(), 6);
    assert_eq!(lines(results.join("cluster_results.txt")).len(), 5);
}

#[test]
fn reference_shorter_than_window_is_rejected_up_front() {
    let root = tempfile::tempdir().unwrap();
    let reference = root.path().join("reference.txt");
    std::fs::write(&reference, "[0.0, 1.0, 0.5, 0.25]\n").unwrap();

    let config = Config {
        // Never read: the reference is checked first.
        input: InputSource::Samples {
            dir: root.path().join("missing"),
        },
        reference: ReferenceSource::File { path: reference },
        results_dir: root.path().join("results"),
        ..Config::revised()
    };
    let err = pipeline::run_and_write(&config).unwrap_err();
    match err {
        AnalysisError::InvalidConfig(msg) => {
            assert!(msg.starts_with("dtw:"), "{msg}");
            assert!(msg.contains("window_size is 1500"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!root.path().join("results").exists());
}
