use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use serde_json::Value;
use tempfile::tempdir;

fn riskmeasures(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_riskmeasures"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn missing_required_flag_exits_2() {
    let dir = tempdir().unwrap();

    let output = riskmeasures(&["--B", "10"], dir.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    let output = riskmeasures(&["--N", "10"], dir.path());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_inputs_exit_2_before_simulating() {
    let dir = tempdir().unwrap();

    for args in [
        &["--N", "1", "--B", "10"][..],
        &["--N", "10", "--B", "1"],
        &["--N", "10", "--B", "10", "--x-sigma", "0"],
        &["--N", "10", "--B", "10", "--seed", "-4"],
    ] {
        let mut args = args.to_vec();
        args.extend(["--save-data", "data.csv"]);

        let output = riskmeasures(&args, dir.path());
        assert_eq!(output.status.code(), Some(2), "args: {args:?}");
        assert!(output.stdout.is_empty());
        assert!(!dir.path().join("data.csv").exists());
    }

    let output = riskmeasures(&["--N", "1", "--B", "10"], dir.path());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("N must be >= 2, got 1"), "stderr: {stderr}");
}

#[test]
fn prints_result_json() {
    let dir = tempdir().unwrap();
    let output = riskmeasures(&["--N", "200", "--B", "300", "--seed", "17"], dir.path());
    assert!(output.status.success());

    let result = stdout_json(&output);
    let inputs = &result["inputs"];
    assert_eq!(inputs["N"], 200);
    assert_eq!(inputs["B"], 300);
    assert_eq!(inputs["beta0"], 1.0);
    assert_eq!(inputs["beta1"], 2.0);
    assert_eq!(inputs["x_sigma"], 1.0);
    assert_eq!(inputs["eps_sigma"], 1.0);
    assert_eq!(inputs["seed"], 17);
    assert_eq!(inputs["parallel"], false);
    assert_eq!(inputs["n_jobs"], 1);

    let beta_hat = result["outputs"]["beta_hat"].as_array().unwrap();
    assert_eq!(beta_hat.len(), 2);
    assert!((beta_hat[1].as_f64().unwrap() - 2.).abs() < 0.5);

    let se = result["outputs"]["se_boot_beta1"].as_f64().unwrap();
    assert!(se > 0. && se < 0.5);

    let meta = &result["meta"];
    assert!(meta["timestamp_utc"].is_string());
    assert!(meta["runtime_ms"].is_u64());
    assert_eq!(meta["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn same_seed_same_outputs() {
    let dir = tempdir().unwrap();
    let args = ["--N", "100", "--B", "100", "--seed", "42", "--parallel", "--n-jobs", "3"];

    let a = stdout_json(&riskmeasures(&args, dir.path()));
    let b = stdout_json(&riskmeasures(&args, dir.path()));
    assert_eq!(a["outputs"], b["outputs"]);
}

#[test]
fn writes_out_and_data_files() {
    let dir = tempdir().unwrap();
    let output = riskmeasures(
        &[
            "--N", "50", "--B", "20", "--seed", "1", "--out", "res/result.json", "--save-data",
            "res/data.csv",
        ],
        dir.path(),
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let result: Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("res/result.json")).unwrap())
            .unwrap();
    assert_eq!(result["inputs"]["N"], 50);

    let csv = fs::read_to_string(dir.path().join("res/data.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("x,y"));
    assert_eq!(lines.count(), 50);
}

#[test]
fn log_creates_timestamped_artifacts() {
    let dir = tempdir().unwrap();
    let output = riskmeasures(&["--N", "30", "--B", "20", "--seed", "3", "--log"], dir.path());
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let runs: Vec<_> = fs::read_dir(dir.path().join("artifacts"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(runs.len(), 1);

    let name = runs[0].file_name().unwrap().to_str().unwrap().to_string();
    assert_eq!(name.len(), "YYYYmmdd_HHMMSS".len());
    assert_eq!(name.as_bytes()[8], b'_');
    assert!(runs[0].join("data.csv").is_file());
    assert!(runs[0].join("result.json").is_file());
}

#[test]
fn external_data() {
    let dir = tempdir().unwrap();
    let rows: String = (0..40)
        .map(|i| {
            let x = f64::from(i) / 4.;
            let wiggle = if i % 3 == 0 { 0.2 } else { -0.1 };
            format!("{x},{}\n", 0.5 - x + wiggle)
        })
        .collect();
    fs::write(dir.path().join("in.csv"), format!("x,y\n{rows}")).unwrap();

    let output = riskmeasures(&["--data", "in.csv", "--B", "100", "--seed", "9"], dir.path());
    assert!(output.status.success());

    let result = stdout_json(&output);
    assert_eq!(result["inputs"]["N"], 40);
    assert_eq!(result["inputs"]["data"], "in.csv");
    assert!((result["outputs"]["beta_hat"][1].as_f64().unwrap() + 1.).abs() < 0.05);
}

#[test]
fn bad_external_data() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("nan.csv"), "x,y\n1,2\n2,NaN\n3,4\n").unwrap();
    let output = riskmeasures(&["--data", "nan.csv", "--B", "10"], dir.path());
    assert_eq!(output.status.code(), Some(2));

    fs::write(dir.path().join("named.csv"), "a,b\n1,2\n2,3\n3,5\n").unwrap();
    let output = riskmeasures(&["--data", "named.csv", "--B", "10"], dir.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("named x and y"));

    fs::write(dir.path().join("flat.csv"), "x,y\n2,1\n2,2\n2,3\n").unwrap();
    let output = riskmeasures(&["--data", "flat.csv", "--B", "10"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("singular"));
}
