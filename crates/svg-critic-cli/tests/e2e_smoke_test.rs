use std::{fs, path::PathBuf};

use tempfile::tempdir;

use svg_critic_cli::{Args, run};

/// Collects all .svg files from a directory
fn collect_svg_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("svg")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|crates| crates.parent())
        .expect("crate sits two levels below the workspace root")
        .join("demos")
}

fn args(input: &PathBuf, output_dir: &PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output_dir: Some(output_dir.to_string_lossy().to_string()),
        iterations: None,
        threshold: None,
        analyze_only: false,
        improver_command: None,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_svg_files(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_dir = temp_dir
            .path()
            .join(demo_path.file_stem().expect("file name").to_string_lossy().to_string());

        match run(&args(demo_path, &output_dir)) {
            Ok(()) => {
                let summary = output_dir.join("summary.json");
                if !summary.is_file() {
                    failed_demos.push((demo_path.clone(), "summary.json missing".to_string()));
                }
            }
            Err(e) => failed_demos.push((demo_path.clone(), e.to_string())),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_svg_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_dir = temp_dir.path().join("error_output");
        if run(&args(demo_path, &output_dir)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!("All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_loop_writes_iteration_files() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("crowded.svg");
    fs::write(
        &input,
        r#"<svg width="300" height="300">
            <g id="left"><rect id="a" x="10" y="10" width="100" height="100" fill="purple"/></g>
            <g id="right"><rect id="b" x="50" y="50" width="100" height="100" fill="olive"/></g>
        </svg>"#,
    )
    .expect("input written");
    let output_dir = temp_dir.path().join("out");

    let mut args = args(&input, &output_dir);
    args.iterations = Some(3);
    args.threshold = Some(100);
    run(&args).expect("loop run succeeds");

    for name in [
        "crowded.svg",
        "crowded_iter1.svg",
        "crowded_iter2.svg",
        "evaluation_1.json",
        "evaluation_1.md",
        "evaluation_3.json",
        "evaluation_3.md",
        "summary.json",
        "progress_report.html",
    ] {
        assert!(output_dir.join(name).is_file(), "{name} should be written");
    }
    assert!(!output_dir.join("evaluation_4.json").exists());

    let summary = fs::read_to_string(output_dir.join("summary.json")).expect("summary");
    assert!(summary.contains(r#""iterations": 3"#));
    assert!(summary.contains(r#""stop_reason": "budget_exhausted""#));
    assert!(summary.contains("crowded_iter2.svg"));

    let page = fs::read_to_string(output_dir.join("progress_report.html")).expect("progress page");
    assert!(page.contains("<p>Input SVG: crowded.svg</p>"));
    for (n, svg) in [(1, "crowded.svg"), (2, "crowded_iter1.svg"), (3, "crowded_iter2.svg")] {
        let evaluation =
            fs::read_to_string(output_dir.join(format!("evaluation_{n}.json"))).expect("evaluation");
        let score = overall_score(&evaluation);
        assert!(page.contains(&format!("<h2>Iteration {n}</h2>")));
        assert!(page.contains(&format!("<div class='score'>{score}/100</div>")));
        assert!(page.contains(&format!("<object data='{svg}'")));
    }
}

fn overall_score(evaluation_json: &str) -> u64 {
    let value: serde_json::Value = serde_json::from_str(evaluation_json).expect("valid JSON");
    value["overall_score"].as_u64().expect("overall_score is a number")
}

#[test]
fn e2e_analyze_only_writes_nothing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("single.svg");
    fs::write(&input, r#"<svg width="100" height="100"><rect width="10" height="10"/></svg>"#)
        .expect("input written");
    let output_dir = temp_dir.path().join("out");

    let mut args = args(&input, &output_dir);
    args.analyze_only = true;
    run(&args).expect("analysis succeeds");
    assert!(!output_dir.exists());
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("absent.svg");
    let output_dir = temp_dir.path().join("out");
    assert!(run(&args(&input, &output_dir)).is_err());
}

#[cfg(unix)]
#[test]
fn e2e_failing_improver_command_falls_back() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("diagram.svg");
    fs::write(&input, r#"<svg width="100" height="100"><rect width="10" height="10"/></svg>"#)
        .expect("input written");
    let output_dir = temp_dir.path().join("out");

    let mut args = args(&input, &output_dir);
    args.iterations = Some(2);
    args.threshold = Some(100);
    args.improver_command = Some("false".to_string());
    run(&args).expect("fallback keeps the loop running");

    let summary = fs::read_to_string(output_dir.join("summary.json")).expect("summary");
    assert!(summary.contains(r#""kind": "local_engine""#));
}
