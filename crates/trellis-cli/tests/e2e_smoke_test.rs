use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use trellis_cli::{Args, run};

/// Collects all .graphml files from a directory
fn collect_graphml_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("graphml")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &Path, output: PathBuf, strict: bool) -> Args {
    Args {
        input: input.to_path_buf(),
        output,
        config: None,
        margin: None,
        log_level: "off".to_string(),
        strict,
    }
}

/// Reads a written SVG and checks that it is well-formed XML.
fn read_svg(path: &Path) -> String {
    let svg = fs::read_to_string(path).unwrap();
    if let Err(err) = roxmltree::Document::parse(&svg) {
        panic!("{} is not well-formed: {err}", path.display());
    }
    svg
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_graphml_files(demos_path());
    assert!(!demos.is_empty(), "No demos found in demos/");

    let mut failed = Vec::new();
    for demo in &demos {
        let output = temp_dir
            .path()
            .join(format!("{}.svg", demo.file_stem().unwrap().to_string_lossy()));

        match run(&args_for(demo, output.clone(), true)) {
            Ok(report) if report.written => {
                let svg = read_svg(&output);
                assert!(svg.contains("<svg"), "{} produced no SVG", demo.display());
            }
            Ok(report) => failed.push(format!(
                "{}: {} diagnostics",
                demo.display(),
                report.diagnostics.len()
            )),
            Err(err) => failed.push(format!("{}: {err}", demo.display())),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for failure in &failed {
            eprintln!("  - {failure}");
        }
        panic!("{} demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_graphml_files(demos_path().join("errors"));
    assert!(!demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();
    for demo in &demos {
        let output = temp_dir
            .path()
            .join(format!("error_{}.svg", demo.file_stem().unwrap().to_string_lossy()));

        let result = run(&args_for(demo, output.clone(), true));
        if matches!(result, Ok(ref report) if report.written) {
            unexpectedly_succeeded.push(demo.clone());
        }
        assert!(!output.exists(), "{} wrote output", demo.display());
    }

    if !unexpectedly_succeeded.is_empty() {
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_lenient_mode_writes_degraded_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("errors").join("dangling_edge.graphml");
    let output = temp_dir.path().join("dangling.svg");

    let report = run(&args_for(&input, output.clone(), false)).expect("run failed");
    assert!(report.written);
    assert!(report.has_errors());
    assert!(read_svg(&output).contains("<svg"));
}

#[test]
fn e2e_config_file_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[render]\nmargin = 0.0\n\n[style]\nbackground_color = \"white\"\n").unwrap();
    let output = temp_dir.path().join("basic.svg");

    let mut args = args_for(&demos_path().join("basic.graphml"), output.clone(), true);
    args.config = Some(config);
    run(&args).expect("run failed");

    let svg = read_svg(&output);
    assert!(svg.contains("<rect"));
}

#[test]
fn e2e_margin_flag_overrides_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("square.graphml");
    fs::write(
        &input,
        r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:y="http://www.yworks.com/xml/graphml">
  <graph id="G" edgedefault="directed">
    <node id="n0"><data key="d0"><y:ShapeNode><y:Geometry x="0" y="0" width="10" height="10"/></y:ShapeNode></data></node>
  </graph>
</graphml>"#,
    )
    .unwrap();
    let output = temp_dir.path().join("square.svg");

    let mut args = args_for(&input, output.clone(), true);
    args.margin = Some(3.0);
    let report = run(&args).expect("run failed");
    assert!(report.written);

    let svg = read_svg(&output);
    assert!(svg.contains("viewBox=\"-3 -3 16 16\""), "{svg}");
}
