use std::fs;

use tempfile::tempdir;

use cpuforge::{generate::Target, presets::Example};
use cpuforge_cli::{Args, Command, Outcome, run};

fn args(command: Command) -> Args {
    Args {
        command,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_examples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut failed = Vec::new();

    for example in Example::ALL {
        let design = temp_dir.path().join(format!("{example}.json"));
        let design_path = design.to_string_lossy().to_string();

        let written = run(&args(Command::Example {
            name: example,
            output: design_path.clone(),
        }));
        if let Err(err) = written {
            failed.push(format!("{example}: example: {err}"));
            continue;
        }

        match run(&args(Command::Validate {
            input: design_path.clone(),
        })) {
            Ok(Outcome::Success) => {}
            other => failed.push(format!("{example}: validate: {other:?}")),
        }

        for target in Target::ALL {
            let output = temp_dir
                .path()
                .join(format!("{example}.{}", target.extension()));
            let result = run(&args(Command::Generate {
                input: design_path.clone(),
                target: Some(target),
                output: Some(output.to_string_lossy().to_string()),
            }));

            match result {
                Ok(_) if fs::metadata(&output).is_ok_and(|m| m.len() > 0) => {}
                other => failed.push(format!("{example}: generate {target}: {other:?}")),
            }
        }
    }

    assert!(failed.is_empty(), "Failures:\n{}", failed.join("\n"));
}

#[test]
fn e2e_cyclic_design_fails_validation() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let design = temp_dir.path().join("cycle.json");
    fs::write(
        &design,
        r#"{
            "components": [
                { "id": "a", "type": "register", "position": { "x": 0, "y": 0 } },
                { "id": "b", "type": "register", "position": { "x": 200, "y": 0 } }
            ],
            "connections": [
                { "id": "c1", "from": { "component": "a", "point": "out" }, "to": { "component": "b", "point": "in" } },
                { "id": "c2", "from": { "component": "b", "point": "out" }, "to": { "component": "a", "point": "in" } }
            ]
        }"#,
    )
    .unwrap();

    let outcome = run(&args(Command::Validate {
        input: design.to_string_lossy().to_string(),
    }))
    .expect("Validation should run");

    match outcome {
        Outcome::ValidationFailed(report) => assert!(report.has_errors()),
        other => panic!("Expected validation failure, got {other:?}"),
    }
}

#[test]
fn e2e_invalid_document_is_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let design = temp_dir.path().join("broken.json");
    fs::write(&design, r#"{"components": []}"#).unwrap();

    let result = run(&args(Command::Validate {
        input: design.to_string_lossy().to_string(),
    }));

    assert!(matches!(result, Err(cpuforge::DesignError::InvalidFormat(_))));
}

#[test]
fn e2e_missing_input_is_io_error() {
    let result = run(&args(Command::Generate {
        input: "/nonexistent/design.json".to_string(),
        target: None,
        output: None,
    }));

    assert!(matches!(result, Err(cpuforge::DesignError::Io(_))));
}

#[test]
fn e2e_simulate_commands() {
    for line in ["ADD R1, R2", "load 0x10", "HALT", " "] {
        let command = line.split(' ').map(str::to_string).collect();
        let outcome = run(&args(Command::Simulate { command }));

        assert!(matches!(outcome, Ok(Outcome::Success)), "{line}: {outcome:?}");
    }
}
