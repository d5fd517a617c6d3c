// Copyright 2026 Docsim Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

fn docsim_cmd(config_root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docsim"));
    cmd.env("XDG_CONFIG_HOME", config_root);
    cmd.env("HOME", config_root);
    cmd.env("APPDATA", config_root);
    cmd
}

fn normalize_json(mut value: Value) -> Value {
    if let Some(stats) = value.get_mut("stats")
        && let Some(obj) = stats.as_object_mut()
    {
        obj.insert("took_ms".to_string(), json!(0));
    }
    value
}

fn run_json(cmd: &mut Command, cwd: &Path) -> Value {
    let output = cmd.current_dir(cwd).output().expect("run command");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("parse json")
}

fn assert_repeatable(args: &[&str], runs: usize, config_root: &Path, cwd: &Path) {
    let mut baseline: Option<Value> = None;
    for _ in 0..runs {
        let mut cmd = docsim_cmd(config_root);
        cmd.args(args);
        let json = normalize_json(run_json(&mut cmd, cwd));
        if let Some(ref expected) = baseline {
            assert_eq!(&json, expected);
        } else {
            baseline = Some(json);
        }
    }
}

#[test]
fn deterministic_outputs() {
    let config_temp = TempDir::new().expect("config tempdir");
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    fs::create_dir_all(root.join("docs")).expect("docs dir");
    fs::write(root.join("target.md"), "beta gamma delta\n").expect("write file");
    fs::write(root.join("docs/a.txt"), "alpha beta gamma\n").expect("write file");
    fs::write(root.join("docs/b.txt"), "beta gamma delta\n").expect("write file");
    fs::write(root.join("docs/c.md"), "gamma delta epsilon\n").expect("write file");
    fs::write(root.join("docs/d.md"), "delta gamma beta\n").expect("write file");

    assert_repeatable(
        &[
            "rank",
            "target.md",
            "docs",
            "--threshold",
            "0.1",
            "--metric",
            "semantic",
            "--json",
        ],
        10,
        config_temp.path(),
        root,
    );

    assert_repeatable(
        &["compare", "target.md", "docs/a.txt", "--json"],
        10,
        config_temp.path(),
        root,
    );
}
