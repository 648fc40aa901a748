#![allow(clippy::disallowed_methods, clippy::print_stderr)]

use std::{
    fs,
    io::Write,
    path::Path,
    process::{Command, Stdio},
    sync::OnceLock,
};

use amdify::{
    ConversionOutput, Converter,
    bundle::REQUIRE_SHIM,
    config::{Config, ConvertOptions},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Check if a `node` binary is on the PATH.
fn node_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        Command::new("node")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    })
}

macro_rules! skip_if_no_node {
    () => {
        if !node_available() {
            eprintln!("Skipping test: node not available");
            return;
        }
    };
}

/// Run `script` as an ES module (strict mode, no CommonJS `require` in scope,
/// top-level `this` undefined) and parse the JSON it prints.
fn run_module(script: &str) -> Value {
    let mut child = Command::new("node")
        .arg("--input-type=module")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run node");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("Failed to write script");

    let output = child.wait_with_output().expect("Failed to wait for node");
    assert!(
        output.status.success(),
        "Node script failed:\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Node printed invalid JSON")
}

#[test]
fn test_shim_loader_semantics() {
    skip_if_no_node!();

    let script = format!(
        r#"{REQUIRE_SHIM}
var order = [];
define("d", [], function () {{ order.push("d"); return {{ id: "d" }}; }});
define("b", ["d"], function (d) {{ order.push("b"); return d; }});
define("c", ["d"], function (d) {{ order.push("c"); return d; }});
define("x", ["y"], function () {{ return 1; }});
define("y", ["x"], function () {{ return 2; }});

function failure(names) {{
    try {{
        require(names, function () {{}});
        return null;
    }} catch (err) {{
        return err.message;
    }}
}}

var report = require(["b", "c", "exports", "exports"], function (b, c, e1, e2) {{
    order.push("entry");
    return {{
        shared: b === c,
        freshExports: e1 !== e2 && Object.keys(e1).length === 0
    }};
}});
report.order = order;
report.unknown = failure(["nope"]);
report.reentrant = failure(["x"]);
console.log(JSON.stringify(report));
"#
    );

    assert_eq!(
        run_module(&script),
        json!({
            "shared": true,
            "freshExports": true,
            "order": ["d", "b", "c", "entry"],
            "unknown": "Module \"nope\" is not defined",
            "reentrant": "Module \"x\" requires itself while loading",
        })
    );
}

fn create_test_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_generated_bundle_runs_entry_last() {
    skip_if_no_node!();

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_test_file(
        &root.join("a.js"),
        "var b = require('./b'); var c = require('./c');\nglobalThis.order.push('a');\nglobalThis.result = { shared: b === c, order: globalThis.order };",
    );
    create_test_file(&root.join("b.js"), "module.exports = require('./d');");
    create_test_file(&root.join("c.js"), "module.exports = require('./d');");
    create_test_file(
        &root.join("d.js"),
        "globalThis.order.push('d');\nmodule.exports = { id: 'd' };",
    );

    let settings = ConvertOptions {
        input: Some(root.join("a.js")),
        root: Some(root.to_path_buf()),
        bundle: true,
        stdout: true,
        ..ConvertOptions::default()
    }
    .validate(&Config::default(), root)
    .unwrap();
    let ConversionOutput::Bundle { code, .. } = Converter::new(&settings).unwrap().convert().unwrap()
    else {
        panic!("expected a bundle");
    };

    let script = format!(
        "globalThis.order = [];\n{code}\nconsole.log(JSON.stringify(globalThis.result));\n"
    );
    assert_eq!(
        run_module(&script),
        json!({ "shared": true, "order": ["d", "a"] })
    );
}
