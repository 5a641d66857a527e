// Integration tests for `colstat` / `colstat stats`.
// Run with: cargo test -p colstat-cli --test stats_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

/// Working directory with an empty settings file
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{}").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Name | Region | Amount, with one non-numeric amount
    fn sales_workbook(&self, name: &str) -> PathBuf {
        let path = self.path(name);
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "Name").unwrap();
        ws.write_string(0, 1, "Region").unwrap();
        ws.write_string(0, 2, "Amount").unwrap();
        let rows: [(&str, &str, Option<f64>); 4] = [
            ("a", "North", Some(10.0)),
            ("b", "South", Some(20.0)),
            ("c", "East", None),
            ("d", "West", Some(30.0)),
        ];
        for (i, (name, region, amount)) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            ws.write_string(r, 0, *name).unwrap();
            ws.write_string(r, 1, *region).unwrap();
            match amount {
                Some(v) => ws.write_number(r, 2, *v).unwrap(),
                None => ws.write_string(r, 2, "n/a").unwrap(),
            };
        }
        wb.save(&path).unwrap();
        path
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn colstat(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_colstat"));
        cmd.current_dir(self.dir.path());
        cmd.env("COLSTAT_CONFIG", self.path("settings.json"));
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.colstat().args(args).output().expect("run colstat")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ---------------------------------------------------------------------------
// Default run: input.xlsx, column C
// ---------------------------------------------------------------------------

#[test]
fn default_input_reports_column_c() {
    let fx = Fixture::new();
    fx.sales_workbook("input.xlsx");

    let output = fx.run(&[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.starts_with("Column Stats\n==============================\n"), "{}", text);
    assert!(text.contains("Loaded input.xlsx: 4 rows, 3 columns"), "{}", text);
    assert!(text.contains("Found 3 numeric values in column Amount"), "{}", text);
    assert!(text.contains("Data from column Amount: [10.0, 20.0, 30.0]"), "{}", text);
    assert!(text.contains("Number of values: 3"), "{}", text);
    assert!(text.contains("Average value: 20.00"), "{}", text);
    assert!(text.contains("Sum: 60.00"), "{}", text);
}

#[test]
fn stats_subcommand_matches_default() {
    let fx = Fixture::new();
    fx.sales_workbook("input.xlsx");

    let bare = fx.run(&[]);
    let explicit = fx.run(&["stats"]);
    assert!(explicit.status.success());
    assert_eq!(stdout(&bare), stdout(&explicit));
}

#[test]
fn explicit_path_argument() {
    let fx = Fixture::new();
    let path = fx.sales_workbook("sales.xlsx");

    let output = fx.run(&["stats", arg(&path)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Average value: 20.00"));
}

#[test]
fn settings_file_supplies_input_and_column() {
    let fx = Fixture::new();
    fx.sales_workbook("sales.xlsx");
    fx.write("settings.json", r#"{ "input": "sales.xlsx", "column": "Amount" }"#);

    let output = fx.run(&[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Loaded sales.xlsx"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_file_exits_3_without_results() {
    let fx = Fixture::new();

    let output = fx.run(&[]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("input.xlsx"), "{}", stderr(&output));
    assert!(stderr(&output).contains("not found"), "{}", stderr(&output));
    assert!(!stdout(&output).contains("Results"));
}

#[test]
fn directory_is_not_found() {
    let fx = Fixture::new();
    std::fs::create_dir(fx.path("input.xlsx")).unwrap();

    let output = fx.run(&[]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn corrupt_workbook_exits_4() {
    let fx = Fixture::new();
    fx.write("input.xlsx", "this is not a zip archive");

    let output = fx.run(&[]);
    assert_eq!(output.status.code(), Some(4), "stderr: {}", stderr(&output));
}

#[test]
fn two_column_file_exits_5() {
    let fx = Fixture::new();
    let path = fx.write("narrow.csv", "a,b\n1,2\n3,4\n");

    let output = fx.run(&["stats", arg(&path)]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("enough columns"), "{}", stderr(&output));
    assert!(!stdout(&output).contains("Results"));
}

#[test]
fn text_column_exits_6() {
    let fx = Fixture::new();
    let path = fx.write("words.csv", "a,b,c\n1,2,x\n3,4,y\n");

    let output = fx.run(&["stats", arg(&path)]);
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("no numeric data"), "{}", stderr(&output));
}

#[test]
fn unknown_header_exits_7_with_available_columns() {
    let fx = Fixture::new();
    let path = fx.sales_workbook("sales.xlsx");

    let output = fx.run(&["stats", arg(&path), "--column", "Price"]);
    assert_eq!(output.status.code(), Some(7));
    let err = stderr(&output);
    assert!(err.contains("Price"), "{}", err);
    assert!(err.contains("available columns: Name, Region, Amount"), "{}", err);
}

#[test]
fn out_of_range_column_is_usage_error() {
    let fx = Fixture::new();
    let path = fx.sales_workbook("sales.xlsx");

    let output = fx
        .colstat()
        .args(["stats", arg(&path), "--column", "18446744073709551615"])
        .env("RUST_LOG", "debug")
        .output()
        .expect("run colstat");
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("out of range"), "{}", stderr(&output));

    fx.write("settings.json", r#"{ "column": "18446744073709551615" }"#);
    let output = fx.run(&["stats", arg(&path)]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn bad_settings_file_is_usage_error() {
    let fx = Fixture::new();
    fx.sales_workbook("input.xlsx");
    fx.write("settings.json", "{ not json");

    let output = fx.run(&[]);
    assert_eq!(output.status.code(), Some(2));
}

// ---------------------------------------------------------------------------
// Column selection and headers
// ---------------------------------------------------------------------------

#[test]
fn select_by_header_and_letter() {
    let fx = Fixture::new();
    let path = fx.write("data.csv", "x,price,qty\n1,2.5,10\n2,3.5,20\n");

    let by_header = fx.run(&["stats", arg(&path), "--column", "price"]);
    assert!(by_header.status.success(), "stderr: {}", stderr(&by_header));
    assert!(stdout(&by_header).contains("Average value: 3.00"));

    let by_letter = fx.run(&["stats", arg(&path), "--column", "@B"]);
    assert_eq!(stdout(&by_header), stdout(&by_letter));

    let by_index = fx.run(&["stats", arg(&path), "-c", "1"]);
    assert_eq!(stdout(&by_header), stdout(&by_index));
}

#[test]
fn no_headers_counts_first_row_as_data() {
    let fx = Fixture::new();
    let path = fx.write("raw.csv", "1,2,3\n4,5,6\n");

    let output = fx.run(&["stats", arg(&path), "--no-headers"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Loaded"), "{}", text);
    assert!(text.contains("2 rows, 3 columns"), "{}", text);
    assert!(text.contains("Found 2 numeric values in column C"), "{}", text);
    assert!(text.contains("Average value: 4.50"), "{}", text);
}

// ---------------------------------------------------------------------------
// --json
// ---------------------------------------------------------------------------

#[test]
fn json_output_is_the_only_stdout() {
    let fx = Fixture::new();
    fx.sales_workbook("input.xlsx");

    let output = fx.run(&["stats", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["file"], "input.xlsx");
    assert_eq!(json["rows"], 4);
    assert_eq!(json["columns"], 3);
    assert_eq!(json["column"], "Amount");
    assert_eq!(json["count"], 3);
    assert_eq!(json["sum"], 60.0);
    assert_eq!(json["min"], 10.0);
    assert_eq!(json["max"], 30.0);
    assert_eq!(json["mean"], 20.0);
}
