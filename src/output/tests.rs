//! Tests for output formatting

use crate::models::analysis::{AnalysisResult, DetectionResult, ReviewItem, ReviewReason};
use crate::models::dependency::DependencyRecord;
use crate::models::file_record::FileRecord;
use crate::models::removal::{
    FailedItem, RemovalDetails, RemovalHistory, RemovalReport, RemovalSummary, RollbackResult,
};
use crate::output::{
    create_formatter, save_report, CsvFormatter, FileWriter, Formatter, JsonFormatter,
    OutputWriter, TextFormatter,
};
use crate::models::config::OutputFormat;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn sample_analysis() -> AnalysisResult {
    let mut main = FileRecord::new("src/main.ts", 120);
    main.is_used = true;
    let mut a = FileRecord::new("src/a.ts", 80);
    a.is_used = true;
    a.add_referrer(&PathBuf::from("src/main.ts"));
    let b = FileRecord::new("src/b.ts", 2048);

    let mut react = DependencyRecord::new("react", "^18.0.0", false);
    react.is_used = true;
    react.usage_locations = vec![PathBuf::from("src/main.ts")];
    let lodash = DependencyRecord::new("lodash", "^4.17.21", false);

    AnalysisResult {
        files: vec![main, a, b],
        dependencies: vec![react, lodash],
        total_files: 3,
        total_size: 2248,
        unused_files: vec![PathBuf::from("src/b.ts")],
        unused_dependencies: vec!["lodash".to_string()],
        entry_points: vec![PathBuf::from("src/main.ts")],
        import_edges: Vec::new(),
        warnings: Vec::new(),
        analyzed_at: chrono::Utc::now(),
        duration_ms: 12,
    }
}

fn sample_report() -> RemovalReport {
    RemovalReport {
        success: false,
        dry_run: false,
        summary: RemovalSummary {
            total_analyzed: 3,
            total_unused: 2,
            total_removed: 1,
            total_skipped: 0,
            total_failed: 1,
            space_saved: 2048,
        },
        details: RemovalDetails {
            removed: vec![PathBuf::from("src/b.ts")],
            failed: vec![FailedItem::new("src/c.ts", "File does not exist: src/c.ts")],
            ..RemovalDetails::default()
        },
        pre_validation: None,
        post_validation: None,
    }
}

#[test]
fn test_text_analysis() {
    let analysis = sample_analysis();

    let normal = TextFormatter::new(false, false, false).format_analysis(&analysis).unwrap();
    assert!(normal.contains("Project Analysis"));
    assert!(normal.contains("Total files: 3"));
    assert!(normal.contains("Unused files: 1 (2 KB)"));
    assert!(normal.contains("  src/b.ts (2 KB)"));
    assert!(normal.contains("  lodash"));
    assert!(!normal.contains("File usage:"));

    let verbose = TextFormatter::new(false, true, false).format_analysis(&analysis).unwrap();
    assert!(verbose.contains("File usage:"));
    assert!(verbose.contains("referenced by: src/main.ts"));

    let quiet = TextFormatter::new(false, false, true).format_analysis(&analysis).unwrap();
    assert_eq!(quiet, "src/b.ts\n");
}

#[test]
fn test_text_without_colors_has_no_escape_codes() {
    let output = TextFormatter::new(false, true, false)
        .format_removal(&sample_report())
        .unwrap();
    assert!(!output.contains('\u{1b}'));
    assert!(output.contains("Files removed: 1"));
    assert!(output.contains("src/c.ts: File does not exist: src/c.ts"));
    assert!(output.contains("Completed with problems"));
}

#[test]
fn test_text_detection_shows_reasons() {
    let analysis = sample_analysis();
    let detection = DetectionResult {
        unused_files: vec![PathBuf::from("src/b.ts"), PathBuf::from("src/app.config.ts")],
        safe_to_remove: vec![PathBuf::from("src/b.ts")],
        requires_review: vec![ReviewItem {
            file: PathBuf::from("src/app.config.ts"),
            reason: ReviewReason::Configuration,
            size: 10,
        }],
        analysis,
    };

    let output = TextFormatter::new(false, false, false)
        .format_detection(&detection)
        .unwrap();
    assert!(output.contains("Safe to remove: 1"));
    assert!(output.contains("Configuration file - verify not needed"));
}

#[test]
fn test_json_analysis() {
    let output = JsonFormatter::new(true).format_analysis(&sample_analysis()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(parsed["total_files"], 3);
    assert_eq!(parsed["unused_files"][0], "src/b.ts");
    assert_eq!(parsed["unused_dependencies"][0], "lodash");
    assert_eq!(parsed["files"].as_array().map(|f| f.len()), Some(3));
}

#[test]
fn test_csv_outputs() {
    let analysis = CsvFormatter.format_analysis(&sample_analysis()).unwrap();
    let lines: Vec<&str> = analysis.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Path,Size (bytes),Used"));
    assert_eq!(lines[2], "src/a.ts,80,true,false,src/main.ts,");

    let removal = CsvFormatter.format_removal(&sample_report()).unwrap();
    assert!(removal.contains("src/b.ts,removed,"));
    assert!(removal.contains("src/c.ts,failed,File does not exist: src/c.ts"));

    let rollback = CsvFormatter
        .format_rollback(&RollbackResult {
            success: true,
            restored: vec![PathBuf::from("src/b.ts")],
            failed: Vec::new(),
        })
        .unwrap();
    assert_eq!(rollback, "Path,Status,Error\nsrc/b.ts,restored,\n");
}

#[test]
fn test_history_formats() {
    let history = RemovalHistory {
        removed_files: Vec::new(),
        backed_up_files: vec![PathBuf::from("src/b.ts")],
        backup_dir: PathBuf::from(".cleanup-backup"),
    };

    let text = create_formatter(OutputFormat::Text, false, false, false)
        .format_history(&history)
        .unwrap();
    assert!(text.contains("Backed up files: 1"));

    let csv = CsvFormatter.format_history(&history).unwrap();
    assert!(csv.contains("src/b.ts,.cleanup-backup/src/b.ts"));
}

#[test]
fn test_file_writer_and_report() {
    let temp_dir = tempdir().unwrap();

    let file_path = temp_dir.path().join("output.txt");
    FileWriter::new(&file_path).write("Test content").unwrap();
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "Test content");

    let report_path = temp_dir.path().join("cleanup-analysis-report.json");
    save_report(&report_path, &sample_analysis()).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(parsed["total_size"], 2248);
}

#[test]
fn test_file_writer_missing_directory() {
    let temp_dir = tempdir().unwrap();
    let writer = FileWriter::new(temp_dir.path().join("missing").join("out.txt"));
    assert!(writer.write("x").is_err());
}
