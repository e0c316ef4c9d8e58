//! Integration tests for job files and the runner.

use u_guillotine_benchmark::{
    BenchmarkConfig, BenchmarkRunner, BenchmarkResult, Job, SyntheticGenerator, SyntheticJobs,
};
use u_guillotine_core::ErrorCode;

#[test]
fn test_synthetic_jobs_run() {
    let runner = BenchmarkRunner::new(BenchmarkConfig::new().with_progress(false));
    let report = runner.run_jobs(&SyntheticJobs::all(42));

    assert_eq!(report.runs.len(), SyntheticJobs::names().len());
    for run in &report.runs {
        assert_eq!(run.code, ErrorCode::None, "{} failed: {:?}", run.job, run.error);
        assert!(run.boxes_placed > 0);
        assert!(run.utilization > 0.0 && run.utilization <= 1.0 + 1e-9);
    }

    let oversized = report
        .runs
        .iter()
        .find(|r| r.job == "synthetic_oversized")
        .unwrap();
    assert!(oversized.boxes_placed < oversized.boxes_requested);
}

#[test]
fn test_job_file_to_report() {
    let dir = std::env::temp_dir().join("u_guillotine_bench_test");
    std::fs::create_dir_all(&dir).unwrap();
    let job_path = dir.join("furniture.json");
    let report_path = dir.join("report.json");
    let csv_path = dir.join("report.csv");

    SyntheticGenerator::with_seed(9)
        .furniture(5)
        .save(&job_path)
        .unwrap();
    let job = Job::load(&job_path).unwrap();

    let runner = BenchmarkRunner::new(
        BenchmarkConfig::new()
            .with_progress(false)
            .with_layout(true),
    );
    let report = runner.run_jobs(&[job]);
    report.save_json(&report_path).unwrap();
    report.save_csv(&csv_path).unwrap();

    let loaded: BenchmarkResult =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(loaded.runs.len(), 1);
    assert!(loaded.runs[0].layout.is_some());

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 2);

    let _ = std::fs::remove_dir_all(&dir);
}
