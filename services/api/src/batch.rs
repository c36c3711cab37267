use crate::infra::load_config;
use admission_ranker::error::AppError;
use admission_ranker::telemetry;
use admission_ranker::workflows::admissions::{
    summarize, AdmissionPipeline, AdmissionResults, ApplicantSheet, GroupSummaryView,
    ReportTable, ScoringConfig, Stage,
};
use admission_ranker::workflows::import::{PreselectionImporter, SheetImporter};
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ExamStageArgs {
    /// Intake CSV exports; each file stem names its admission period
    #[arg(long = "input", required = true, num_args = 1..)]
    pub(crate) inputs: Vec<PathBuf>,
    /// Destination CSV for the enriched records
    #[arg(long, default_value = "exam_stage_results.csv")]
    pub(crate) output: PathBuf,
    /// Scoring policy JSON file (overrides APP_SCORING_POLICY)
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct InterviewStageArgs {
    /// Intake CSV exports including interview scores
    #[arg(long = "input", required = true, num_args = 1..)]
    pub(crate) inputs: Vec<PathBuf>,
    /// Preselection list produced alongside the exam stage
    #[arg(long)]
    pub(crate) preselected: PathBuf,
    /// Destination CSV for the enriched records
    #[arg(long, default_value = "interview_stage_results.csv")]
    pub(crate) output: PathBuf,
    /// Scoring policy JSON file (overrides APP_SCORING_POLICY)
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct PolicyArgs {
    /// Scoring policy JSON file (overrides APP_SCORING_POLICY)
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
}

pub(crate) fn run_exam_stage(args: ExamStageArgs) -> Result<(), AppError> {
    let config = load_config(args.policy.as_deref())?;
    telemetry::init(&config.telemetry)?;

    let results = score_exam_stage(&args.inputs, &config.scoring)?;
    write_report(&results, &args.output)?;
    render_summary(&results, &args.output);
    Ok(())
}

pub(crate) fn run_interview_stage(args: InterviewStageArgs) -> Result<(), AppError> {
    let config = load_config(args.policy.as_deref())?;
    telemetry::init(&config.telemetry)?;

    let results = score_interview_stage(&args.inputs, &args.preselected, &config.scoring)?;
    write_report(&results, &args.output)?;
    render_summary(&results, &args.output);
    Ok(())
}

pub(crate) fn run_policy(args: PolicyArgs) -> Result<(), AppError> {
    let config = load_config(args.policy.as_deref())?;
    match &config.scoring_policy {
        Some(path) => println!("Scoring policy loaded from {}", path.display()),
        None => println!("Scoring policy: built-in defaults"),
    }
    println!("{}", serde_json::to_string_pretty(&config.scoring)?);
    Ok(())
}

pub(crate) fn score_exam_stage(
    inputs: &[PathBuf],
    scoring: &ScoringConfig,
) -> Result<AdmissionResults, AppError> {
    let sheets = load_sheets(inputs)?;
    let pipeline = AdmissionPipeline::new(scoring.clone())?;
    Ok(pipeline.run_exam_stage(&sheets)?)
}

pub(crate) fn score_interview_stage(
    inputs: &[PathBuf],
    preselected: &Path,
    scoring: &ScoringConfig,
) -> Result<AdmissionResults, AppError> {
    // The list is checked first so a missing stage 1 is reported before any sheet errors.
    let preselection = PreselectionImporter::from_path(preselected)?;
    let sheets = load_sheets(inputs)?;
    let pipeline = AdmissionPipeline::new(scoring.clone())?;
    Ok(pipeline.run_interview_stage(&sheets, &preselection)?)
}

fn load_sheets(inputs: &[PathBuf]) -> Result<Vec<ApplicantSheet>, AppError> {
    inputs
        .iter()
        .map(|path| SheetImporter::from_path(path).map_err(AppError::from))
        .collect()
}

fn write_report(results: &AdmissionResults, output: &Path) -> Result<(), AppError> {
    let table = ReportTable::from_results(results);
    let file = File::create(output)?;
    table.write_csv(BufWriter::new(file))?;
    info!(rows = table.len(), output = %output.display(), "report written");
    Ok(())
}

fn render_summary(results: &AdmissionResults, output: &Path) {
    let title = match results.stage {
        Stage::Exam => "Exam stage",
        Stage::Interview => "Interview stage",
    };
    println!(
        "{title}: {} groups, {} applicants -> {}",
        results.groups.len(),
        results.len(),
        output.display()
    );
    for summary in summarize(results) {
        println!("{}", summary_line(&summary));
    }
}

fn summary_line(summary: &GroupSummaryView) -> String {
    let mut line = format!(
        "  - {} / {} / {}: {} applicants | top {} mean {:.2} x {:.2} = threshold {:.2} | {} eligible, {} not approved",
        summary.period,
        summary.modality,
        summary.program,
        summary.applicants,
        summary.top_count,
        summary.top_decile_mean,
        summary.decile_weight,
        summary.admission_threshold,
        summary.eligible,
        summary.not_approved,
    );
    if let (Some(admitted), Some(evaluation), Some(preselected)) = (
        summary.admitted,
        summary.approved_evaluation,
        summary.preselected,
    ) {
        line.push_str(&format!(
            " | {admitted} admitted, {evaluation} approved for evaluation, {preselected} preselected"
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use admission_ranker::workflows::admissions::{ErrorCategory, FinalStatus};

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "admission-ranker-{label}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    fn write_sheet(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(format!("{name}.csv"));
        std::fs::write(
            &path,
            "per_num_doc,pos_codigo,modalidad,programa,total_aptitud,total_conocimiento,nota_entre\n\
73000001,101,ORDINARIO,MEDICINA,57,66.5,16\n\
73000002,102,ORDINARIO,MEDICINA,30,35,\n\
73000003,103,ORDINARIO,MEDICINA,48,56,12\n",
        )
        .expect("sheet written");
        path
    }

    #[test]
    fn exam_stage_scores_csv_inputs_and_writes_report() {
        let dir = scratch_dir("exam");
        let input = write_sheet(&dir, "2025-I");
        let output = dir.join("exam.csv");

        let results = score_exam_stage(&[input], &ScoringConfig::default()).expect("scores");
        write_report(&results, &output).expect("report written");

        let written = std::fs::read_to_string(&output).expect("report readable");
        let header = written.lines().next().expect("header row");
        assert!(header.starts_with("per_num_doc,pos_codigo,modalidad"));
        assert!(header.contains(",period,aptitude_normalized,"));
        assert!(written.contains("00000101"));
        assert_eq!(written.lines().count(), 4);

        let summary = summary_line(&summarize(&results)[0]);
        assert!(summary.contains("2025-I / ORDINARIO / MEDICINA"));
        assert!(summary.contains("2 eligible, 1 not approved"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn interview_stage_without_preselection_file_is_referential() {
        let dir = scratch_dir("missing-list");
        let input = write_sheet(&dir, "2025-I");

        let error = score_interview_stage(
            &[input],
            &dir.join("preselected.csv"),
            &ScoringConfig::default(),
        )
        .expect_err("stage 1 missing");

        assert_eq!(error.category(), Some(ErrorCategory::Referential));
        assert!(error
            .to_string()
            .contains("stage 1 must be processed before stage 2"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn interview_stage_applies_preselection_file() {
        let dir = scratch_dir("interview");
        let input = write_sheet(&dir, "2025-I");
        let list = dir.join("preselected.csv");
        std::fs::write(&list, "per_num_doc\n73000003\n73000002\n").expect("list written");

        let results = score_interview_stage(&[input], &list, &ScoringConfig::default())
            .expect("interview stage succeeds");

        let outcomes: Vec<(String, FinalStatus)> = results
            .applicants()
            .map(|applicant| {
                (
                    applicant.record.document_id.to_string(),
                    applicant.interview.expect("interview result").final_status,
                )
            })
            .collect();
        assert_eq!(
            outcomes,
            vec![
                ("73000001".to_string(), FinalStatus::Admitted),
                ("73000003".to_string(), FinalStatus::ApprovedEvaluation),
                ("73000002".to_string(), FinalStatus::NotApproved),
            ]
        );
        assert!(summary_line(&summarize(&results)[0]).contains("1 admitted, 1 approved for evaluation, 2 preselected"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
