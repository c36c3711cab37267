mod summary;
pub mod views;

pub use summary::summarize;
pub use views::{GroupSummaryView, ReportCell, ReportTable};

/// Derived columns appended after the intake columns on exam-stage reports.
pub const EXAM_STAGE_COLUMNS: [&str; 8] = [
    "aptitude_normalized",
    "knowledge_normalized",
    "composite_100",
    "composite_80",
    "exam_merit_rank",
    "group_top_decile_mean",
    "admission_threshold",
    "eligibility_status",
];

/// Derived columns appended after the intake columns on interview-stage reports.
pub const INTERVIEW_STAGE_COLUMNS: [&str; 12] = [
    "aptitude_normalized",
    "knowledge_normalized",
    "composite_100",
    "composite_80",
    "exam_merit_rank",
    "final_score",
    "final_merit_rank",
    "group_top_decile_mean",
    "admission_threshold",
    "eligibility_status",
    "final_status",
    "preselection_outcome",
];

/// Column added when the intake sheets do not carry the period themselves.
pub const PERIOD_COLUMN: &str = "period";
const PERIOD_ALIASES: [&str; 2] = ["period", "periodo"];

pub(crate) fn is_period_header(header: &str) -> bool {
    let normalized = header.trim().to_ascii_lowercase();
    PERIOD_ALIASES.contains(&normalized.as_str())
}

pub(crate) fn is_derived_header(header: &str) -> bool {
    let normalized = header.trim().to_ascii_lowercase();
    INTERVIEW_STAGE_COLUMNS.contains(&normalized.as_str())
}
