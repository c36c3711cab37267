use super::super::domain::{EligibilityStatus, FinalStatus, PreselectionOutcome};

/// Post-exam pass: meeting the group threshold earns an interview.
pub fn classify_eligibility(composite_80: f64, admission_threshold: f64) -> EligibilityStatus {
    if composite_80 >= admission_threshold {
        EligibilityStatus::EligibleForInterview
    } else {
        EligibilityStatus::NotApproved
    }
}

/// Post-interview pass. A post-exam rejection is terminal.
pub fn classify_final_status(eligibility: EligibilityStatus, preselected: bool) -> FinalStatus {
    match eligibility {
        EligibilityStatus::NotApproved => FinalStatus::NotApproved,
        EligibilityStatus::EligibleForInterview if preselected => FinalStatus::ApprovedEvaluation,
        EligibilityStatus::EligibleForInterview => FinalStatus::Admitted,
    }
}

/// Scholarship overlay; rejected applicants stay tracked when they are on the list.
pub fn classify_preselection(final_status: FinalStatus, preselected: bool) -> PreselectionOutcome {
    match final_status {
        FinalStatus::ApprovedEvaluation => PreselectionOutcome::Preselected,
        FinalStatus::Admitted => PreselectionOutcome::Regular,
        FinalStatus::NotApproved if preselected => PreselectionOutcome::Preselected,
        FinalStatus::NotApproved => PreselectionOutcome::Regular,
    }
}
