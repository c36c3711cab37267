use super::super::domain::{EligibilityStatus, FinalStatus, PreselectionOutcome};
use super::super::pipeline::{AdmissionResults, GroupOutcome};
use super::views::GroupSummaryView;

/// Per-group counts in emission order.
pub fn summarize(results: &AdmissionResults) -> Vec<GroupSummaryView> {
    results.groups.iter().map(summarize_group).collect()
}

fn summarize_group(group: &GroupOutcome) -> GroupSummaryView {
    let mut eligible = 0;
    let mut not_approved = 0;
    let mut admitted = 0;
    let mut approved_evaluation = 0;
    let mut preselected = 0;
    let mut interviewed = false;

    for applicant in &group.applicants {
        match applicant.eligibility_status {
            EligibilityStatus::EligibleForInterview => eligible += 1,
            EligibilityStatus::NotApproved => not_approved += 1,
        }

        if let Some(interview) = &applicant.interview {
            interviewed = true;
            match interview.final_status {
                FinalStatus::Admitted => admitted += 1,
                FinalStatus::ApprovedEvaluation => approved_evaluation += 1,
                FinalStatus::NotApproved => {}
            }
            if interview.preselection_outcome == PreselectionOutcome::Preselected {
                preselected += 1;
            }
        }
    }

    GroupSummaryView {
        period: group.key.period.clone(),
        modality: group.key.modality.clone(),
        program: group.key.program.clone(),
        applicants: group.applicants.len(),
        top_count: group.threshold.top_count,
        top_decile_mean: group.threshold.top_decile_mean,
        decile_weight: group.threshold.decile_weight,
        admission_threshold: group.threshold.admission_threshold,
        eligible,
        not_approved,
        admitted: interviewed.then_some(admitted),
        approved_evaluation: interviewed.then_some(approved_evaluation),
        preselected: interviewed.then_some(preselected),
    }
}
