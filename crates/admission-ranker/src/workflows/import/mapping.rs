use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Intake columns the scoring pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Column {
    DocumentId,
    Modality,
    Program,
    AptitudeRaw,
    KnowledgeRaw,
    InterviewScore,
    PositionCode,
    Period,
}

impl Column {
    pub(crate) const REQUIRED: [Column; 5] = [
        Column::DocumentId,
        Column::Modality,
        Column::Program,
        Column::AptitudeRaw,
        Column::KnowledgeRaw,
    ];

    pub(crate) const fn canonical(self) -> &'static str {
        match self {
            Self::DocumentId => "document_id",
            Self::Modality => "modality",
            Self::Program => "program",
            Self::AptitudeRaw => "aptitude_raw",
            Self::KnowledgeRaw => "knowledge_raw",
            Self::InterviewScore => "interview_score",
            Self::PositionCode => "position_code",
            Self::Period => "period",
        }
    }

    pub(crate) const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::DocumentId => &["per_num_doc", "document_id"],
            Self::Modality => &["modalidad", "modality"],
            Self::Program => &["programa", "program"],
            Self::AptitudeRaw => &["total_aptitud", "aptitude_raw"],
            Self::KnowledgeRaw => &["total_conocimiento", "knowledge_raw"],
            Self::InterviewScore => &["nota_entre", "interview_score"],
            Self::PositionCode => &["pos_codigo", "position_code"],
            Self::Period => &["periodo", "period"],
        }
    }

    pub(crate) fn accepted(self) -> String {
        self.aliases().join(" | ")
    }
}

const ALL_COLUMNS: [Column; 8] = [
    Column::DocumentId,
    Column::Modality,
    Column::Program,
    Column::AptitudeRaw,
    Column::KnowledgeRaw,
    Column::InterviewScore,
    Column::PositionCode,
    Column::Period,
];

static HEADER_MAP: OnceLock<HashMap<&'static str, Column>> = OnceLock::new();

pub(crate) fn column_for_header(header: &str) -> Option<Column> {
    header_map().get(normalize_header(header).as_str()).copied()
}

fn header_map() -> &'static HashMap<&'static str, Column> {
    HEADER_MAP.get_or_init(|| {
        ALL_COLUMNS
            .iter()
            .flat_map(|column| column.aliases().iter().map(move |alias| (*alias, *column)))
            .collect()
    })
}
