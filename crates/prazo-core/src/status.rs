//! Status classification.
//!
//! Status cells are free text entered by humans: casing, accents, and
//! surrounding words all vary ("Em Andamento", "em andamento", "EM ANDAMENTO
//! - aguardando peça"). Classification folds the label to a diacritic-free
//! lowercase form and tests an ordered keyword list; the first keyword found
//! decides the category. The resulting tag string is the CSS class the chart
//! front end keys its colors on, so the literals are frozen.

use deunicode::deunicode;
use serde::{Serialize, Serializer};

/// Normalized status category for a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTag {
    /// Work underway ("andamento")
    InProgress,
    /// Work finished ("finalizado", "concluido")
    Done,
    /// Past due ("atrasado")
    Overdue,
    /// Waiting to start ("pendente")
    Pending,
    /// Abandoned ("cancelado")
    Cancelled,
    /// Empty label or no keyword matched
    Unclassified,
}

impl StatusTag {
    /// Classify a raw status label.
    ///
    /// Keyword priority is fixed: a label containing both "atrasado" and
    /// "pendente" is Overdue because "atrasado" is tested first.
    pub fn classify(label: &str) -> Self {
        if label.is_empty() {
            return Self::Unclassified;
        }

        let folded = deunicode(label).to_lowercase();

        if folded.contains("andamento") {
            return Self::InProgress;
        }
        if folded.contains("finalizado") || folded.contains("concluido") {
            return Self::Done;
        }
        if folded.contains("atrasado") {
            return Self::Overdue;
        }
        if folded.contains("pendente") {
            return Self::Pending;
        }
        if folded.contains("cancelado") {
            return Self::Cancelled;
        }

        Self::Unclassified
    }

    /// The CSS class string the chart front end expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTag::InProgress => "status-em-andamento",
            StatusTag::Done => "status-finalizado",
            StatusTag::Overdue => "status-atrasado",
            StatusTag::Pending => "status-pendente",
            StatusTag::Cancelled => "status-cancelado",
            StatusTag::Unclassified => "status-default",
        }
    }
}

impl std::fmt::Display for StatusTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for StatusTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_in_progress() {
        assert_eq!(StatusTag::classify("Em Andamento"), StatusTag::InProgress);
        assert_eq!(StatusTag::classify("em andamento"), StatusTag::InProgress);
    }

    #[test]
    fn classifies_done() {
        assert_eq!(StatusTag::classify("Finalizado"), StatusTag::Done);
        assert_eq!(StatusTag::classify("Concluido"), StatusTag::Done);
    }

    #[test]
    fn classifies_overdue_case_insensitively() {
        assert_eq!(StatusTag::classify("ATRASADO"), StatusTag::Overdue);
    }

    #[test]
    fn classifies_pending_and_cancelled() {
        assert_eq!(StatusTag::classify("Pendente"), StatusTag::Pending);
        assert_eq!(StatusTag::classify("Cancelado"), StatusTag::Cancelled);
    }

    #[test]
    fn accents_fold_before_matching() {
        assert_eq!(StatusTag::classify("concluído"), StatusTag::Done);
        assert_eq!(StatusTag::classify("CONCLUÍDO"), StatusTag::Done);
        assert_eq!(
            StatusTag::classify("concluído"),
            StatusTag::classify("concluido")
        );
    }

    #[test]
    fn empty_and_unknown_labels_are_unclassified() {
        assert_eq!(StatusTag::classify(""), StatusTag::Unclassified);
        assert_eq!(StatusTag::classify("aguardando"), StatusTag::Unclassified);
    }

    #[test]
    fn keyword_priority_is_first_match() {
        // "andamento" outranks everything that follows it in the list.
        assert_eq!(
            StatusTag::classify("Em andamento, mas atrasado"),
            StatusTag::InProgress
        );
        assert_eq!(
            StatusTag::classify("Atrasado e pendente"),
            StatusTag::Overdue
        );
    }

    #[test]
    fn matches_keyword_inside_longer_text() {
        assert_eq!(
            StatusTag::classify("Projeto finalizado em março"),
            StatusTag::Done
        );
    }

    #[test]
    fn tag_strings_are_frozen() {
        assert_eq!(StatusTag::InProgress.as_str(), "status-em-andamento");
        assert_eq!(StatusTag::Done.as_str(), "status-finalizado");
        assert_eq!(StatusTag::Overdue.as_str(), "status-atrasado");
        assert_eq!(StatusTag::Pending.as_str(), "status-pendente");
        assert_eq!(StatusTag::Cancelled.as_str(), "status-cancelado");
        assert_eq!(StatusTag::Unclassified.as_str(), "status-default");
        assert_eq!(format!("{}", StatusTag::Pending), "status-pendente");
    }
}
