//! Agreement verdict over canonical answers
//!
//! Providers are partitioned into equivalence classes by canonical-answer
//! equality. The partition is built in provider registration order, so the
//! verdict depends only on the set of results, never on completion order.

use crate::core::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Providers that produced the same canonical answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerClass {
    /// Canonical answer shared by all members
    pub answer: String,
    /// Members in registration order
    pub members: Vec<ProviderId>,
}

impl AnswerClass {
    /// Number of providers in this class
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Partition `(provider, canonical answer)` pairs into classes.
    ///
    /// Classes are ordered by the position of their first member.
    pub fn partition(answers: &[(ProviderId, String)]) -> Vec<AnswerClass> {
        let mut classes: Vec<AnswerClass> = Vec::new();
        for (provider, answer) in answers {
            match classes.iter_mut().find(|c| &c.answer == answer) {
                Some(class) => class.members.push(provider.clone()),
                None => classes.push(AnswerClass {
                    answer: answer.clone(),
                    members: vec![provider.clone()],
                }),
            }
        }
        classes
    }
}

/// Classification of a completed round
///
/// # Example
///
/// ```
/// use triplecheck_domain::{AgreementVerdict, ProviderId};
///
/// let answers = vec![
///     (ProviderId::new("gpt4"), "4".to_string()),
///     (ProviderId::new("sonar_pro"), "4".to_string()),
///     (ProviderId::new("sonar"), "2".to_string()),
/// ];
/// let verdict = AgreementVerdict::from_canonical(&answers);
/// assert!(verdict.is_partial());
/// assert_eq!(verdict.agreed_answer(), Some("4"));
/// assert_eq!(verdict.outliers(), &[ProviderId::new("sonar")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgreementVerdict {
    /// Every provider gave the same canonical answer
    Unanimous { answer: String },
    /// The largest class has at least two members but not everyone
    Partial {
        answer: String,
        agreeing: Vec<ProviderId>,
        outliers: Vec<ProviderId>,
    },
    /// Every canonical answer is distinct
    NoAgreement,
}

impl AgreementVerdict {
    /// Classify a set of `(provider, canonical answer)` pairs.
    ///
    /// When two classes tie for largest, the one whose first member was
    /// registered earliest is reported.
    pub fn from_canonical(answers: &[(ProviderId, String)]) -> Self {
        let classes = AnswerClass::partition(answers);

        let mut largest: Option<&AnswerClass> = None;
        for class in &classes {
            if largest.is_none_or(|l| class.size() > l.size()) {
                largest = Some(class);
            }
        }

        let Some(largest) = largest else {
            return AgreementVerdict::NoAgreement;
        };

        if largest.size() == answers.len() {
            AgreementVerdict::Unanimous {
                answer: largest.answer.clone(),
            }
        } else if largest.size() >= 2 {
            let outliers = answers
                .iter()
                .map(|(provider, _)| provider)
                .filter(|p| !largest.members.contains(*p))
                .cloned()
                .collect();
            AgreementVerdict::Partial {
                answer: largest.answer.clone(),
                agreeing: largest.members.clone(),
                outliers,
            }
        } else {
            AgreementVerdict::NoAgreement
        }
    }

    pub fn is_unanimous(&self) -> bool {
        matches!(self, AgreementVerdict::Unanimous { .. })
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, AgreementVerdict::Partial { .. })
    }

    pub fn is_no_agreement(&self) -> bool {
        matches!(self, AgreementVerdict::NoAgreement)
    }

    /// Canonical answer backed by the largest class, if any class agrees
    pub fn agreed_answer(&self) -> Option<&str> {
        match self {
            AgreementVerdict::Unanimous { answer } | AgreementVerdict::Partial { answer, .. } => {
                Some(answer.as_str())
            }
            AgreementVerdict::NoAgreement => None,
        }
    }

    /// Providers outside the agreeing class (empty unless partial)
    pub fn outliers(&self) -> &[ProviderId] {
        match self {
            AgreementVerdict::Partial { outliers, .. } => outliers,
            _ => &[],
        }
    }
}

impl std::fmt::Display for AgreementVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgreementVerdict::Unanimous { .. } => write!(f, "Unanimous"),
            AgreementVerdict::Partial { .. } => write!(f, "Partial"),
            AgreementVerdict::NoAgreement => write!(f, "No agreement"),
        }
    }
}
