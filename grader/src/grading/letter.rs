use serde::Serialize;
use std::fmt;

/// Letter grade derived from the integer total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LetterGrade {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "F")]
    F,
}

/// Lower bound of each grade, highest first.
const CUTOFFS: [(u32, LetterGrade); 11] = [
    (93, LetterGrade::A),
    (90, LetterGrade::AMinus),
    (87, LetterGrade::BPlus),
    (83, LetterGrade::B),
    (80, LetterGrade::BMinus),
    (77, LetterGrade::CPlus),
    (73, LetterGrade::C),
    (70, LetterGrade::CMinus),
    (67, LetterGrade::DPlus),
    (63, LetterGrade::D),
    (60, LetterGrade::DMinus),
];

impl LetterGrade {
    pub fn from_score(score: u32) -> Self {
        CUTOFFS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, grade)| *grade)
            .unwrap_or(LetterGrade::F)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::DMinus => "D-",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoffs_are_inclusive() {
        assert_eq!(LetterGrade::from_score(100), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(93), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(92), LetterGrade::AMinus);
        assert_eq!(LetterGrade::from_score(87), LetterGrade::BPlus);
        assert_eq!(LetterGrade::from_score(80), LetterGrade::BMinus);
        assert_eq!(LetterGrade::from_score(70), LetterGrade::CMinus);
        assert_eq!(LetterGrade::from_score(60), LetterGrade::DMinus);
        assert_eq!(LetterGrade::from_score(59), LetterGrade::F);
        assert_eq!(LetterGrade::from_score(0), LetterGrade::F);
    }

    #[test]
    fn test_display_and_serialization_agree() {
        for (_, grade) in CUTOFFS {
            let json = serde_json::to_string(&grade).unwrap();
            assert_eq!(json, format!("\"{grade}\""));
        }
        assert_eq!(LetterGrade::BPlus.to_string(), "B+");
    }
}
