//! Gender Gap Module
//! Per-party difference in support between the two largest gender groups,
//! with Welch's t-test when each side has repeated observations.

use crate::data::SurveyRecord;
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::fmt;

/// Significance threshold for t-test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Support gap for a single party.
#[derive(Debug, Clone, PartialEq)]
pub struct GenderGap {
    pub party: String,
    pub first_gender: String,
    pub second_gender: String,
    pub first_mean: f64,
    pub second_mean: f64,
    /// `first_mean - second_mean`, in percentage points.
    pub gap: f64,
    pub p_value: Option<f64>,
    pub is_significant: bool,
}

impl fmt::Display for GenderGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {:.2} vs {} {:.2} (gap {:+.2}",
            self.party,
            self.first_gender,
            self.first_mean,
            self.second_gender,
            self.second_mean,
            self.gap
        )?;
        match self.p_value {
            Some(p) => write!(f, ", p={:.4})", p),
            None => write!(f, ")"),
        }
    }
}

/// Perform Welch's t-test (independent samples, unequal variance).
///
/// Returns `None` when either sample has fewer than two values.
pub fn welch_ttest(a: &[f64], b: &[f64]) -> Option<(f64, bool)> {
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;

    if n1 < 2.0 || n2 < 2.0 {
        return None;
    }

    let mean1 = a.iter().sum::<f64>() / n1;
    let mean2 = b.iter().sum::<f64>() / n2;

    let var1 = a.iter().map(|x| (x - mean1).powi(2)).sum::<f64>() / (n1 - 1.0);
    let var2 = b.iter().map(|x| (x - mean2).powi(2)).sum::<f64>() / (n2 - 1.0);

    let se = (var1 / n1 + var2 / n2).sqrt();
    if se == 0.0 {
        return Some((1.0, false));
    }

    let t = (mean1 - mean2) / se;

    // Welch-Satterthwaite degrees of freedom
    let df_num = (var1 / n1 + var2 / n2).powi(2);
    let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
    let df = df_num / df_denom;

    // Two-tailed p-value using t-distribution
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    let p_value = 2.0 * (1.0 - dist.cdf(t.abs()));
    Some((p_value, p_value <= SIGNIFICANCE_THRESHOLD))
}

/// The two genders with the most records, ties broken by first appearance.
pub fn leading_genders(records: &[SurveyRecord]) -> Option<(String, String)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for r in records {
        match counts.iter_mut().find(|(g, _)| *g == r.gender) {
            Some((_, n)) => *n += 1,
            None => counts.push((r.gender.clone(), 1)),
        }
    }
    // Stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut it = counts.into_iter().map(|(g, _)| g);
    Some((it.next()?, it.next()?))
}

/// Gender gap for every party that has records for both leading genders.
pub fn compute_gender_gaps(records: &[SurveyRecord]) -> Vec<GenderGap> {
    let Some((first, second)) = leading_genders(records) else {
        return Vec::new();
    };

    let mut parties: Vec<&str> = Vec::new();
    for r in records {
        if !parties.contains(&r.party.as_str()) {
            parties.push(&r.party);
        }
    }

    parties
        .into_iter()
        .filter_map(|party| {
            let support_for = |gender: &str| -> Vec<f64> {
                records
                    .iter()
                    .filter(|r| r.party == party && r.gender == gender)
                    .map(|r| r.support)
                    .collect()
            };
            let a = support_for(&first);
            let b = support_for(&second);
            if a.is_empty() || b.is_empty() {
                return None;
            }

            let first_mean = a.iter().sum::<f64>() / a.len() as f64;
            let second_mean = b.iter().sum::<f64>() / b.len() as f64;
            let test = welch_ttest(&a, &b);

            Some(GenderGap {
                party: party.to_string(),
                first_gender: first.clone(),
                second_gender: second.clone(),
                first_mean,
                second_mean,
                gap: first_mean - second_mean,
                p_value: test.map(|(p, _)| p),
                is_significant: test.map(|(_, sig)| sig).unwrap_or(false),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(gender: &str, party: &str, support: f64) -> SurveyRecord {
        SurveyRecord {
            gender: gender.to_string(),
            party: party.to_string(),
            support,
        }
    }

    #[test]
    fn test_single_observation_gap_has_no_p_value() {
        let records = vec![
            rec("Male", "Labour", 31.0),
            rec("Female", "Labour", 38.0),
            rec("Male", "Reform", 20.0),
            rec("Female", "Reform", 12.0),
        ];
        let gaps = compute_gender_gaps(&records);
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].party, "Labour");
        assert_eq!(gaps[0].first_gender, "Male");
        assert!((gaps[0].gap + 7.0).abs() < 1e-12);
        assert_eq!(gaps[0].p_value, None);
        assert!(!gaps[0].is_significant);
        assert_eq!(gaps[1].to_string(), "Reform: Male 20.00 vs Female 12.00 (gap +8.00)");
    }

    #[test]
    fn test_party_missing_a_gender_is_skipped() {
        let records = vec![
            rec("Female", "Labour", 38.0),
            rec("Male", "Labour", 31.0),
            rec("Female", "Green", 9.0),
        ];
        let gaps = compute_gender_gaps(&records);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].first_gender, "Female");
    }

    #[test]
    fn test_clear_difference_is_significant() {
        let mut records = Vec::new();
        for v in [40.0, 41.0, 42.0, 40.5, 41.5] {
            records.push(rec("Female", "Labour", v));
        }
        for v in [30.0, 31.0, 29.5, 30.5, 31.5] {
            records.push(rec("Male", "Labour", v));
        }
        let gaps = compute_gender_gaps(&records);
        let gap = &gaps[0];
        assert!(gap.p_value.unwrap() < 0.001);
        assert!(gap.is_significant);
    }

    #[test]
    fn test_welch_identical_samples() {
        let (p, sig) = welch_ttest(&[5.0, 5.0], &[5.0, 5.0]).unwrap();
        assert_eq!(p, 1.0);
        assert!(!sig);
        assert!(welch_ttest(&[1.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_fewer_than_two_genders() {
        let records = vec![rec("Female", "Labour", 38.0)];
        assert!(leading_genders(&records).is_none());
        assert!(compute_gender_gaps(&records).is_empty());
    }
}
