//! Grade arithmetic. Kept free of any store state so the same rule applies to
//! fresh upserts and to records read back from disk.

use crate::models::Scores;

/// Sum of the three component scores. No range checks: any `i32` is a valid
/// score, and the sum is taken in `i64` so it is exact for every triple.
pub fn total(scores: Scores) -> i64 {
    i64::from(scores.midterm) + i64::from(scores.final_exam) + i64::from(scores.assignment)
}

/// Mean of the three components rounded to two decimals, half-up on the
/// scaled value.
pub fn average(total: i64) -> f64 {
    (total as f64 / 3.0 * 100.0 + 0.5).floor() / 100.0
}

/// Compare two averages at the two-decimal precision they are stored with.
pub fn same_average(a: f64, b: f64) -> bool {
    (a * 100.0).round() == (b * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_components() {
        assert_eq!(total(Scores::new(90, 85, 100)), 275);
        assert_eq!(total(Scores::new(0, 0, 0)), 0);
        assert_eq!(total(Scores::new(-5, 10, 0)), 5);
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        assert_eq!(average(275), 91.67);
        assert_eq!(average(300), 100.0);
        assert_eq!(average(240), 80.0);
        assert_eq!(average(100), 33.33);
        assert_eq!(average(200), 66.67);
        assert_eq!(average(1), 0.33);
        assert_eq!(average(2), 0.67);
    }

    #[test]
    fn average_rounds_half_up_for_negative_totals() {
        // -1 / 3 * 100 = -33.33.. -> -33
        assert_eq!(average(-1), -0.33);
        // -2 / 3 * 100 = -66.66.. -> -67
        assert_eq!(average(-2), -0.67);
    }

    #[test]
    fn extreme_scores_do_not_overflow() {
        let max = Scores::new(i32::MAX, i32::MAX, i32::MAX);
        assert_eq!(total(max), 3 * i64::from(i32::MAX));
        assert_eq!(average(total(max)), f64::from(i32::MAX));

        let min = Scores::new(i32::MIN, i32::MIN, i32::MIN);
        assert_eq!(total(min), 3 * i64::from(i32::MIN));
        assert_eq!(average(total(min)), f64::from(i32::MIN));
    }

    #[test]
    fn same_average_ignores_sub_cent_noise() {
        assert!(same_average(91.67, 91.666_666_666_7));
        assert!(!same_average(91.67, 91.68));
    }
}
