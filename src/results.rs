use crate::types::{OptionTally, SessionId};
use std::collections::HashMap;

/// Tally answers against a poll's options, preserving option order.
///
/// Percentages are round-half-up of `count / total * 100`, and 0 across the
/// board when nobody has answered. Options are matched by string equality,
/// so duplicate option text produces duplicate rows that each carry the
/// merged count.
pub fn compute_results(
    options: &[String],
    answers: &HashMap<SessionId, String>,
) -> Vec<OptionTally> {
    let total = answers.len() as u32;

    options
        .iter()
        .map(|option| {
            let count = answers.values().filter(|answer| *answer == option).count() as u32;
            let percentage = if total > 0 {
                ((f64::from(count) / f64::from(total)) * 100.0).round() as u32
            } else {
                0
            };
            OptionTally {
                option: option.clone(),
                count,
                percentage,
            }
        })
        .collect()
}
