//! Victory unlock: enough right answers and nothing left unanswered

use super::exhibit::AnswerState;
use super::room::Room;

/// Every quiz result in the game, room by room
pub fn collect_answers(rooms: &[Room]) -> Vec<AnswerState> {
    rooms.iter().flat_map(Room::answers).collect()
}

/// The unlock rule over a flat list of results
pub fn threshold_met(answers: &[AnswerState], threshold: usize) -> bool {
    let correct = answers
        .iter()
        .filter(|&&a| a == AnswerState::Correct)
        .count();
    let unanswered = answers.contains(&AnswerState::Unanswered);
    correct >= threshold && !unanswered
}

/// Re-check the rule. The flag only ever goes from false to true.
/// Returns true on the call that sets it.
pub fn update(victory: &mut bool, rooms: &[Room], threshold: usize) -> bool {
    if *victory {
        return false;
    }
    if threshold_met(&collect_answers(rooms), threshold) {
        *victory = true;
        return true;
    }
    false
}
