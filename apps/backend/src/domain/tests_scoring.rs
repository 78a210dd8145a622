use crate::domain::scoring::final_score;
use crate::domain::session::GuessRecord;

fn guess_by(participant: &str, guess: f64) -> GuessRecord {
    GuessRecord {
        participant: participant.to_string(),
        guess,
        timestamp_ms: 0,
    }
}

#[test]
fn single_guess_scores_base() {
    let history = vec![guess_by("p1", 42.0)];
    assert_eq!(final_score(&history, "p1"), 1000);
}

#[test]
fn each_extra_guess_costs_fifty() {
    let history = vec![
        guess_by("p1", 1.0),
        guess_by("p1", 2.0),
        guess_by("p1", 3.0),
    ];
    assert_eq!(final_score(&history, "p1"), 900);
}

#[test]
fn only_the_winners_own_guesses_count() {
    // Two guesses overall, but only one by the winner.
    let history = vec![guess_by("p1", 25.0), guess_by("p2", 19.99)];
    assert_eq!(final_score(&history, "p2"), 1000);
}

#[test]
fn score_floors_at_one_hundred() {
    let history: Vec<_> = (0..21).map(|i| guess_by("p1", i as f64)).collect();
    assert_eq!(final_score(&history, "p1"), 100);

    let history: Vec<_> = (0..40).map(|i| guess_by("p1", i as f64)).collect();
    assert_eq!(final_score(&history, "p1"), 100);
}

#[test]
fn disconnect_winner_without_guesses_scores_base() {
    let history = vec![guess_by("p1", 25.0)];
    assert_eq!(final_score(&history, "p2"), 1000);
}

#[test]
fn score_is_non_increasing_in_guess_count() {
    let mut history = Vec::new();
    let mut last = i64::MAX;
    for i in 0..30 {
        history.push(guess_by("p1", i as f64));
        let score = final_score(&history, "p1");
        assert!(score <= last);
        assert!(score >= 100);
        last = score;
    }
}
