//! Tests for Oracle feedback providers and prompts.

use nebula_sage::{
    FeedbackProvider, FeedbackRequest, Hint, MAX_NUMBER, MIN_NUMBER, Number, OfflineOracle,
    Target, mentions_number, oracle_system_prompt, oracle_user_message,
};

fn request(guess: u8, target: u8, attempt_number: usize) -> FeedbackRequest {
    let guess = Number::new(guess).unwrap();
    let target = Target::new(Number::new(target).unwrap());
    FeedbackRequest {
        guess,
        target,
        attempt_number,
        hint: target.hint_for(guess),
    }
}

#[tokio::test]
async fn test_offline_oracle_never_reveals_target_on_miss() {
    let oracle = OfflineOracle;
    for target in MIN_NUMBER..=MAX_NUMBER {
        for guess in (MIN_NUMBER..=MAX_NUMBER).filter(|g| *g != target) {
            let req = request(guess, target, usize::from(guess % 10) + 1);
            let reply = oracle.generate_feedback(req).await.unwrap();
            assert!(!reply.is_empty());
            assert!(
                !mentions_number(&reply, req.target.reveal()),
                "reply {:?} leaks target {}",
                reply,
                target
            );
        }
    }
}

#[tokio::test]
async fn test_offline_oracle_quotes_guess() {
    let reply = OfflineOracle
        .generate_feedback(request(30, 64, 1))
        .await
        .unwrap();
    assert!(mentions_number(&reply, Number::new(30).unwrap()));
}

#[tokio::test]
async fn test_offline_oracle_rotates_lines() {
    let first = OfflineOracle
        .generate_feedback(request(30, 64, 1))
        .await
        .unwrap();
    let second = OfflineOracle
        .generate_feedback(request(30, 64, 2))
        .await
        .unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_offline_oracle_praises_correct_guess() {
    let reply = OfflineOracle
        .generate_feedback(request(64, 64, 3))
        .await
        .unwrap();
    assert!(mentions_number(&reply, Number::new(64).unwrap()));
}

#[test]
fn test_user_message_carries_direction_only() {
    let message = oracle_user_message(&request(12, 87, 4));
    assert!(message.contains("too low"));
    assert!(mentions_number(&message, Number::new(12).unwrap()));
    assert!(!mentions_number(&message, Number::new(87).unwrap()));

    let message = oracle_user_message(&request(90, 87, 5));
    assert!(message.contains("too high"));

    let message = oracle_user_message(&request(87, 87, 6));
    assert!(message.contains("correct"));
}

#[test]
fn test_system_prompt_uses_language() {
    let prompt = oracle_system_prompt("Italian");
    assert!(prompt.contains("Italian"));
    assert!(prompt.contains("Sage of the Nebula"));
}

#[test]
fn test_mentions_number_matches_whole_integers() {
    let n = Number::new(7).unwrap();
    assert!(mentions_number("Seven? No: 7.", n));
    assert!(mentions_number("it is 07", n));
    assert!(!mentions_number("seventy 70 and 17", n));
    assert!(!mentions_number("no digits here", n));
}

#[test]
fn test_hint_directions() {
    assert_eq!(request(10, 42, 1).hint, Hint::TooLow);
    assert_eq!(request(70, 42, 1).hint, Hint::TooHigh);
    assert_eq!(request(42, 42, 1).hint, Hint::Correct);
}
