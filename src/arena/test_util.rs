use super::{
    match_context::WINNING_SCORE,
    round_context::{RoundContext, RoundPhase},
    simulation::MatchResult,
};

pub fn assert_valid_round_context(ctx: &RoundContext) {
    // Every ball on the field was thrown by its owner this round.
    for side in crate::core::Side::sides() {
        for ball in ctx.field.balls(side) {
            assert_eq!(side, ball.owner);
            assert!(ball.distance >= 0.0);
            assert!(ball.distance.is_finite());
        }
    }

    let out_of_balls = ctx.balls_remaining.a == 0 && ctx.balls_remaining.b == 0;
    assert_eq!(out_of_balls, ctx.phase == RoundPhase::Complete);
    assert_eq!(ctx.current_thrower.is_none(), out_of_balls);

    if let Some(side) = ctx.current_thrower {
        assert!(ctx.balls_remaining[side] > 0);
    }
    if ctx.phase == RoundPhase::AwaitingFirstThrow {
        assert!(ctx.field.is_empty());
        assert_eq!(None, ctx.last_thrower);
    }
}

pub fn assert_valid_match_result(result: &MatchResult) {
    // Exactly one side reaches the winning score.
    assert_eq!(WINNING_SCORE, result.score[result.winner]);
    assert!(result.score[result.winner.opponent()] < WINNING_SCORE);
    assert!(result.rounds > 0);

    if let Some(log) = &result.log {
        assert_eq!(result.rounds as usize, log.len());

        let mut score = crate::core::PerSide::<u8>::default();
        for round in log {
            assert_eq!(score, round.start_score);
            assert!(round.points as usize <= round.final_field.balls(round.winner).len());
            // Only the round winner's score moves.
            assert_eq!(
                round.start_score[round.winner.opponent()],
                round.end_score[round.winner.opponent()]
            );
            assert_eq!(
                (round.start_score[round.winner] + round.points).min(WINNING_SCORE),
                round.end_score[round.winner]
            );
            for action in &round.actions {
                assert_eq!(round.round_number, action.round_number);
            }
            score = round.end_score;
        }
        assert_eq!(result.score, score);
    }
}
